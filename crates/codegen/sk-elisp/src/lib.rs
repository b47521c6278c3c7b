//! Target AST and text emitter for the Emacs Lisp dialect
//!
//! The lowering stage produces this tree; every node knows how to render
//! itself at an indentation level, in a plain and a quoted variant. The
//! quoted variant is used when a node appears inside quoted data (array and
//! object literals); compile-time literals render unchanged there, while
//! anything that must evaluate at instantiation time renders with a
//! backquote-unquote marker.

pub mod ast;
pub mod emit;

pub use ast::{
    IndexerKind, LetItem, Namespace, Node, ParamList, PostfixKind, Property, SourceFile,
};

/// Header line fixing the target dialect's scoping mode
pub const FILE_HEADER: &str = ";;; -*- lexical-binding: t -*-";

/// Library required for the non-local-return forms the emitter uses
pub const RUNTIME_REQUIRE: &str = "cl-lib";

/// Runtime helper performing surface-compatible `+` coercion
pub const RUNTIME_ADD: &str = "shrike-add";

/// Prefix for compiler-generated temporary bindings
pub const TEMP_PREFIX: &str = "shrike--tmp-";

/// Prefix for compiler-generated non-local-return block names
pub const BLOCK_PREFIX: &str = "blk-";
