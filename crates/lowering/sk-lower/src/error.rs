//! Errors raised while lowering IR to the target AST

use miette::Diagnostic;
use sk_span::FileSpan;
use thiserror::Error;

/// Fatal errors for one compilation unit during lowering
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum LowerError {
    /// An IR node kind with no target-dialect translation reached lowering
    #[error("unsupported construct `{kind}` at {span}")]
    #[diagnostic(
        code(lower::unsupported_construct),
        help("this surface-language feature has no target-dialect translation")
    )]
    UnsupportedConstruct {
        /// Human-readable node kind
        kind: String,
        /// Source location
        span: FileSpan,
    },

    /// A `return` outside any function or lambda
    #[error("return statement outside any function at {span}")]
    #[diagnostic(code(lower::unbound_return_target))]
    UnboundReturnTarget {
        /// Source location
        span: FileSpan,
    },

    /// A `[NamedArguments]` function declared or called incorrectly
    #[error("named-arguments misuse: {reason} at {span}")]
    #[diagnostic(
        code(lower::named_arguments_misuse),
        help(
            "a named-arguments function takes exactly one parameter whose \
             declared type lists its fields"
        )
    )]
    NamedArgumentsMisuse {
        /// What went wrong
        reason: String,
        /// Source location
        span: FileSpan,
    },

    /// A lookup the lowering stage depends on failed; given a well-formed IR
    /// this cannot happen, so it indicates a builder bug
    #[error(
        "symbol resolution failed for `{name}` in scope {scope} at {span}; \
         this is a compiler bug"
    )]
    #[diagnostic(code(lower::symbol_resolution_failure))]
    SymbolResolutionFailure {
        /// The unresolvable name or id
        name: String,
        /// The scope resolution started from
        scope: u32,
        /// Source location
        span: FileSpan,
    },
}
