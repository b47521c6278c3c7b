//! Compilation driver
//!
//! Orders the pipeline as a sequence of named passes — Build → Lower → Emit —
//! each a pure function from one representation to the next, run once per
//! compilation unit. Units are independent: nothing is shared between them,
//! a failing unit aborts only itself, and its partial output is discarded.

use anyhow::Result;
use miette::Diagnostic;
use sk_elisp::SourceFile as ElispFile;
use sk_intern::Interner;
use sk_ir_build::{BuildError, BuiltUnit};
use sk_lower::LowerError;
use sk_span::FileId;
use sk_syntax::SourceUnit;
use thiserror::Error;

/// Pass names of the pipeline, in execution order
pub const PASS_NAMES: [&str; 3] = ["build", "lower", "emit"];

/// Any error that aborts one compilation unit
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CompileError {
    /// IR construction failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] BuildError),

    /// Lowering failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lower(#[from] LowerError),
}

/// Output of one successfully compiled unit
#[derive(Debug, Clone)]
pub struct CompiledUnit {
    /// Which file this came from
    pub file: FileId,
    /// Feature name of the compiled module
    pub feature: String,
    /// The emitted target-dialect source text
    pub text: String,
}

/// Pass 1: concrete syntax → IR + scope tree
///
/// # Errors
///
/// Fails on unsupported constructs and malformed directives.
pub fn build(unit: &SourceUnit, interner: &Interner) -> Result<BuiltUnit, CompileError> {
    Ok(sk_ir_build::build_unit(unit, interner)?)
}

/// Pass 2: IR → target AST
///
/// # Errors
///
/// Fails on unsupported IR nodes, unbound returns, and directive misuse.
pub fn lower(built: &BuiltUnit, interner: &Interner) -> Result<ElispFile, CompileError> {
    Ok(sk_lower::lower_file(&built.ir, &built.scopes, interner)?)
}

/// Pass 3: target AST → text
pub fn emit(file: &ElispFile) -> String {
    file.emit()
}

/// Run the whole pipeline for one compilation unit
///
/// # Errors
///
/// Propagates the first failing pass; no partial output is produced.
pub fn compile_unit(unit: &SourceUnit, interner: &Interner) -> Result<CompiledUnit, CompileError> {
    let built = build(unit, interner)?;
    let lowered = lower(&built, interner)?;
    Ok(CompiledUnit {
        file: unit.file,
        feature: lowered.feature.clone(),
        text: emit(&lowered),
    })
}

/// Compile many units, isolating failures per unit
///
/// The result vector is index-aligned with `units`; a failing unit yields
/// its error while its siblings still compile.
pub fn compile_units(
    units: &[SourceUnit],
    interner: &Interner,
) -> Vec<Result<CompiledUnit, CompileError>> {
    units
        .iter()
        .map(|unit| compile_unit(unit, interner))
        .collect()
}

/// Convenience entry point: compile one unit straight to text
///
/// # Errors
///
/// Wraps any per-unit [`CompileError`].
pub fn compile_to_text(unit: &SourceUnit, interner: &Interner) -> Result<String> {
    Ok(compile_unit(unit, interner)?.text)
}
