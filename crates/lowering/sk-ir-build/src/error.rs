//! Errors raised while building IR from concrete syntax

use miette::Diagnostic;
use sk_directive::DirectiveError;
use sk_resolve::ResolveError;
use sk_span::FileSpan;
use thiserror::Error;

/// Fatal errors for one compilation unit during IR construction
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum BuildError {
    /// The frontend handed us a construct this compiler does not translate
    #[error("unsupported construct `{kind}` at {span}")]
    #[diagnostic(
        code(build::unsupported_construct),
        help("this surface-language feature has no target-dialect translation")
    )]
    UnsupportedConstruct {
        /// Human-readable construct kind
        kind: String,
        /// Source location
        span: FileSpan,
    },

    /// A directive attached to a declaration failed to parse
    #[error(transparent)]
    #[diagnostic(transparent)]
    Directive(#[from] DirectiveError),

    /// The scope tree was driven past its root; indicates a builder bug
    #[error(transparent)]
    #[diagnostic(code(build::scope_tree))]
    Resolve(#[from] ResolveError),
}
