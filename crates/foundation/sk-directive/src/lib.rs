//! Compiler directives attached to declarations
//!
//! A declaration's leading comment may carry annotations of the shape
//! `[Kind]` or `[Kind: arg]`. Comment scanning is the host's job; this crate
//! receives the raw bracketed texts and parses them into [`Directive`]s.
//!
//! Recognized kinds:
//!
//! | Text | Directive |
//! |---|---|
//! | `[Name: lit]` | emit the declaration under the name `lit`, verbatim |
//! | `[Form: kw]` | define the function with the form `kw` instead of `defun` |
//! | `[Predicate]` | append `?` to the emitted name |
//! | `[NamedArguments]` | named-argument calling convention |
//! | `[Interactive]` | mark the emitted definition `(interactive)` |

use miette::Diagnostic;
use sk_intern::{Interner, Symbol};
use thiserror::Error;

/// A single parsed directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Override the emitted name entirely
    Rename(Symbol),
    /// Replace the defining keyword of an emitted function definition
    CustomForm(Symbol),
    /// Append a trailing `?` to the emitted name
    Predicate,
    /// Unpack a single record argument into keyword arguments at call sites
    NamedArguments,
    /// Emit an `(interactive)` marker in the definition
    Interactive,
}

impl Directive {
    /// Discriminant used for the last-one-wins rule
    fn kind(&self) -> DirectiveKind {
        match self {
            Self::Rename(_) => DirectiveKind::Rename,
            Self::CustomForm(_) => DirectiveKind::CustomForm,
            Self::Predicate => DirectiveKind::Predicate,
            Self::NamedArguments => DirectiveKind::NamedArguments,
            Self::Interactive => DirectiveKind::Interactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveKind {
    Rename,
    CustomForm,
    Predicate,
    NamedArguments,
    Interactive,
}

/// Errors from directive parsing
#[derive(Error, Debug, Clone, Diagnostic, PartialEq, Eq)]
pub enum DirectiveError {
    /// Directive kind is not one we recognize
    #[error("unknown directive kind in `{text}`")]
    #[diagnostic(
        code(directive::unknown_kind),
        help("recognized kinds are Name, Form, Predicate, NamedArguments and Interactive")
    )]
    UnknownKind {
        /// The raw directive text
        text: String,
    },

    /// Directive body does not match `[Kind]` / `[Kind: arg]`
    #[error("malformed directive `{text}`")]
    #[diagnostic(
        code(directive::malformed),
        help("directives have the form `[Kind]` or `[Kind: arg]`")
    )]
    Malformed {
        /// The raw directive text
        text: String,
    },
}

/// Parse one raw directive text (brackets included) into a [`Directive`]
///
/// # Errors
///
/// Returns [`DirectiveError::Malformed`] when the text does not match the
/// `[Kind]` / `[Kind: arg]` shape or carries the wrong argument count, and
/// [`DirectiveError::UnknownKind`] for an unrecognized kind. Both name the
/// offending raw text.
pub fn parse_directive(text: &str, interner: &Interner) -> Result<Directive, DirectiveError> {
    let malformed = || DirectiveError::Malformed {
        text: text.to_string(),
    };

    let body = text
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(malformed)?;

    let (kind, arg) = match body.split_once(':') {
        Some((kind, arg)) => {
            let arg = arg.trim();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                return Err(malformed());
            }
            (kind.trim(), Some(arg))
        }
        None => (body.trim(), None),
    };

    match (kind, arg) {
        ("Name", Some(arg)) => Ok(Directive::Rename(interner.intern(arg))),
        ("Form", Some(arg)) => Ok(Directive::CustomForm(interner.intern(arg))),
        ("Predicate", None) => Ok(Directive::Predicate),
        ("NamedArguments", None) => Ok(Directive::NamedArguments),
        ("Interactive", None) => Ok(Directive::Interactive),
        // Right kind, wrong argument count
        ("Name" | "Form" | "Predicate" | "NamedArguments" | "Interactive", _) => Err(malformed()),
        _ => Err(DirectiveError::UnknownKind {
            text: text.to_string(),
        }),
    }
}

/// The directives attached to one declaration
///
/// Directives of different kinds all apply; for duplicates of the same kind
/// the last one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveSet {
    directives: Vec<Directive>,
}

impl DirectiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every raw directive text attached to one declaration
    ///
    /// # Errors
    ///
    /// Propagates the first [`DirectiveError`] encountered.
    pub fn parse_all<'t>(
        texts: impl IntoIterator<Item = &'t str>,
        interner: &Interner,
    ) -> Result<Self, DirectiveError> {
        let mut set = Self::new();
        for text in texts {
            set.push(parse_directive(text, interner)?);
        }
        Ok(set)
    }

    /// Add a directive, replacing any earlier one of the same kind
    pub fn push(&mut self, directive: Directive) {
        self.directives
            .retain(|existing| existing.kind() != directive.kind());
        self.directives.push(directive);
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// The `[Name: …]` override, if any
    pub fn rename(&self) -> Option<Symbol> {
        self.directives.iter().find_map(|directive| match directive {
            Directive::Rename(name) => Some(*name),
            _ => None,
        })
    }

    /// The `[Form: …]` keyword, if any
    pub fn custom_form(&self) -> Option<Symbol> {
        self.directives.iter().find_map(|directive| match directive {
            Directive::CustomForm(keyword) => Some(*keyword),
            _ => None,
        })
    }

    pub fn is_predicate(&self) -> bool {
        self.directives.contains(&Directive::Predicate)
    }

    pub fn is_named_arguments(&self) -> bool {
        self.directives.contains(&Directive::NamedArguments)
    }

    pub fn is_interactive(&self) -> bool {
        self.directives.contains(&Directive::Interactive)
    }
}
