//! Error types for parsing and template building.

use thiserror::Error;

/// Errors raised while parsing an argument list against a grammar.
///
/// A failed parse returns no partial tree; the input is either accepted
/// whole or rejected. Grammar construction problems are not represented
/// here — malformed arity specs fail at schema build time with
/// [`ConfigError`](command_bridge_core::ConfigError).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `-`-prefixed token matched no spelling in scope. Raised by the
    /// flat strategy always, and by the hierarchical strategy only under
    /// [`UnknownOptionPolicy::Error`](crate::UnknownOptionPolicy::Error).
    #[error("unrecognized option: {0}")]
    UnrecognizedOption(String),

    /// An option ran out of input before satisfying its arity.
    #[error("option {spelling} is missing a required value")]
    MissingValue { spelling: String },

    /// A positional token appeared with no positional schema left to bind it.
    #[error("unexpected positional argument: {0}")]
    UnexpectedPositional(String),
}

/// Errors raised while building a [`CommandTemplate`] from a format string.
///
/// [`CommandTemplate`]: command_bridge_core::CommandTemplate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Format string contained no tokens.
    #[error("template format string is empty")]
    EmptyFormat,

    /// The synthetic example command did not parse under the grammar.
    #[error("template format did not parse: {0}")]
    Parse(#[from] ParseError),

    /// A `{name}` placeholder never landed in any parsed argument.
    #[error("placeholder {{{0}}} was not captured by any argument")]
    PlaceholderNotCaptured(String),
}
