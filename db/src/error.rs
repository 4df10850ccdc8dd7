//! Error types for configuration loading and bundle persistence.

use command_bridge_core::{ConfigError, ValidationError};
use command_bridge_engine::TemplateError;
use thiserror::Error;

/// Errors that can occur while loading grammars, operations, or bundles.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed arity spec token in a grammar document.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An `include` directive references an id that is not defined.
    #[error("include references unknown id: {0}")]
    UnknownInclude(String),

    /// An `include` chain references itself, directly or transitively.
    #[error("include cycle through id: {0}")]
    IncludeCycle(String),

    /// An operations document names a program with no loaded grammar.
    #[error("no grammar loaded for program: {0}")]
    UnknownProgram(String),

    /// A format string failed to compile into a template.
    #[error("template for operation {operation} failed: {source}")]
    Template {
        operation: String,
        #[source]
        source: TemplateError,
    },

    /// A grammar or template library failed structural validation.
    #[error("validation failed: {}", .0.first().map(ToString::to_string).unwrap_or_default())]
    Invalid(Vec<ValidationError>),
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
