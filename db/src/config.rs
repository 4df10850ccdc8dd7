//! On-disk grammar and operation document formats.
//!
//! These are the raw authoring shapes, parsed from JSON or YAML before
//! include resolution and arity parsing turn them into the core schema
//! types. Subcommand entries may carry an `id` and reference another
//! entry's arguments and subcommands through `include`.
//!
//! # Example YAML
//!
//! ```yaml
//! program: git
//! style: hierarchical
//! subcommands:
//!   - name: commit
//!     id: commit_base
//!     arguments:
//!       - name: message
//!         spellings: ["--message", "-m"]
//!         arity: "1"
//!       - name: all
//!         spellings: ["--all", "-a"]
//!         arity: "0"
//!   - name: commit-tree
//!     include: commit_base
//! ```

use std::collections::BTreeMap;

use command_bridge_core::{ArgumentArity, ArgumentSchema, GrammarStyle};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Raw grammar document for one program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarDoc {
    /// Program name (argv[0]).
    pub program: String,
    /// Parsing style; defaults to hierarchical.
    #[serde(default)]
    pub style: GrammarStyle,
    /// Top-level arguments.
    #[serde(default)]
    pub arguments: Vec<ArgumentDoc>,
    /// Top-level subcommand entries.
    #[serde(default)]
    pub subcommands: Vec<SubCommandDoc>,
}

/// Raw argument entry. The arity is authored as a spec token: digits,
/// `"+"`, `"*"`, or `"?"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentDoc {
    /// Logical name, also the placeholder name templates refer to.
    pub name: String,
    /// Accepted option spellings, first canonical; empty for positionals.
    #[serde(default)]
    pub spellings: Vec<String>,
    /// Arity spec token.
    pub arity: String,
    /// Whether the argument must appear for a parse to validate.
    #[serde(default)]
    pub required: bool,
}

impl ArgumentDoc {
    /// Converts to an [`ArgumentSchema`], parsing the arity spec token.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Config`](crate::LoadError::Config) when the
    /// arity token is malformed.
    pub fn to_schema(&self) -> Result<ArgumentSchema> {
        let arity: ArgumentArity = self.arity.parse()?;
        Ok(ArgumentSchema {
            name: self.name.clone(),
            spellings: self.spellings.clone(),
            arity,
            required: self.required,
        })
    }
}

/// Raw subcommand entry, possibly carrying reuse directives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubCommandDoc {
    /// Canonical subcommand name.
    pub name: String,
    /// Template id other entries may include.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Id of another entry whose arguments and subcommands this entry
    /// reuses. The entry's own non-empty lists take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    /// Accepted aliases.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Arguments in this scope.
    #[serde(default)]
    pub arguments: Vec<ArgumentDoc>,
    /// Nested subcommand entries.
    #[serde(default)]
    pub subcommands: Vec<SubCommandDoc>,
}

/// One destination format pair for an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDoc {
    /// Primary format string with `{name}` placeholders.
    pub format: String,
    /// Overriding final variant, preferred exclusively when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_format: Option<String>,
}

/// Operations document for one program: operation name to format pair.
///
/// Operation keys may be suffixed with the defining program
/// (`install_remote.pacman`); the suffix is stripped during compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationsDoc {
    /// Program the operations belong to.
    pub program: String,
    /// Operation key to formats, in stable order.
    #[serde(default)]
    pub operations: BTreeMap<String, OperationDoc>,
}

impl OperationsDoc {
    /// Strips a trailing `.program` qualifier from an operation key when it
    /// names this document's program.
    pub fn operation_name<'a>(&self, key: &'a str) -> &'a str {
        match key.rsplit_once('.') {
            Some((name, suffix)) if suffix == self.program => name,
            _ => key,
        }
    }
}
