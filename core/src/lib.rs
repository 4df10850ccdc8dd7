//! Core types and validation for cross-program command translation.
//!
//! This crate defines the data model shared by the parsing engine and the
//! configuration loaders:
//!
//! - [`GrammarSchema`] — declarative description of one program's options
//!   and subcommands, with a [`GrammarStyle`] selecting flat or
//!   hierarchical parsing.
//! - [`ArgumentSchema`] / [`SubCommandSchema`] — per-argument spellings and
//!   [`ArgumentArity`], and the owned recursive subcommand tree.
//! - [`CommandNode`] / [`CommandArgument`] — the parsed command tree, with
//!   values-blind [`CommandNode::structure_eq`] used for template matching.
//! - [`CommandTemplate`] / [`TemplateLibrary`] — compiled patterns with
//!   placeholder tags, grouped per source program.
//! - [`FormatTable`] — destination format strings keyed by
//!   (operation, program), with an exclusive final-variant override.
//!
//! Validation ([`validate_grammar`], [`validate_library`]) catches
//! structural authoring errors such as duplicate spellings, subcommand
//! cycles, and colliding template signatures.
//!
//! Everything here is immutable after construction: grammars, templates,
//! and format tables are built once by a loader and then shared read-only
//! across any number of parse/match/generate calls.
//!
//! # Example
//!
//! ```
//! use command_bridge_core::*;
//!
//! let grammar = GrammarSchema::new("pacman", GrammarStyle::Flat)
//!     .with_argument(ArgumentSchema::flag("sync", &["-S", "--sync"]))
//!     .with_argument(ArgumentSchema::positional("targets", ArgumentArity::ZeroOrMore));
//!
//! assert!(grammar.find_argument("--sync").is_some());
//! assert!(validate_grammar(&grammar).is_empty());
//! ```

mod arity;
mod command;
mod template;
mod types;
mod validate;

pub use arity::{ArgumentArity, ConfigError};
pub use command::{ArgumentKind, CommandArgument, CommandNode};
pub use template::{CommandTemplate, FormatEntry, FormatTable, TemplateLibrary};
pub use types::{ArgumentSchema, GrammarSchema, GrammarStyle, SubCommandSchema};
pub use validate::{ValidationError, validate_grammar, validate_library};
