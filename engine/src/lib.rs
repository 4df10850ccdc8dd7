//! Grammar-driven command parsing, structural template matching, and
//! destination command generation.
//!
//! The pipeline runs in four stages, each usable on its own:
//!
//! 1. [`tokenize`] / [`parse`] — classify a raw argument list against a
//!    [`GrammarSchema`](command_bridge_core::GrammarSchema) and bind it into
//!    a [`CommandNode`](command_bridge_core::CommandNode) tree, flat or
//!    hierarchical per the grammar's style.
//! 2. [`build_template`] — compile an operation's format string into a
//!    pattern tree with tagged placeholder positions.
//! 3. [`find_match`] / [`extract_parameters`] — match a parsed command
//!    against a [`TemplateLibrary`](command_bridge_core::TemplateLibrary)
//!    values-blind and pull the parameter values out of the source command.
//! 4. [`generate`] — substitute the parameters into the destination's
//!    format string, preferring a final variant when one is defined.
//!
//! # Example
//!
//! ```
//! use command_bridge_core::*;
//! use command_bridge_engine::{build_template, generate, match_and_extract, parse};
//!
//! let grammar = GrammarSchema::new("pacman", GrammarStyle::Flat)
//!     .with_argument(ArgumentSchema::flag("sync", &["-S", "--sync"]))
//!     .with_argument(ArgumentSchema::positional("targets", ArgumentArity::ZeroOrMore));
//!
//! let mut library = TemplateLibrary::new("pacman");
//! library
//!     .templates
//!     .push(build_template("install_remote", "pacman -S {pkgs}", &grammar).unwrap());
//!
//! let mut formats = FormatTable::default();
//! formats.insert("apt", "install_remote", FormatEntry::new("apt install {pkgs}"));
//!
//! let args: Vec<String> = ["pacman", "-S", "vim"].iter().map(|s| s.to_string()).collect();
//! let node = parse(&args, &grammar).unwrap();
//! let call = match_and_extract(&node, &library).unwrap();
//! let rendered = generate(&formats, &call.operation, "apt", &call.params).unwrap();
//!
//! assert_eq!(rendered.command, "apt install vim");
//! ```

mod error;
mod generate;
mod matcher;
mod parse;
mod template;
mod token;

pub use error::{ParseError, TemplateError};
pub use generate::{Rendered, generate, render, render_entry};
pub use matcher::{OperationCall, extract_parameters, find_match, match_and_extract};
pub use parse::{ParseOptions, UnknownOptionPolicy, parse, parse_with, satisfies_required};
pub use template::{build_library, build_template};
pub use token::{Lexeme, Token, tokenize, tokenize_arguments};
