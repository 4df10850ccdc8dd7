//! Configuration loading, template compilation, and context assembly for
//! cross-program command translation.
//!
//! This crate turns authored configuration into the immutable objects the
//! engine consumes:
//!
//! - [`GrammarSet`] — resolved grammars loaded from a directory of
//!   JSON/YAML documents, with `id`/`include` reuse directives resolved
//!   (cycles rejected) before validation.
//! - [`GrammarSet::compile`] — operation documents compiled into per-program
//!   [`TemplateLibrary`](command_bridge_core::TemplateLibrary) values and
//!   one [`FormatTable`](command_bridge_core::FormatTable).
//! - [`TemplateBundle`] — versioned JSON persistence for compiled
//!   libraries, validated on load.
//! - [`BridgeContext`] — the explicit context holding grammars, libraries,
//!   and formats; exposes [`translate`](BridgeContext::translate) running
//!   the whole parse/match/generate pipeline.
//!
//! # Quick start
//!
//! ```no_run
//! use command_bridge_db::{BridgeContext, GrammarSet, load_operations_file};
//!
//! let grammars = GrammarSet::from_dir("configs/grammars/").unwrap();
//! let operations = vec![
//!     load_operations_file("configs/operations/apt.yaml").unwrap(),
//!     load_operations_file("configs/operations/pacman.yaml").unwrap(),
//! ];
//! let (libraries, formats) = grammars.compile(&operations).unwrap();
//! let context = BridgeContext::new(grammars, libraries, formats);
//!
//! let args: Vec<String> = ["apt", "install", "vim"].iter().map(|s| s.to_string()).collect();
//! if let Some(rendered) = context.translate(&args, "pacman").unwrap() {
//!     println!("{}", rendered.command);
//! }
//! ```

mod bundle;
mod config;
mod context;
mod error;
mod loader;

pub use bundle::TemplateBundle;
pub use config::{ArgumentDoc, GrammarDoc, OperationDoc, OperationsDoc, SubCommandDoc};
pub use context::{BridgeContext, TranslateError};
pub use error::{LoadError, Result};
pub use loader::{
    GrammarSet, load_grammar_file, load_operations_dir, load_operations_file, resolve_grammar,
};
