//! Persistence for compiled template libraries.
//!
//! A [`TemplateBundle`] snapshots the output of
//! [`GrammarSet::compile`](crate::GrammarSet::compile) so compiled
//! libraries survive between runs instead of being rebuilt from the
//! operation documents every time.

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use command_bridge_core::{FormatTable, TemplateLibrary, validate_library};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LoadError, Result};

/// Versioned snapshot of compiled template libraries and the format table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateBundle {
    /// Version of the tool that produced the bundle.
    pub version: String,
    /// Build timestamp string, as supplied by the producer.
    pub generated_at: String,
    /// Program name to compiled template library.
    #[serde(default)]
    pub libraries: BTreeMap<String, TemplateLibrary>,
    /// Destination format strings keyed by (operation, program).
    #[serde(default)]
    pub formats: FormatTable,
}

impl TemplateBundle {
    /// Creates an empty bundle with the given provenance.
    pub fn new(version: &str, generated_at: &str) -> Self {
        Self {
            version: version.to_string(),
            generated_at: generated_at.to_string(),
            ..Default::default()
        }
    }

    /// Looks up the compiled library for a source program.
    pub fn library(&self, program: &str) -> Option<&TemplateLibrary> {
        self.libraries.get(program)
    }

    /// Writes the bundle as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        debug!(path = %path.as_ref().display(), libraries = self.libraries.len(), "saved bundle");
        Ok(())
    }

    /// Reads a bundle from JSON, re-validating every library on load.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Invalid`] when a persisted library no longer
    /// passes validation (e.g. a hand-edited bundle with colliding
    /// signatures).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let bundle: Self = serde_json::from_reader(reader)?;

        for library in bundle.libraries.values() {
            let errors = validate_library(library);
            if !errors.is_empty() {
                return Err(LoadError::Invalid(errors));
            }
        }
        debug!(path = %path.as_ref().display(), libraries = bundle.libraries.len(), "loaded bundle");
        Ok(bundle)
    }
}
