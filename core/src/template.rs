//! Command templates and the destination format-string table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::CommandNode;

/// A compiled command template: a pattern tree with tagged placeholder
/// positions, tied to a portable operation name and the format string it
/// was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTemplate {
    /// Portable operation name shared across programs (e.g. `install_remote`).
    pub operation: String,
    /// Format string the pattern was built from, with `{name}` placeholders.
    pub format: String,
    /// Pattern tree whose tagged arguments mark placeholder positions.
    pub pattern: CommandNode,
}

impl CommandTemplate {
    /// The program this template's pattern is rooted at.
    pub fn program(&self) -> &str {
        &self.pattern.name
    }
}

/// Template library for one source program, matched in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLibrary {
    /// Source program every template in this library is rooted at.
    pub program: String,
    /// Templates in authoring order; the first structural match wins.
    pub templates: Vec<CommandTemplate>,
}

impl TemplateLibrary {
    /// Creates an empty library for `program`.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            templates: Vec::new(),
        }
    }

    /// Number of templates in the library.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` when the library holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Destination format strings for one (operation, program) pair.
///
/// When `final_format` is present it is preferred exclusively over `format`
/// at generation time; the two are never combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatEntry {
    /// Primary format string with `{name}` placeholders.
    pub format: String,
    /// Overriding final variant, preferred exclusively when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_format: Option<String>,
}

impl FormatEntry {
    /// Creates an entry with only a primary format.
    pub fn new(format: &str) -> Self {
        Self {
            format: format.to_string(),
            final_format: None,
        }
    }

    /// Adds a final-variant format.
    pub fn with_final(mut self, final_format: &str) -> Self {
        self.final_format = Some(final_format.to_string());
        self
    }

    /// The format string generation should use: the final variant when one
    /// exists, otherwise the primary.
    pub fn effective_format(&self) -> &str {
        self.final_format.as_deref().unwrap_or(&self.format)
    }
}

/// Destination format strings keyed by (operation, destination program).
///
/// # Examples
///
/// ```
/// use command_bridge_core::{FormatEntry, FormatTable};
///
/// let mut table = FormatTable::default();
/// table.insert("pacman", "install_remote", FormatEntry::new("pacman -S {pkgs}"));
///
/// let entry = table.lookup("install_remote", "pacman").unwrap();
/// assert_eq!(entry.effective_format(), "pacman -S {pkgs}");
/// assert!(table.lookup("install_remote", "apt").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatTable {
    /// program → operation → formats. BTreeMap keeps serialized output
    /// stable across runs.
    entries: BTreeMap<String, BTreeMap<String, FormatEntry>>,
}

impl FormatTable {
    /// Inserts (replacing) the formats for `(operation, program)`.
    pub fn insert(&mut self, program: &str, operation: &str, entry: FormatEntry) {
        self.entries
            .entry(program.to_string())
            .or_default()
            .insert(operation.to_string(), entry);
    }

    /// Looks up the formats for `(operation, program)`.
    pub fn lookup(&self, operation: &str, program: &str) -> Option<&FormatEntry> {
        self.entries.get(program)?.get(operation)
    }

    /// Iterates over destination program names.
    pub fn programs(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over the operations defined for `program`.
    pub fn operations(&self, program: &str) -> impl Iterator<Item = &str> {
        self.entries
            .get(program)
            .into_iter()
            .flat_map(|ops| ops.keys().map(String::as_str))
    }

    /// Total number of (operation, program) entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
