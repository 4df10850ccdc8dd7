//! Grammar set loading, include resolution, and template compilation.
//!
//! [`GrammarSet`] is the in-memory collection of resolved grammars, loaded
//! from a directory of JSON/YAML documents and indexed by program name.
//! Include directives are resolved before conversion: each `include` pulls
//! the referenced entry's arguments and subcommands, and a visited path
//! rejects self- or cyclic references instead of recursing indefinitely.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use command_bridge_core::{
    FormatEntry, FormatTable, GrammarSchema, SubCommandSchema, TemplateLibrary, validate_grammar,
    validate_library,
};
use command_bridge_engine::build_template;
use tracing::debug;

use crate::config::{GrammarDoc, OperationsDoc, SubCommandDoc};
use crate::error::{LoadError, Result};

/// In-memory collection of resolved grammars with lookup by program name.
///
/// # Examples
///
/// ```no_run
/// use command_bridge_db::GrammarSet;
///
/// let set = GrammarSet::from_dir("configs/grammars/").unwrap();
/// if let Some(grammar) = set.get("pacman") {
///     println!("pacman has {} top-level arguments", grammar.arguments.len());
/// }
/// ```
#[derive(Debug, Default)]
pub struct GrammarSet {
    grammars: HashMap<String, GrammarSchema>,
}

impl GrammarSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json`, `*.yaml`, and `*.yml` grammar document in a
    /// directory, resolving includes and validating each grammar.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the directory cannot be read,
    /// [`LoadError::Json`]/[`LoadError::Yaml`] on malformed documents,
    /// [`LoadError::IncludeCycle`]/[`LoadError::UnknownInclude`] on bad
    /// include directives, and [`LoadError::Invalid`] when a resolved
    /// grammar fails validation.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let mut set = Self::new();
        for entry in std::fs::read_dir(path.as_ref())? {
            let file_path = entry?.path();
            let extension = file_path.extension().and_then(|e| e.to_str());
            if matches!(extension, Some("json" | "yaml" | "yml")) {
                let grammar = load_grammar_file(&file_path)?;
                debug!(program = %grammar.program, path = %file_path.display(), "loaded grammar");
                set.insert(grammar);
            }
        }
        Ok(set)
    }

    /// Inserts a grammar, replacing any existing entry for its program.
    pub fn insert(&mut self, grammar: GrammarSchema) {
        self.grammars.insert(grammar.program.clone(), grammar);
    }

    /// Looks up a grammar by program name.
    pub fn get(&self, program: &str) -> Option<&GrammarSchema> {
        self.grammars.get(program)
    }

    /// Returns `true` if the set contains a grammar for `program`.
    pub fn contains(&self, program: &str) -> bool {
        self.grammars.contains_key(program)
    }

    /// Number of grammars in the set.
    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    /// Returns `true` when the set holds no grammars.
    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }

    /// Iterates over program names.
    pub fn programs(&self) -> impl Iterator<Item = &str> {
        self.grammars.keys().map(String::as_str)
    }

    /// Compiles operation documents against the loaded grammars into
    /// per-program template libraries and one format table.
    ///
    /// Each operation's format string compiles to a source-side template
    /// under its program's grammar, and the same pair lands in the format
    /// table for the destination side. Libraries are validated after
    /// compilation, rejecting colliding structural signatures.
    pub fn compile(
        &self,
        docs: &[OperationsDoc],
    ) -> Result<(BTreeMap<String, TemplateLibrary>, FormatTable)> {
        let mut libraries = BTreeMap::new();
        let mut formats = FormatTable::default();

        for doc in docs {
            let grammar = self
                .get(&doc.program)
                .ok_or_else(|| LoadError::UnknownProgram(doc.program.clone()))?;

            let mut library = TemplateLibrary::new(&doc.program);
            for (key, operation) in &doc.operations {
                let name = doc.operation_name(key);
                let template =
                    build_template(name, &operation.format, grammar).map_err(|source| {
                        LoadError::Template {
                            operation: name.to_string(),
                            source,
                        }
                    })?;
                library.templates.push(template);

                let mut entry = FormatEntry::new(&operation.format);
                if let Some(final_format) = &operation.final_format {
                    entry = entry.with_final(final_format);
                }
                formats.insert(&doc.program, name, entry);
            }

            let errors = validate_library(&library);
            if !errors.is_empty() {
                return Err(LoadError::Invalid(errors));
            }
            debug!(program = %doc.program, templates = library.len(), "compiled operation library");
            libraries.insert(doc.program.clone(), library);
        }

        Ok((libraries, formats))
    }
}

/// Loads and resolves a single grammar document, JSON or YAML by extension.
pub fn load_grammar_file(path: impl AsRef<Path>) -> Result<GrammarSchema> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let doc: GrammarDoc = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&text)?
    } else {
        serde_yaml::from_str(&text)?
    };
    let grammar = resolve_grammar(&doc)?;

    let errors = validate_grammar(&grammar);
    if !errors.is_empty() {
        return Err(LoadError::Invalid(errors));
    }
    Ok(grammar)
}

/// Loads every operations document in a directory.
pub fn load_operations_dir(path: impl AsRef<Path>) -> Result<Vec<OperationsDoc>> {
    let mut docs = Vec::new();
    for entry in std::fs::read_dir(path.as_ref())? {
        let file_path = entry?.path();
        let extension = file_path.extension().and_then(|e| e.to_str());
        if matches!(extension, Some("json" | "yaml" | "yml")) {
            docs.push(load_operations_file(&file_path)?);
        }
    }
    docs.sort_by(|a, b| a.program.cmp(&b.program));
    Ok(docs)
}

/// Loads a single operations document, JSON or YAML by extension.
pub fn load_operations_file(path: impl AsRef<Path>) -> Result<OperationsDoc> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let doc = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&text)?
    } else {
        serde_yaml::from_str(&text)?
    };
    Ok(doc)
}

/// Resolves include directives in a raw grammar document and converts it
/// into a [`GrammarSchema`].
pub fn resolve_grammar(doc: &GrammarDoc) -> Result<GrammarSchema> {
    let mut templates = BTreeMap::new();
    collect_templates(&doc.subcommands, &mut templates);
    resolve_templates(&mut templates)?;

    let mut grammar = GrammarSchema::new(&doc.program, doc.style);
    for argument in &doc.arguments {
        grammar.arguments.push(argument.to_schema()?);
    }
    for sub in &doc.subcommands {
        grammar
            .subcommands
            .push(convert_subcommand(sub, &templates)?);
    }
    Ok(grammar)
}

fn collect_templates(subs: &[SubCommandDoc], templates: &mut BTreeMap<String, SubCommandDoc>) {
    for sub in subs {
        if let Some(id) = &sub.id {
            templates.insert(id.clone(), sub.clone());
        }
        collect_templates(&sub.subcommands, templates);
    }
}

/// Resolves every template's include chain up front so later per-node
/// resolution copies from already-final data.
fn resolve_templates(templates: &mut BTreeMap<String, SubCommandDoc>) -> Result<()> {
    let ids: Vec<String> = templates.keys().cloned().collect();
    let mut done = HashSet::new();
    for id in &ids {
        resolve_template(id, templates, &mut done, &mut Vec::new())?;
    }
    Ok(())
}

fn resolve_template(
    id: &str,
    templates: &mut BTreeMap<String, SubCommandDoc>,
    done: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Result<()> {
    if done.contains(id) {
        return Ok(());
    }
    if path.iter().any(|p| p == id) {
        return Err(LoadError::IncludeCycle(id.to_string()));
    }
    path.push(id.to_string());

    let include = templates.get(id).and_then(|t| t.include.clone());
    if let Some(target) = include {
        if !templates.contains_key(&target) {
            return Err(LoadError::UnknownInclude(target));
        }
        resolve_template(&target, templates, done, path)?;

        let resolved = templates.get(&target).cloned();
        if let (Some(resolved), Some(entry)) = (resolved, templates.get_mut(id)) {
            merge_include(entry, &resolved);
            entry.include = None;
        }
    }

    path.pop();
    done.insert(id.to_string());
    Ok(())
}

/// Pulls the template's arguments and subcommands into `entry` where the
/// entry provides none of its own.
fn merge_include(entry: &mut SubCommandDoc, template: &SubCommandDoc) {
    if entry.arguments.is_empty() {
        entry.arguments = template.arguments.clone();
    }
    if entry.subcommands.is_empty() {
        entry.subcommands = template.subcommands.clone();
    }
}

fn convert_subcommand(
    doc: &SubCommandDoc,
    templates: &BTreeMap<String, SubCommandDoc>,
) -> Result<SubCommandSchema> {
    let merged;
    let doc = match &doc.include {
        Some(target) => {
            let template = templates
                .get(target)
                .ok_or_else(|| LoadError::UnknownInclude(target.clone()))?;
            let mut entry = doc.clone();
            merge_include(&mut entry, template);
            entry.include = None;
            merged = entry;
            &merged
        }
        None => doc,
    };

    let mut sub = SubCommandSchema::new(&doc.name);
    sub.aliases = doc.aliases.clone();
    for argument in &doc.arguments {
        sub.arguments.push(argument.to_schema()?);
    }
    for nested in &doc.subcommands {
        sub.subcommands.push(convert_subcommand(nested, templates)?);
    }
    Ok(sub)
}
