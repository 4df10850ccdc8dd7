//! The explicit translation context.
//!
//! [`BridgeContext`] holds the grammars, compiled template libraries, and
//! the destination format table, and is passed into every call. There is
//! no ambient global state: two contexts loaded from different
//! configuration directories are fully independent.

use std::collections::BTreeMap;

use command_bridge_core::{CommandNode, FormatTable, TemplateLibrary};
use command_bridge_engine::{
    OperationCall, ParseError, ParseOptions, Rendered, match_and_extract, parse_with,
    render_entry, satisfies_required,
};
use thiserror::Error;
use tracing::debug;

use crate::bundle::TemplateBundle;
use crate::loader::GrammarSet;

/// Errors surfaced by [`BridgeContext::translate`].
///
/// A missing mapping is not an error; `translate` returns `Ok(None)` for
/// source commands no template recognizes.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The source command names a program with no loaded grammar.
    #[error("no grammar for program: {0}")]
    UnknownProgram(String),

    /// The source command failed to parse under its grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Immutable translation context: grammars, template libraries, formats.
///
/// # Examples
///
/// ```no_run
/// use command_bridge_db::{BridgeContext, GrammarSet, TemplateBundle};
///
/// let grammars = GrammarSet::from_dir("configs/grammars/").unwrap();
/// let bundle = TemplateBundle::load("cache/bundle.json").unwrap();
/// let context = BridgeContext::from_bundle(grammars, bundle);
///
/// let args: Vec<String> = ["apt", "install", "vim"].iter().map(|s| s.to_string()).collect();
/// match context.translate(&args, "pacman").unwrap() {
///     Some(rendered) => println!("{}", rendered.command),
///     None => println!("no mapping"),
/// }
/// ```
#[derive(Debug)]
pub struct BridgeContext {
    grammars: GrammarSet,
    libraries: BTreeMap<String, TemplateLibrary>,
    formats: FormatTable,
    options: ParseOptions,
}

impl BridgeContext {
    /// Assembles a context from already-compiled parts.
    pub fn new(
        grammars: GrammarSet,
        libraries: BTreeMap<String, TemplateLibrary>,
        formats: FormatTable,
    ) -> Self {
        Self {
            grammars,
            libraries,
            formats,
            options: ParseOptions::default(),
        }
    }

    /// Assembles a context from a persisted bundle.
    pub fn from_bundle(grammars: GrammarSet, bundle: TemplateBundle) -> Self {
        Self::new(grammars, bundle.libraries, bundle.formats)
    }

    /// Overrides the parse options used for source commands.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// The loaded grammars.
    pub fn grammars(&self) -> &GrammarSet {
        &self.grammars
    }

    /// The destination format table.
    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    /// Parses a source command under the grammar its first token names.
    pub fn parse_source(&self, args: &[String]) -> Result<CommandNode, TranslateError> {
        let program = args.first().map(String::as_str).unwrap_or_default();
        let grammar = self
            .grammars
            .get(program)
            .ok_or_else(|| TranslateError::UnknownProgram(program.to_string()))?;
        Ok(parse_with(args, grammar, self.options)?)
    }

    /// Matches a parsed source command against its program's template
    /// library. `None` when no library or no template recognizes it.
    pub fn recognize(&self, node: &CommandNode) -> Option<OperationCall> {
        let library = self.libraries.get(&node.name)?;
        match_and_extract(node, library)
    }

    /// Translates a source command line into `dest_program`'s equivalent.
    ///
    /// Runs parse, required-argument validation, structural matching,
    /// format lookup, and generation. Returns `Ok(None)` when any stage
    /// finds no mapping; only parse failures and unknown source programs
    /// are errors.
    pub fn translate(
        &self,
        args: &[String],
        dest_program: &str,
    ) -> Result<Option<Rendered>, TranslateError> {
        let Some(program) = args.first() else {
            return Ok(None);
        };
        let grammar = self
            .grammars
            .get(program)
            .ok_or_else(|| TranslateError::UnknownProgram(program.clone()))?;

        let node = parse_with(args, grammar, self.options)?;
        if !satisfies_required(&node, grammar) {
            debug!(program = %program, "required arguments missing, no mapping");
            return Ok(None);
        }

        let Some(call) = self.recognize(&node) else {
            debug!(program = %program, "no template matched");
            return Ok(None);
        };

        let Some(entry) = self.formats.lookup(&call.operation, dest_program) else {
            debug!(
                operation = %call.operation,
                dest = %dest_program,
                "no destination format for operation"
            );
            return Ok(None);
        };

        Ok(Some(render_entry(entry, &call.params)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OperationsDoc;
    use crate::loader::resolve_grammar;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn package_context() -> BridgeContext {
        let mut grammars = GrammarSet::new();
        grammars.insert(
            resolve_grammar(
                &serde_yaml::from_str(
                    r#"
program: apt
subcommands:
  - name: install
    arguments:
      - name: assume_yes
        spellings: ["-y", "--yes"]
        arity: "0"
      - name: pkgs
        arity: "+"
"#,
                )
                .unwrap(),
            )
            .unwrap(),
        );
        grammars.insert(
            resolve_grammar(
                &serde_yaml::from_str(
                    r#"
program: pacman
style: flat
arguments:
  - name: sync
    spellings: ["-S", "--sync"]
    arity: "0"
  - name: refresh
    spellings: ["-y", "--refresh"]
    arity: "0"
  - name: sysupgrade
    spellings: ["-u", "--sysupgrade"]
    arity: "0"
  - name: noconfirm
    spellings: ["--noconfirm"]
    arity: "0"
  - name: targets
    arity: "*"
"#,
                )
                .unwrap(),
            )
            .unwrap(),
        );

        let docs: Vec<OperationsDoc> = vec![
            serde_yaml::from_str(
                r#"
program: apt
operations:
  install_remote:
    format: "apt install {pkgs}"
  install_remote_yes:
    format: "apt install -y {pkgs}"
"#,
            )
            .unwrap(),
            serde_yaml::from_str(
                r#"
program: pacman
operations:
  install_remote:
    format: "pacman -S {pkgs}"
  install_remote_yes:
    format: "pacman -S --noconfirm {pkgs}"
    final_format: "pacman -S --noconfirm --needed {pkgs}"
"#,
            )
            .unwrap(),
        ];

        let (libraries, formats) = grammars.compile(&docs).unwrap();
        BridgeContext::new(grammars, libraries, formats)
    }

    #[test]
    fn test_translate_apt_to_pacman() {
        let context = package_context();
        let rendered = context
            .translate(&args(&["apt", "install", "vim", "git"]), "pacman")
            .unwrap()
            .unwrap();
        assert_eq!(rendered.command, "pacman -S vim git");
    }

    #[test]
    fn test_translate_prefers_final_variant() {
        let context = package_context();
        let rendered = context
            .translate(&args(&["apt", "install", "-y", "vim"]), "pacman")
            .unwrap()
            .unwrap();
        assert_eq!(rendered.command, "pacman -S --noconfirm --needed vim");
    }

    #[test]
    fn test_translate_pacman_to_apt() {
        let context = package_context();
        let rendered = context
            .translate(&args(&["pacman", "-S", "htop"]), "apt")
            .unwrap()
            .unwrap();
        assert_eq!(rendered.command, "apt install htop");
    }

    #[test]
    fn test_unmapped_command_is_none_not_error() {
        let context = package_context();
        // Parses fine but matches no template: flag set no pattern has.
        let result = context
            .translate(&args(&["pacman", "-Syu"]), "apt")
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_unknown_source_program_is_error() {
        let context = package_context();
        let err = context
            .translate(&args(&["zypper", "install", "vim"]), "pacman")
            .unwrap_err();
        assert!(matches!(err, TranslateError::UnknownProgram(p) if p == "zypper"));
    }

    #[test]
    fn test_unknown_destination_is_none() {
        let context = package_context();
        let result = context
            .translate(&args(&["apt", "install", "vim"]), "dnf")
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_empty_input_is_none() {
        let context = package_context();
        assert!(context.translate(&[], "pacman").unwrap().is_none());
    }
}
