//! Grammar schema definitions for command-line syntax modeling.

use serde::{Deserialize, Serialize};

use crate::ArgumentArity;

/// Parsing style a program's grammar follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GrammarStyle {
    /// One flat option scope, no subcommands (getopt-style programs such as
    /// `pacman` or `ls`). Unknown options are a hard parse failure.
    Flat,
    /// Options plus recursive subcommand scopes (argparse-style programs
    /// such as `git` or `docker`).
    #[default]
    Hierarchical,
}

/// Schema for one argument: a flag, a valued option, or a positional.
///
/// The `spellings` list holds every accepted option form in order, with the
/// first entry being the canonical spelling (e.g. `["--message", "-m"]`).
/// An empty spelling list makes the argument positional; a non-empty list
/// never does.
///
/// # Examples
///
/// ```
/// use command_bridge_core::{ArgumentArity, ArgumentSchema};
///
/// let msg = ArgumentSchema::option("message", &["--message", "-m"], ArgumentArity::Fixed(1));
/// assert!(!msg.is_positional());
/// assert!(msg.matches("-m"));
/// assert_eq!(msg.canonical_spelling(), Some("--message"));
///
/// let targets = ArgumentSchema::positional("targets", ArgumentArity::ZeroOrMore);
/// assert!(targets.is_positional());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSchema {
    /// Logical name, also the placeholder name templates refer to.
    pub name: String,
    /// Accepted option spellings in order; first is canonical. Empty for
    /// positionals.
    #[serde(default)]
    pub spellings: Vec<String>,
    /// How many values this argument binds.
    pub arity: ArgumentArity,
    /// Whether a parse missing this argument fails validation.
    #[serde(default)]
    pub required: bool,
}

impl ArgumentSchema {
    /// Creates a boolean flag (arity `Fixed(0)`).
    pub fn flag(name: &str, spellings: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            spellings: spellings.iter().map(|s| s.to_string()).collect(),
            arity: ArgumentArity::Fixed(0),
            required: false,
        }
    }

    /// Creates a valued option.
    pub fn option(name: &str, spellings: &[&str], arity: ArgumentArity) -> Self {
        Self {
            name: name.to_string(),
            spellings: spellings.iter().map(|s| s.to_string()).collect(),
            arity,
            required: false,
        }
    }

    /// Creates a positional argument (no spellings).
    pub fn positional(name: &str, arity: ArgumentArity) -> Self {
        Self {
            name: name.to_string(),
            spellings: Vec::new(),
            arity,
            required: false,
        }
    }

    /// Marks the argument as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// A schema with no spellings is positional.
    pub fn is_positional(&self) -> bool {
        self.spellings.is_empty()
    }

    /// Returns `true` when the schema is an option binding no values.
    pub fn is_flag(&self) -> bool {
        !self.is_positional() && self.arity.is_flag()
    }

    /// Returns `true` when the schema is an option binding at least the
    /// possibility of a value.
    pub fn takes_value(&self) -> bool {
        !self.is_positional() && !self.arity.is_flag()
    }

    /// Checks whether `spelling` is one of this argument's accepted forms.
    pub fn matches(&self, spelling: &str) -> bool {
        self.spellings.iter().any(|s| s == spelling)
    }

    /// The canonical spelling (first listed), if any.
    pub fn canonical_spelling(&self) -> Option<&str> {
        self.spellings.first().map(String::as_str)
    }
}

/// Schema for a subcommand with its own argument and subcommand scopes.
///
/// Forms an owned recursive tree with no back-references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCommandSchema {
    /// Canonical subcommand name.
    pub name: String,
    /// Accepted aliases (matched exactly, no abbreviation).
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Arguments valid inside this subcommand's scope.
    #[serde(default)]
    pub arguments: Vec<ArgumentSchema>,
    /// Nested subcommands (e.g. `git remote add`).
    #[serde(default)]
    pub subcommands: Vec<SubCommandSchema>,
}

impl SubCommandSchema {
    /// Creates an empty subcommand schema.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds an argument to this scope.
    pub fn with_argument(mut self, argument: ArgumentSchema) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Adds a nested subcommand.
    pub fn with_subcommand(mut self, sub: SubCommandSchema) -> Self {
        self.subcommands.push(sub);
        self
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Checks whether `word` is this subcommand's name or one of its aliases.
    pub fn matches(&self, word: &str) -> bool {
        self.name == word || self.aliases.iter().any(|a| a == word)
    }
}

/// Complete declarative grammar for one program.
///
/// Built once from configuration, then shared read-only: parsing never
/// mutates a grammar, so one instance may serve any number of concurrent
/// parse calls.
///
/// # Examples
///
/// ```
/// use command_bridge_core::*;
///
/// let grammar = GrammarSchema::new("git", GrammarStyle::Hierarchical)
///     .with_subcommand(
///         SubCommandSchema::new("commit")
///             .with_argument(ArgumentSchema::option(
///                 "message",
///                 &["--message", "-m"],
///                 ArgumentArity::Fixed(1),
///             ))
///             .with_argument(ArgumentSchema::flag("all", &["--all", "-a"])),
///     );
///
/// assert!(grammar.find_subcommand("commit").is_some());
/// assert!(validate_grammar(&grammar).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarSchema {
    /// Program name (argv[0]).
    pub program: String,
    /// Parsing style.
    #[serde(default)]
    pub style: GrammarStyle,
    /// Top-level arguments.
    #[serde(default)]
    pub arguments: Vec<ArgumentSchema>,
    /// Top-level subcommands.
    #[serde(default)]
    pub subcommands: Vec<SubCommandSchema>,
}

impl GrammarSchema {
    /// Creates an empty grammar for `program`.
    pub fn new(program: &str, style: GrammarStyle) -> Self {
        Self {
            program: program.to_string(),
            style,
            ..Default::default()
        }
    }

    /// Adds a top-level argument.
    pub fn with_argument(mut self, argument: ArgumentSchema) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Adds a top-level subcommand.
    pub fn with_subcommand(mut self, sub: SubCommandSchema) -> Self {
        self.subcommands.push(sub);
        self
    }

    /// Finds a top-level subcommand by name or alias.
    pub fn find_subcommand(&self, word: &str) -> Option<&SubCommandSchema> {
        self.subcommands.iter().find(|s| s.matches(word))
    }

    /// Finds a top-level argument by option spelling.
    pub fn find_argument(&self, spelling: &str) -> Option<&ArgumentSchema> {
        self.arguments.iter().find(|a| a.matches(spelling))
    }

    /// Finds an argument by logical name anywhere in the grammar, walking
    /// subcommand scopes depth-first. Used when templates need the arity of
    /// a placeholder's argument.
    pub fn find_argument_by_name(&self, name: &str) -> Option<&ArgumentSchema> {
        fn walk<'a>(
            arguments: &'a [ArgumentSchema],
            subcommands: &'a [SubCommandSchema],
            name: &str,
        ) -> Option<&'a ArgumentSchema> {
            if let Some(found) = arguments.iter().find(|a| a.name == name) {
                return Some(found);
            }
            subcommands
                .iter()
                .find_map(|sub| walk(&sub.arguments, &sub.subcommands, name))
        }
        walk(&self.arguments, &self.subcommands, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spellings_decide_positional() {
        let opt = ArgumentSchema::option("output", &["-o"], ArgumentArity::Fixed(1));
        assert!(!opt.is_positional());

        let pos = ArgumentSchema::positional("files", ArgumentArity::OneOrMore);
        assert!(pos.is_positional());
        assert_eq!(pos.canonical_spelling(), None);
    }

    #[test]
    fn test_canonical_spelling_is_first_listed() {
        let arg = ArgumentSchema::flag("verbose", &["--verbose", "-v"]);
        assert_eq!(arg.canonical_spelling(), Some("--verbose"));
        assert!(arg.matches("-v"));
        assert!(arg.matches("--verbose"));
        assert!(!arg.matches("-x"));
    }

    #[test]
    fn test_subcommand_alias_match_is_exact() {
        let sub = SubCommandSchema::new("remove").with_alias("rm");
        assert!(sub.matches("remove"));
        assert!(sub.matches("rm"));
        assert!(!sub.matches("remo"));
    }

    #[test]
    fn test_find_argument_by_name_walks_subcommands() {
        let grammar = GrammarSchema::new("apt", GrammarStyle::Hierarchical).with_subcommand(
            SubCommandSchema::new("install")
                .with_argument(ArgumentSchema::positional("pkgs", ArgumentArity::OneOrMore)),
        );

        let found = grammar.find_argument_by_name("pkgs").unwrap();
        assert_eq!(found.arity, ArgumentArity::OneOrMore);
        assert!(grammar.find_argument_by_name("missing").is_none());
    }
}
