//! Grammar and template-library validation.
//!
//! Validates structural invariants before schemas or libraries are used:
//! duplicate spellings, malformed option forms, subcommand cycles, and
//! template signature collisions.
//!
//! # Examples
//!
//! ```
//! use command_bridge_core::*;
//!
//! let mut grammar = GrammarSchema::new("pacman", GrammarStyle::Flat);
//! grammar.arguments.push(ArgumentSchema::flag("sync", &["-S", "--sync"]));
//! assert!(validate_grammar(&grammar).is_empty());
//!
//! // Invalid: spelling missing its leading dash
//! let mut bad = GrammarSchema::new("pacman", GrammarStyle::Flat);
//! bad.arguments.push(ArgumentSchema::flag("sync", &["S"]));
//! assert!(!validate_grammar(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ArgumentSchema, GrammarSchema, SubCommandSchema, TemplateLibrary};

/// Grammar/library validation errors.
///
/// Each variant describes a specific structural problem. The `Display` impl
/// provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Program name is empty or whitespace-only.
    #[error("grammar program name cannot be empty")]
    EmptyProgramName,
    /// An argument has an empty logical name.
    #[error("argument name cannot be empty")]
    EmptyArgumentName,
    /// An option spelling does not start with `-`.
    #[error("invalid option spelling: {0}")]
    InvalidSpelling(String),
    /// Two arguments in the same scope share a spelling.
    #[error("duplicate spelling in scope: {0}")]
    DuplicateSpelling(String),
    /// Two subcommands in the same scope share a name or alias.
    #[error("duplicate subcommand in scope: {0}")]
    DuplicateSubcommand(String),
    /// A subcommand path repeats a name (e.g. `git remote git`).
    #[error("subcommand cycle detected at path: {0}")]
    SubcommandCycle(String),
    /// A template's pattern root differs from its library's program.
    #[error("template for operation {operation} is rooted at {found}, library expects {expected}")]
    WrongProgramRoot {
        operation: String,
        expected: String,
        found: String,
    },
    /// Two templates in one library have identical structural signatures, so
    /// matching could never reach the second. An authoring error, rejected
    /// at build time.
    #[error("templates {first} and {second} have colliding structural signatures")]
    DuplicateSignature { first: String, second: String },
}

/// Validates a grammar schema.
///
/// Checks for empty names, malformed spellings, duplicate spellings and
/// subcommands per scope, and subcommand cycles. Returns all errors found,
/// stopping at the first error per scope.
pub fn validate_grammar(grammar: &GrammarSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if grammar.program.trim().is_empty() {
        errors.push(ValidationError::EmptyProgramName);
        return errors;
    }

    errors.extend(validate_arguments(&grammar.arguments));
    if !errors.is_empty() {
        return errors;
    }

    let mut path = vec![grammar.program.clone()];
    errors.extend(validate_subcommands(&grammar.subcommands, &mut path));

    errors
}

fn validate_subcommands(
    subcommands: &[SubCommandSchema],
    path: &mut Vec<String>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for sub in subcommands {
        let name = sub.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::DuplicateSubcommand("<empty>".to_string()));
            return errors;
        }

        for word in std::iter::once(name).chain(sub.aliases.iter().map(String::as_str)) {
            if !seen.insert(word) {
                errors.push(ValidationError::DuplicateSubcommand(word.to_string()));
                return errors;
            }
        }

        if path.iter().any(|segment| segment == name) {
            let cycle_path = path
                .iter()
                .cloned()
                .chain(std::iter::once(name.to_string()))
                .collect::<Vec<_>>()
                .join(" ");
            errors.push(ValidationError::SubcommandCycle(cycle_path));
            return errors;
        }

        errors.extend(validate_arguments(&sub.arguments));
        if !errors.is_empty() {
            return errors;
        }

        path.push(name.to_string());
        errors.extend(validate_subcommands(&sub.subcommands, path));
        path.pop();
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_arguments(arguments: &[ArgumentSchema]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for argument in arguments {
        if argument.name.trim().is_empty() {
            errors.push(ValidationError::EmptyArgumentName);
            return errors;
        }

        for spelling in &argument.spellings {
            if !spelling.starts_with('-') || spelling.len() < 2 {
                errors.push(ValidationError::InvalidSpelling(spelling.clone()));
                return errors;
            }
            if !seen.insert(spelling.clone()) {
                errors.push(ValidationError::DuplicateSpelling(spelling.clone()));
                return errors;
            }
        }
    }

    errors
}

/// Validates a template library.
///
/// Checks that every template is rooted at the library's program and that
/// no two templates share a structural signature. First structural match
/// wins at runtime, so a collision would make the later template
/// unreachable — that is an authoring error, caught here rather than
/// tie-broken at match time.
pub fn validate_library(library: &TemplateLibrary) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for template in &library.templates {
        if template.program() != library.program {
            errors.push(ValidationError::WrongProgramRoot {
                operation: template.operation.clone(),
                expected: library.program.clone(),
                found: template.program().to_string(),
            });
            return errors;
        }
    }

    for (i, first) in library.templates.iter().enumerate() {
        for second in &library.templates[i + 1..] {
            if first.pattern.structure_eq(&second.pattern) {
                errors.push(ValidationError::DuplicateSignature {
                    first: first.operation.clone(),
                    second: second.operation.clone(),
                });
                return errors;
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandArgument, CommandNode, CommandTemplate, GrammarStyle};

    #[test]
    fn test_validate_grammar_accepts_valid_schema() {
        let grammar = GrammarSchema::new("git", GrammarStyle::Hierarchical)
            .with_argument(ArgumentSchema::flag("version", &["--version"]))
            .with_subcommand(SubCommandSchema::new("commit"));

        assert!(validate_grammar(&grammar).is_empty());
    }

    #[test]
    fn test_validate_grammar_rejects_bad_spelling() {
        let grammar = GrammarSchema::new("git", GrammarStyle::Hierarchical)
            .with_argument(ArgumentSchema::flag("verbose", &["v"]));

        assert_eq!(
            validate_grammar(&grammar),
            vec![ValidationError::InvalidSpelling("v".to_string())]
        );
    }

    #[test]
    fn test_validate_grammar_rejects_duplicate_spelling() {
        let grammar = GrammarSchema::new("tool", GrammarStyle::Flat)
            .with_argument(ArgumentSchema::flag("verbose", &["-v"]))
            .with_argument(ArgumentSchema::flag("version", &["-v"]));

        assert_eq!(
            validate_grammar(&grammar),
            vec![ValidationError::DuplicateSpelling("-v".to_string())]
        );
    }

    #[test]
    fn test_validate_grammar_rejects_subcommand_cycle() {
        let mut remote = SubCommandSchema::new("remote");
        remote.subcommands.push(SubCommandSchema::new("git"));
        let grammar =
            GrammarSchema::new("git", GrammarStyle::Hierarchical).with_subcommand(remote);

        assert_eq!(
            validate_grammar(&grammar),
            vec![ValidationError::SubcommandCycle("git remote git".to_string())]
        );
    }

    #[test]
    fn test_validate_grammar_rejects_duplicate_alias() {
        let grammar = GrammarSchema::new("git", GrammarStyle::Hierarchical)
            .with_subcommand(SubCommandSchema::new("remove").with_alias("rm"))
            .with_subcommand(SubCommandSchema::new("rm"));

        assert_eq!(
            validate_grammar(&grammar),
            vec![ValidationError::DuplicateSubcommand("rm".to_string())]
        );
    }

    fn template(operation: &str, pattern: CommandNode) -> CommandTemplate {
        CommandTemplate {
            operation: operation.to_string(),
            format: String::new(),
            pattern,
        }
    }

    #[test]
    fn test_validate_library_rejects_colliding_signatures() {
        let mut pattern_a = CommandNode::new("pacman");
        pattern_a.arguments.push(CommandArgument::flag("-S"));
        let pattern_b = pattern_a.clone();

        let library = TemplateLibrary {
            program: "pacman".to_string(),
            templates: vec![template("install", pattern_a), template("sync", pattern_b)],
        };

        assert_eq!(
            validate_library(&library),
            vec![ValidationError::DuplicateSignature {
                first: "install".to_string(),
                second: "sync".to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_library_accepts_distinct_signatures() {
        let mut pattern_a = CommandNode::new("pacman");
        pattern_a.arguments.push(CommandArgument::flag("-S"));
        let mut pattern_b = CommandNode::new("pacman");
        pattern_b.arguments.push(CommandArgument::flag("-R"));

        let library = TemplateLibrary {
            program: "pacman".to_string(),
            templates: vec![template("install", pattern_a), template("remove", pattern_b)],
        };

        assert!(validate_library(&library).is_empty());
    }

    #[test]
    fn test_validate_library_rejects_wrong_root() {
        let library = TemplateLibrary {
            program: "pacman".to_string(),
            templates: vec![template("install", CommandNode::new("apt"))],
        };

        let errors = validate_library(&library);
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::WrongProgramRoot { .. }]
        ));
    }
}
