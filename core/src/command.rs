//! Parsed command trees and their values-blind structural equality.

use serde::{Deserialize, Serialize};

fn is_one(repeat: &usize) -> bool {
    *repeat == 1
}

fn default_repeat() -> usize {
    1
}

/// Classification of one parsed argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    /// Boolean option, no values, may repeat (`-v -v`).
    Flag,
    /// Valued option.
    Option,
    /// Positional values.
    Positional,
    /// Raw pass-through content after `--`.
    Extra,
}

/// One argument in a parsed command tree.
///
/// `spelling` carries the canonical option form for flags and options and is
/// absent for positionals and extras. `placeholder` is set only on template
/// patterns and marks where a parameter is captured; it never participates
/// in structural comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArgument {
    /// What kind of argument this is.
    pub kind: ArgumentKind,
    /// Canonical option spelling (flags and options only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spelling: Option<String>,
    /// Bound values in order, count bounded by the schema arity.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Occurrence count, meaningful for flags (`-vv` parses to repeat 2).
    #[serde(default = "default_repeat", skip_serializing_if = "is_one")]
    pub repeat: usize,
    /// Placeholder tag on template patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl CommandArgument {
    /// Creates a flag argument with repeat 1.
    pub fn flag(spelling: &str) -> Self {
        Self {
            kind: ArgumentKind::Flag,
            spelling: Some(spelling.to_string()),
            values: Vec::new(),
            repeat: 1,
            placeholder: None,
        }
    }

    /// Creates a valued option argument.
    pub fn option(spelling: &str, values: Vec<String>) -> Self {
        Self {
            kind: ArgumentKind::Option,
            spelling: Some(spelling.to_string()),
            values,
            repeat: 1,
            placeholder: None,
        }
    }

    /// Creates a positional argument.
    pub fn positional(values: Vec<String>) -> Self {
        Self {
            kind: ArgumentKind::Positional,
            spelling: None,
            values,
            repeat: 1,
            placeholder: None,
        }
    }

    /// Creates an extra (post-`--`) argument.
    pub fn extra(values: Vec<String>) -> Self {
        Self {
            kind: ArgumentKind::Extra,
            spelling: None,
            values,
            repeat: 1,
            placeholder: None,
        }
    }

    /// Structural equality: kind, canonical spelling for flags/options, and
    /// repeat for flags. Values and placeholder tags are never compared.
    pub fn structure_eq(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match self.kind {
            ArgumentKind::Flag => self.spelling == other.spelling && self.repeat == other.repeat,
            ArgumentKind::Option => self.spelling == other.spelling,
            ArgumentKind::Positional | ArgumentKind::Extra => true,
        }
    }
}

/// One level of a parsed command.
///
/// A node owns the arguments bound at its scope and at most one nested node
/// for the next subcommand depth, forming a finite chain that is acyclic by
/// construction. Nodes are transient: created per parse or template build,
/// consumed, then dropped.
///
/// # Examples
///
/// ```
/// use command_bridge_core::{CommandArgument, CommandNode};
///
/// let mut node = CommandNode::new("git");
/// node.subcommand = Some(Box::new(CommandNode::new("commit")));
/// assert_eq!(node.depth(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandNode {
    /// Program name at the root, subcommand name below.
    pub name: String,
    /// Arguments bound at this level, in binding order.
    #[serde(default)]
    pub arguments: Vec<CommandArgument>,
    /// Next subcommand depth, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcommand: Option<Box<CommandNode>>,
    /// Raw pass-through text after `--`, space-joined and unprocessed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_content: Option<String>,
}

impl CommandNode {
    /// Creates an empty node named `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Chain length: 1 plus the nested subcommand depth.
    pub fn depth(&self) -> usize {
        1 + self.subcommand.as_deref().map_or(0, CommandNode::depth)
    }

    /// Values-blind structural equality.
    ///
    /// Two nodes are structurally equal iff their names are equal, both have
    /// a subcommand or neither does (recursively equal when both do), their
    /// argument lists have equal length, and each argument pair satisfies
    /// [`CommandArgument::structure_eq`].
    pub fn structure_eq(&self, other: &Self) -> bool {
        if self.name != other.name {
            return false;
        }
        match (&self.subcommand, &other.subcommand) {
            (Some(a), Some(b)) if !a.structure_eq(b) => return false,
            (Some(_), None) | (None, Some(_)) => return false,
            _ => {}
        }
        self.arguments.len() == other.arguments.len()
            && self
                .arguments
                .iter()
                .zip(&other.arguments)
                .all(|(a, b)| a.structure_eq(b))
    }
}
