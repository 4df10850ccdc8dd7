//! Parsing strategies: flat (getopt-style) and hierarchical (subcommand).
//!
//! Strategy dispatch is a match on [`GrammarStyle`] made once per call; both
//! strategies share one scope-binding routine. The flat strategy binds
//! everything at a single scope and treats unknown options as hard failures;
//! the hierarchical strategy recurses into subcommand scopes and applies a
//! configurable [`UnknownOptionPolicy`].

use command_bridge_core::{
    ArgumentKind, ArgumentSchema, CommandArgument, CommandNode, GrammarSchema, GrammarStyle,
    SubCommandSchema,
};
use tracing::debug;

use crate::error::ParseError;
use crate::token::{Lexeme, Token, tokenize_arguments};

/// What the hierarchical strategy does with a `-`-prefixed token that
/// matches no spelling in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownOptionPolicy {
    /// Drop the token and keep parsing (default).
    #[default]
    Drop,
    /// Abort with [`ParseError::UnrecognizedOption`], like the flat strategy.
    Error,
}

/// Knobs for a parse call. The flat strategy ignores `unknown_options`:
/// unknown options there are always an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub unknown_options: UnknownOptionPolicy,
}

/// Parses a raw argument list into a command tree under `grammar`, with
/// default options.
///
/// Empty input yields a [`CommandNode`] with an empty name and no
/// arguments. A failed parse returns no partial tree.
///
/// # Examples
///
/// ```
/// use command_bridge_core::*;
/// use command_bridge_engine::parse;
///
/// let grammar = GrammarSchema::new("pacman", GrammarStyle::Flat)
///     .with_argument(ArgumentSchema::flag("sync", &["-S"]))
///     .with_argument(ArgumentSchema::positional("targets", ArgumentArity::ZeroOrMore));
///
/// let args: Vec<String> = ["pacman", "-S", "vim"].iter().map(|s| s.to_string()).collect();
/// let node = parse(&args, &grammar).unwrap();
/// assert_eq!(node.name, "pacman");
/// assert_eq!(node.arguments.len(), 2);
/// ```
pub fn parse(args: &[String], grammar: &GrammarSchema) -> Result<CommandNode, ParseError> {
    parse_with(args, grammar, ParseOptions::default())
}

/// Parses with explicit [`ParseOptions`].
pub fn parse_with(
    args: &[String],
    grammar: &GrammarSchema,
    options: ParseOptions,
) -> Result<CommandNode, ParseError> {
    let Some((program, rest)) = args.split_first() else {
        return Ok(CommandNode::default());
    };
    debug!(program = %program, style = ?grammar.style, argc = args.len(), "parsing command line");

    match grammar.style {
        GrammarStyle::Flat => bind_scope(
            program,
            rest,
            &grammar.arguments,
            &[],
            UnknownOptionPolicy::Error,
        ),
        GrammarStyle::Hierarchical => bind_scope(
            program,
            rest,
            &grammar.arguments,
            &grammar.subcommands,
            options.unknown_options,
        ),
    }
}

/// Checks that every `required` argument reachable along the parsed
/// subcommand chain was bound. Callers treat a miss as "no mapping", not a
/// parse failure.
pub fn satisfies_required(node: &CommandNode, grammar: &GrammarSchema) -> bool {
    scope_satisfied(node, &grammar.arguments, &grammar.subcommands)
}

fn scope_satisfied(
    node: &CommandNode,
    arguments: &[ArgumentSchema],
    subcommands: &[SubCommandSchema],
) -> bool {
    for schema in arguments.iter().filter(|a| a.required) {
        let bound = if schema.is_positional() {
            node.arguments
                .iter()
                .any(|a| a.kind == ArgumentKind::Positional)
        } else {
            node.arguments
                .iter()
                .any(|a| a.spelling.as_deref() == schema.canonical_spelling())
        };
        if !bound {
            return false;
        }
    }

    match &node.subcommand {
        Some(child) => match subcommands.iter().find(|s| s.name == child.name) {
            Some(schema) => scope_satisfied(child, &schema.arguments, &schema.subcommands),
            None => false,
        },
        None => true,
    }
}

/// Binds one scope: the tail after a program or subcommand name, against
/// that scope's argument schemas. Recurses when a word matches a
/// subcommand.
fn bind_scope(
    name: &str,
    args: &[String],
    arguments: &[ArgumentSchema],
    subcommands: &[SubCommandSchema],
    policy: UnknownOptionPolicy,
) -> Result<CommandNode, ParseError> {
    let lexemes = tokenize_arguments(args, arguments);
    let positionals: Vec<&ArgumentSchema> =
        arguments.iter().filter(|a| a.is_positional()).collect();

    let mut node = CommandNode::new(name);
    let mut positional_idx = 0usize;
    let mut current_positional: Option<usize> = None;

    let mut i = 0;
    while i < lexemes.len() {
        let lexeme = &lexemes[i];
        match &lexeme.token {
            Token::Program(_) => {}
            Token::Flag(spelling) => {
                let existing = node.arguments.iter_mut().find(|a| {
                    a.kind == ArgumentKind::Flag && a.spelling.as_deref() == Some(spelling)
                });
                match existing {
                    Some(flag) => flag.repeat += 1,
                    None => node.arguments.push(CommandArgument::flag(spelling)),
                }
            }
            Token::OptionName(spelling) => {
                let Some(schema) = arguments.iter().find(|a| a.matches(spelling)) else {
                    return Err(ParseError::UnrecognizedOption(spelling.clone()));
                };

                let mut values = Vec::new();
                let mut j = i + 1;
                if let Some(Lexeme {
                    token: Token::OptionValue(value),
                    ..
                }) = lexemes.get(j)
                {
                    values.push(value.clone());
                    j += 1;
                }

                let min = schema.arity.min_count();
                let max = schema.arity.max_count();
                while let Some(Lexeme {
                    token: Token::Word(word),
                    ..
                }) = lexemes.get(j)
                {
                    if max.is_some_and(|m| values.len() >= m) {
                        break;
                    }
                    // Once the minimum is met, a word naming a subcommand
                    // ends greedy consumption at this scope.
                    if values.len() >= min && subcommands.iter().any(|s| s.matches(word)) {
                        break;
                    }
                    values.push(word.clone());
                    j += 1;
                }

                if values.len() < min {
                    return Err(ParseError::MissingValue {
                        spelling: spelling.clone(),
                    });
                }

                let existing = node.arguments.iter_mut().find(|a| {
                    a.kind == ArgumentKind::Option && a.spelling.as_deref() == Some(spelling)
                });
                match existing {
                    Some(option) => option.values.extend(values),
                    None => node
                        .arguments
                        .push(CommandArgument::option(spelling, values)),
                }
                i = j;
                continue;
            }
            Token::Word(word) => {
                if let Some(sub) = subcommands.iter().find(|s| s.matches(word)) {
                    let child = bind_scope(
                        &sub.name,
                        &args[lexeme.index + 1..],
                        &sub.arguments,
                        &sub.subcommands,
                        policy,
                    )?;
                    node.subcommand = Some(Box::new(child));
                    break;
                }
                push_positional(
                    word,
                    &positionals,
                    &mut positional_idx,
                    &mut current_positional,
                    &mut node.arguments,
                )?;
            }
            // Stray OptionValue tokens only arise right after OptionName and
            // are consumed there; a leftover binds like a plain word.
            Token::OptionValue(value) => {
                push_positional(
                    value,
                    &positionals,
                    &mut positional_idx,
                    &mut current_positional,
                    &mut node.arguments,
                )?;
            }
            Token::Unknown(token) => match policy {
                UnknownOptionPolicy::Drop => {
                    debug!(token = %token, scope = %name, "dropping unrecognized option");
                }
                UnknownOptionPolicy::Error => {
                    return Err(ParseError::UnrecognizedOption(token.clone()));
                }
            },
            Token::Separator => {}
            Token::Extra(joined) => {
                node.arguments
                    .push(CommandArgument::extra(vec![joined.clone()]));
                node.extra_content = Some(joined.clone());
            }
        }
        i += 1;
    }

    Ok(node)
}

/// Appends one word to the positional schema currently accepting values,
/// advancing through the scope's positional schemas as each fills up.
fn push_positional(
    word: &str,
    positionals: &[&ArgumentSchema],
    positional_idx: &mut usize,
    current: &mut Option<usize>,
    arguments: &mut Vec<CommandArgument>,
) -> Result<(), ParseError> {
    loop {
        let Some(schema) = positionals.get(*positional_idx) else {
            return Err(ParseError::UnexpectedPositional(word.to_string()));
        };

        let count = current.map_or(0, |idx| arguments[idx].values.len());
        if schema.arity.max_count().is_none_or(|m| count < m) {
            match *current {
                Some(idx) => arguments[idx].values.push(word.to_string()),
                None => {
                    arguments
                        .push(CommandArgument::positional(vec![word.to_string()]));
                    *current = Some(arguments.len() - 1);
                }
            }
            return Ok(());
        }

        *positional_idx += 1;
        *current = None;
    }
}
