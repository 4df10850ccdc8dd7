//! Lexical classification of raw argument lists.
//!
//! The tokenizer classifies each raw token against the option spellings
//! valid at the current scope. It is deliberately shallow: it decides what
//! each token *is* (program, flag, option name, separator, plain word) but
//! not what a word *binds to* — value-versus-positional disambiguation and
//! subcommand detection belong to the parsing strategies.

use command_bridge_core::ArgumentSchema;

/// One classified lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// First token of a full invocation (argv[0]).
    Program(String),
    /// A spelling matching a `Fixed(0)` schema; carries the canonical form.
    Flag(String),
    /// A spelling matching an arity>0 schema; carries the canonical form.
    OptionName(String),
    /// The value half of a `--name=value` token.
    OptionValue(String),
    /// A `-`-prefixed token matching no spelling in scope. The flat
    /// strategy rejects these; the hierarchical strategy applies its
    /// unknown-option policy.
    Unknown(String),
    /// Anything else: an option value or a positional, decided by binding.
    Word(String),
    /// The literal `--`.
    Separator,
    /// Everything after `--`, space-joined and unprocessed.
    Extra(String),
}

/// A token plus the index of the raw argument it came from, relative to the
/// slice handed to the tokenizer. Bundle expansion yields several lexemes
/// sharing one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub index: usize,
    pub token: Token,
}

impl Lexeme {
    fn new(index: usize, token: Token) -> Self {
        Self { index, token }
    }
}

/// Tokenizes a full invocation: argv[0] becomes [`Token::Program`], the
/// rest is classified against `options`.
pub fn tokenize(args: &[String], options: &[ArgumentSchema]) -> Vec<Lexeme> {
    let Some((program, rest)) = args.split_first() else {
        return Vec::new();
    };

    let mut lexemes = vec![Lexeme::new(0, Token::Program(program.clone()))];
    for mut lexeme in tokenize_arguments(rest, options) {
        lexeme.index += 1;
        lexemes.push(lexeme);
    }
    lexemes
}

/// Tokenizes the argument tail of one scope (everything after the program
/// or subcommand name) against that scope's option spellings.
pub fn tokenize_arguments(args: &[String], options: &[ArgumentSchema]) -> Vec<Lexeme> {
    let mut lexemes = Vec::new();

    for (index, arg) in args.iter().enumerate() {
        if arg == "--" {
            lexemes.push(Lexeme::new(index, Token::Separator));
            let remainder = &args[index + 1..];
            if !remainder.is_empty() {
                lexemes.push(Lexeme::new(index + 1, Token::Extra(remainder.join(" "))));
            }
            break;
        }
        for token in classify(arg, options) {
            lexemes.push(Lexeme::new(index, token));
        }
    }

    lexemes
}

/// Classifies one raw token, expanding short-option bundles.
fn classify(arg: &str, options: &[ArgumentSchema]) -> Vec<Token> {
    if !arg.starts_with('-') || arg == "-" {
        return vec![Token::Word(arg.to_string())];
    }

    if let Some(schema) = find_spelling(arg, options) {
        return vec![spelling_token(schema)];
    }

    // --name=value splits when the name is a known valued option.
    if arg.starts_with("--") {
        if let Some((name, value)) = arg.split_once('=') {
            match find_spelling(name, options) {
                Some(schema) if schema.takes_value() => {
                    return vec![
                        spelling_token(schema),
                        Token::OptionValue(value.to_string()),
                    ];
                }
                _ => return vec![Token::Unknown(arg.to_string())],
            }
        }
    }

    // A single-dash token longer than two chars that matched nothing is an
    // option bundle: each character is re-fed through classification.
    // Whether an arity>0 option is legal mid-bundle is not decided here;
    // the strategy fails with MissingValue if no value follows.
    if !arg.starts_with("--") && arg.len() > 2 {
        return arg
            .chars()
            .skip(1)
            .flat_map(|c| classify(&format!("-{c}"), options))
            .collect();
    }

    vec![Token::Unknown(arg.to_string())]
}

fn find_spelling<'a>(spelling: &str, options: &'a [ArgumentSchema]) -> Option<&'a ArgumentSchema> {
    options.iter().find(|schema| schema.matches(spelling))
}

/// Flag or OptionName per the schema's arity, carrying the canonical
/// spelling so downstream comparison is spelling-stable.
fn spelling_token(schema: &ArgumentSchema) -> Token {
    let canonical = schema
        .canonical_spelling()
        .unwrap_or_default()
        .to_string();
    if schema.arity.is_flag() {
        Token::Flag(canonical)
    } else {
        Token::OptionName(canonical)
    }
}
