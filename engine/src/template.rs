//! Template compilation: format strings with `{name}` placeholders become
//! pattern trees with tagged argument positions.
//!
//! The builder substitutes each placeholder with an out-of-band marker
//! token, parses the synthetic command under the source grammar, then walks
//! the parsed tree tagging every argument that captured a marker. Markers
//! never survive compilation: tagged arguments carry the placeholder name
//! and empty values.

use std::sync::LazyLock;

use command_bridge_core::{
    ArgumentSchema, CommandNode, CommandTemplate, GrammarSchema, SubCommandSchema,
    TemplateLibrary,
};
use regex::Regex;
use tracing::debug;

use crate::error::TemplateError;
use crate::parse;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("static regex must compile"));

/// Marker delimiter. U+0001 cannot appear in a shell-split argument list,
/// so marked tokens are unambiguous during the synthetic parse.
const MARKER: char = '\u{1}';

/// Compiles one format string into a [`CommandTemplate`] under `grammar`.
///
/// A placeholder standing alone as a whitespace token expands to one marker
/// per required value: Fixed(n) gets n, multi-valued arities get two, the
/// rest one. A placeholder embedded in a larger token is substituted in
/// place, so `--message={msg}` compiles through the `=`-form tokenizer path.
///
/// # Examples
///
/// ```
/// use command_bridge_core::*;
/// use command_bridge_engine::build_template;
///
/// let grammar = GrammarSchema::new("pacman", GrammarStyle::Flat)
///     .with_argument(ArgumentSchema::flag("sync", &["-S"]))
///     .with_argument(ArgumentSchema::positional("targets", ArgumentArity::ZeroOrMore));
///
/// let template = build_template("install_remote", "pacman -S {pkgs}", &grammar).unwrap();
/// assert_eq!(template.program(), "pacman");
/// assert_eq!(template.pattern.arguments[1].placeholder.as_deref(), Some("pkgs"));
/// assert!(template.pattern.arguments[1].values.is_empty());
/// ```
pub fn build_template(
    operation: &str,
    format: &str,
    grammar: &GrammarSchema,
) -> Result<CommandTemplate, TemplateError> {
    let parts: Vec<&str> = format.split_whitespace().collect();
    if parts.is_empty() {
        return Err(TemplateError::EmptyFormat);
    }
    debug!(operation = %operation, format = %format, "compiling template");

    let mut names = Vec::new();
    let mut synthetic = Vec::new();
    for part in parts {
        expand_part(part, grammar, &mut names, &mut synthetic);
    }

    let mut pattern = parse::parse(&synthetic, grammar)?;
    let captured = tag_markers(&mut pattern);

    for name in &names {
        if !captured.iter().any(|c| c == name) {
            return Err(TemplateError::PlaceholderNotCaptured(name.clone()));
        }
    }

    Ok(CommandTemplate {
        operation: operation.to_string(),
        format: format.to_string(),
        pattern,
    })
}

/// Compiles a set of (operation, format) pairs for one program into a
/// library, preserving input order.
pub fn build_library<'a, I>(grammar: &GrammarSchema, entries: I) -> Result<TemplateLibrary, TemplateError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut library = TemplateLibrary::new(&grammar.program);
    for (operation, format) in entries {
        library
            .templates
            .push(build_template(operation, format, grammar)?);
    }
    Ok(library)
}

/// Substitutes the placeholders of one whitespace token, appending the
/// resulting raw tokens to `synthetic` and the placeholder names seen to
/// `names`.
fn expand_part(
    part: &str,
    grammar: &GrammarSchema,
    names: &mut Vec<String>,
    synthetic: &mut Vec<String>,
) {
    // Whole-token placeholder: expand to the schema's minimum value count
    // so Fixed(n) options in the format parse with a full complement.
    if let Some(captures) = PLACEHOLDER_RE.captures(part) {
        let whole = captures.get(0).is_some_and(|m| m.as_str() == part);
        let name = &captures[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }

        if whole {
            for _ in 0..marker_count(name, grammar, synthetic) {
                synthetic.push(marker(name));
            }
            return;
        }

        let substituted = PLACEHOLDER_RE.replace_all(part, |c: &regex::Captures<'_>| {
            let inner = &c[1];
            if !names.iter().any(|n| n == inner) {
                names.push(inner.to_string());
            }
            marker(inner)
        });
        synthetic.push(substituted.into_owned());
        return;
    }

    synthetic.push(part.to_string());
}

fn marker(name: &str) -> String {
    format!("{MARKER}{name}{MARKER}")
}

/// Finds an argument by spelling anywhere in the grammar, walking
/// subcommand scopes depth-first. Format tokens are not scope-resolved, so
/// spelling lookup here is grammar-wide.
fn find_spelling_deep<'a>(
    grammar: &'a GrammarSchema,
    spelling: &str,
) -> Option<&'a ArgumentSchema> {
    fn walk<'a>(
        arguments: &'a [ArgumentSchema],
        subcommands: &'a [SubCommandSchema],
        spelling: &str,
    ) -> Option<&'a ArgumentSchema> {
        if let Some(found) = arguments.iter().find(|a| a.matches(spelling)) {
            return Some(found);
        }
        subcommands
            .iter()
            .find_map(|sub| walk(&sub.arguments, &sub.subcommands, spelling))
    }
    walk(&grammar.arguments, &grammar.subcommands, spelling)
}

/// How many marker tokens a whole-token placeholder expands to. The schema
/// governing the position decides: the preceding format token when it is a
/// valued option spelling, otherwise a schema named like the placeholder.
/// Multi-valued arities get two markers so the argument accumulates more
/// than one position; the count is not authoritative for matching.
fn marker_count(name: &str, grammar: &GrammarSchema, synthetic: &[String]) -> usize {
    let schema = synthetic
        .last()
        .and_then(|prev| find_spelling_deep(grammar, prev))
        .filter(|schema| schema.takes_value())
        .or_else(|| grammar.find_argument_by_name(name));

    match schema {
        Some(schema) if schema.arity.is_multiple() => 2,
        Some(schema) => schema.arity.min_count().max(1),
        None => 1,
    }
}

/// Tags every argument holding a marker value, clears those values, and
/// returns the placeholder names that were captured somewhere in the tree.
fn tag_markers(node: &mut CommandNode) -> Vec<String> {
    let mut captured = Vec::new();

    for argument in &mut node.arguments {
        let mut tag = None;
        for value in &argument.values {
            if let Some(name) = marker_name(value) {
                if tag.is_none() {
                    tag = Some(name.to_string());
                }
                if !captured.iter().any(|c| c == name) {
                    captured.push(name.to_string());
                }
            }
        }
        if let Some(name) = tag {
            argument.placeholder = Some(name);
            argument.values.clear();
        }
    }

    if node
        .extra_content
        .as_deref()
        .and_then(marker_name)
        .is_some()
    {
        node.extra_content = None;
    }

    if let Some(child) = node.subcommand.as_deref_mut() {
        captured.extend(tag_markers(child));
    }
    captured
}

/// Extracts the placeholder name when `value` contains a marker.
fn marker_name(value: &str) -> Option<&str> {
    let start = value.find(MARKER)?;
    let rest = &value[start + MARKER.len_utf8()..];
    let end = rest.find(MARKER)?;
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_bridge_core::{
        ArgumentArity, ArgumentKind, ArgumentSchema, GrammarStyle, SubCommandSchema,
    };

    fn apt_grammar() -> GrammarSchema {
        GrammarSchema::new("apt", GrammarStyle::Hierarchical).with_subcommand(
            SubCommandSchema::new("install")
                .with_argument(ArgumentSchema::flag("yes", &["-y", "--yes"]))
                .with_argument(ArgumentSchema::positional("pkgs", ArgumentArity::OneOrMore)),
        )
    }

    #[test]
    fn test_positional_placeholder_is_tagged_and_cleared() {
        let template = build_template("install_remote", "apt install {pkgs}", &apt_grammar())
            .unwrap();

        assert_eq!(template.operation, "install_remote");
        assert_eq!(template.program(), "apt");
        let install = template.pattern.subcommand.as_deref().unwrap();
        assert_eq!(install.arguments.len(), 1);
        assert_eq!(install.arguments[0].kind, ArgumentKind::Positional);
        assert_eq!(install.arguments[0].placeholder.as_deref(), Some("pkgs"));
        assert!(install.arguments[0].values.is_empty());
    }

    #[test]
    fn test_option_value_placeholder() {
        let grammar = GrammarSchema::new("git", GrammarStyle::Hierarchical).with_subcommand(
            SubCommandSchema::new("commit").with_argument(ArgumentSchema::option(
                "message",
                &["--message", "-m"],
                ArgumentArity::Fixed(1),
            )),
        );

        let template = build_template("commit", "git commit -m {msg}", &grammar).unwrap();
        let commit = template.pattern.subcommand.as_deref().unwrap();
        assert_eq!(commit.arguments[0].spelling.as_deref(), Some("--message"));
        assert_eq!(commit.arguments[0].placeholder.as_deref(), Some("msg"));
        assert!(commit.arguments[0].values.is_empty());
    }

    #[test]
    fn test_embedded_placeholder_compiles_through_equals_form() {
        let grammar = GrammarSchema::new("git", GrammarStyle::Hierarchical).with_subcommand(
            SubCommandSchema::new("commit").with_argument(ArgumentSchema::option(
                "message",
                &["--message"],
                ArgumentArity::Fixed(1),
            )),
        );

        let template =
            build_template("commit", "git commit --message={msg}", &grammar).unwrap();
        let commit = template.pattern.subcommand.as_deref().unwrap();
        assert_eq!(commit.arguments[0].placeholder.as_deref(), Some("msg"));
    }

    #[test]
    fn test_literal_tokens_keep_their_values() {
        let template =
            build_template("install_yes", "apt install -y {pkgs}", &apt_grammar()).unwrap();
        let install = template.pattern.subcommand.as_deref().unwrap();
        assert_eq!(install.arguments[0].spelling.as_deref(), Some("-y"));
        assert!(install.arguments[0].placeholder.is_none());
        assert_eq!(install.arguments[1].placeholder.as_deref(), Some("pkgs"));
    }

    #[test]
    fn test_empty_format_is_rejected() {
        let err = build_template("noop", "   ", &apt_grammar()).unwrap_err();
        assert_eq!(err, TemplateError::EmptyFormat);
    }

    #[test]
    fn test_uncaptured_placeholder_is_rejected() {
        let grammar = GrammarSchema::new("tool", GrammarStyle::Flat)
            .with_argument(ArgumentSchema::flag("verbose", &["-v"]));
        // No positional schema, so the marker has nowhere to land; the
        // hierarchical policy would drop it, flat rejects the parse.
        let err = build_template("noop", "tool -v {stray}", &grammar).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Parse(_) | TemplateError::PlaceholderNotCaptured(_)
        ));
    }

    #[test]
    fn test_uncaptured_placeholder_under_drop_policy() {
        let grammar = GrammarSchema::new("tool", GrammarStyle::Hierarchical)
            .with_subcommand(SubCommandSchema::new("run"));
        let err = build_template("noop", "tool run {stray}", &grammar).unwrap_err();
        assert!(matches!(err, TemplateError::Parse(_)));
    }

    #[test]
    fn test_fixed_arity_placeholder_expands_to_full_complement() {
        let grammar = GrammarSchema::new("tool", GrammarStyle::Flat).with_argument(
            ArgumentSchema::option("pair", &["--pair"], ArgumentArity::Fixed(2)),
        );

        let template = build_template("pair", "tool --pair {endpoints}", &grammar).unwrap();
        assert_eq!(
            template.pattern.arguments[0].placeholder.as_deref(),
            Some("endpoints")
        );
    }

    #[test]
    fn test_build_library_preserves_order() {
        let library = build_library(
            &apt_grammar(),
            [
                ("install_remote", "apt install {pkgs}"),
                ("install_yes", "apt install -y {pkgs}"),
            ],
        )
        .unwrap();

        assert_eq!(library.program, "apt");
        assert_eq!(library.len(), 2);
        assert_eq!(library.templates[0].operation, "install_remote");
        assert_eq!(library.templates[1].operation, "install_yes");
    }
}
