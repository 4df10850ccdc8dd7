//! Destination command generation from format strings and extracted
//! parameters.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use command_bridge_core::{FormatEntry, FormatTable};
use regex::Regex;
use tracing::warn;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("static regex must compile"));

/// A generated destination command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The command text with every known placeholder substituted.
    pub command: String,
    /// Placeholder names that had no parameter and were left in place.
    pub unresolved: Vec<String>,
}

impl Rendered {
    /// Returns `true` when every placeholder was substituted.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Substitutes `params` into `format`. Placeholders with no parameter stay
/// in the output verbatim and are reported in
/// [`unresolved`](Rendered::unresolved); substitution is never fatal.
pub fn render(format: &str, params: &BTreeMap<String, String>) -> Rendered {
    let command = PLACEHOLDER_RE
        .replace_all(format, |captures: &regex::Captures<'_>| {
            match params.get(&captures[1]) {
                Some(value) => value.clone(),
                None => captures[0].to_string(),
            }
        })
        .into_owned();

    let unresolved: Vec<String> = PLACEHOLDER_RE
        .captures_iter(&command)
        .map(|c| c[1].to_string())
        .collect();
    for name in &unresolved {
        warn!(placeholder = %name, "no parameter for placeholder, left unsubstituted");
    }

    Rendered {
        command,
        unresolved,
    }
}

/// Renders the destination command for `(operation, program)` out of
/// `table`, using the entry's final variant when one exists. Returns `None`
/// when the table has no entry for the pair.
pub fn generate(
    table: &FormatTable,
    operation: &str,
    program: &str,
    params: &BTreeMap<String, String>,
) -> Option<Rendered> {
    let entry = table.lookup(operation, program)?;
    Some(render_entry(entry, params))
}

/// Renders one [`FormatEntry`], preferring its final variant exclusively.
pub fn render_entry(entry: &FormatEntry, params: &BTreeMap<String, String>) -> Rendered {
    render(entry.effective_format(), params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_all_occurrences() {
        let rendered = render(
            "ln -s {target} {target}.bak",
            &params(&[("target", "/etc/hosts")]),
        );
        assert_eq!(rendered.command, "ln -s /etc/hosts /etc/hosts.bak");
        assert!(rendered.is_complete());
    }

    #[test]
    fn test_unresolved_placeholder_is_left_verbatim() {
        let rendered = render("apt install {pkgs}", &params(&[]));
        assert_eq!(rendered.command, "apt install {pkgs}");
        assert_eq!(rendered.unresolved, vec!["pkgs".to_string()]);
    }

    #[test]
    fn test_generate_prefers_final_variant() {
        let mut table = FormatTable::default();
        table.insert(
            "apt",
            "install_remote",
            FormatEntry::new("apt install {pkgs}").with_final("apt-get install -y {pkgs}"),
        );

        let rendered = generate(&table, "install_remote", "apt", &params(&[("pkgs", "vim")]))
            .unwrap();
        assert_eq!(rendered.command, "apt-get install -y vim");
    }

    #[test]
    fn test_generate_unknown_pair_is_none() {
        let table = FormatTable::default();
        assert!(generate(&table, "install_remote", "apt", &params(&[])).is_none());
    }

    #[test]
    fn test_value_braces_survive_substitution() {
        let rendered = render("echo {msg}", &params(&[("msg", "literal {x}")]));
        // The unresolved scan runs over the substituted text, so a brace
        // pair inside a value is reported but the command is unchanged.
        assert_eq!(rendered.command, "echo literal {x}");
        assert_eq!(rendered.unresolved, vec!["x".to_string()]);
    }
}
