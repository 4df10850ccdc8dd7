//! Structural template matching and parameter extraction.
//!
//! Matching is values-blind: a parsed command matches a template when the
//! two trees agree on names, subcommand chain, argument count, kinds, and
//! option spellings. Extraction then walks the two trees in lock step and
//! reads the source values at each tagged pattern position.

use std::collections::BTreeMap;

use command_bridge_core::{CommandNode, CommandTemplate, TemplateLibrary};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A recognized portable operation with its extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCall {
    /// Portable operation name from the matched template.
    pub operation: String,
    /// Placeholder name → space-joined source values.
    pub params: BTreeMap<String, String>,
}

/// Finds the first template in `library` whose pattern structurally equals
/// `node`. Declaration order breaks ties, so matching is deterministic for
/// a fixed library.
pub fn find_match<'a>(
    node: &CommandNode,
    library: &'a TemplateLibrary,
) -> Option<&'a CommandTemplate> {
    if node.name != library.program {
        return None;
    }
    let found = library
        .templates
        .iter()
        .find(|template| node.structure_eq(&template.pattern));
    match found {
        Some(template) => {
            debug!(program = %library.program, operation = %template.operation, "template matched");
        }
        None => {
            debug!(program = %library.program, command = %node.name, "no template matched");
        }
    }
    found
}

/// Reads the parameter values of `node` at the tagged positions of
/// `template`'s pattern. Multi-valued captures are joined with single
/// spaces. Call only with a `node` that matched the template; positions
/// present in the pattern but absent in the node are skipped.
pub fn extract_parameters(
    node: &CommandNode,
    template: &CommandTemplate,
) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    collect_params(node, &template.pattern, &mut params);
    params
}

/// [`find_match`] plus [`extract_parameters`] in one call.
pub fn match_and_extract(node: &CommandNode, library: &TemplateLibrary) -> Option<OperationCall> {
    let template = find_match(node, library)?;
    Some(OperationCall {
        operation: template.operation.clone(),
        params: extract_parameters(node, template),
    })
}

fn collect_params(
    node: &CommandNode,
    pattern: &CommandNode,
    params: &mut BTreeMap<String, String>,
) {
    for (source, slot) in node.arguments.iter().zip(&pattern.arguments) {
        if let Some(name) = &slot.placeholder {
            params.insert(name.clone(), source.values.join(" "));
        }
    }

    if let (Some(source), Some(slot)) = (&node.subcommand, &pattern.subcommand) {
        collect_params(source, slot, params);
    }
}
