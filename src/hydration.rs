//! Client hydration metadata for components and custom elements.

use crate::document::{Document, NodeId};
use crate::ir::{AttributeIR, ElementKind};

const CLIENT_PREFIX: &str = "client:";

/// Name of a `client:*` directive: the segment between the prefix and the next colon.
fn directive_name(key: &str) -> Option<&str> {
    let rest = key.strip_prefix(CLIENT_PREFIX)?;
    Some(rest.split(':').next().unwrap_or(rest))
}

/// Handles the first `client:*` attribute of a component or custom element.
///
/// Records the directive, annotates the node and prepends it to the matching
/// registry. Later `client:*` attributes on the same node are ignored.
pub fn add_component_props(doc: &mut Document, id: NodeId) {
    let Some(el) = doc.element_mut(id) else {
        return;
    };
    if el.kind == ElementKind::Html {
        return;
    }

    let Some(directive) = el
        .attributes
        .iter()
        .find_map(|attr| directive_name(&attr.key))
        .map(str::to_string)
    else {
        return;
    };

    let identifier = match el.kind {
        ElementKind::CustomElement => format!("'{}'", el.tag),
        _ => el.tag.clone(),
    };

    el.attributes.push(AttributeIR::quoted(
        "client:component-hydration",
        directive.clone(),
    ));

    if directive == "only" {
        doc.hydration_directives.insert(directive);
        doc.client_only_components.insert(0, id);
        return;
    }

    el.attributes.push(AttributeIR::expression(
        "client:component-path",
        format!("$$metadata.getPath({})", identifier),
    ));
    el.attributes.push(AttributeIR::expression(
        "client:component-export",
        format!("$$metadata.getExport({})", identifier),
    ));

    doc.hydration_directives.insert(directive);
    doc.hydrated_components.insert(0, id);
}
