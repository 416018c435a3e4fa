//! Style collection and the document-level scoping decision.

use crate::document::{Document, NodeId};
use crate::options::TransformOptions;
use crate::visitor::walk_document;

/// Decides whether a document's collected styles need scoped classes.
pub trait StyleScoper {
    fn should_scope(&self, doc: &Document, styles: &[NodeId], options: &TransformOptions) -> bool;
}

/// Scopes when at least one collected style is not marked `is:global`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalDirectiveScoper;

impl StyleScoper for GlobalDirectiveScoper {
    fn should_scope(&self, doc: &Document, styles: &[NodeId], _options: &TransformOptions) -> bool {
        styles.iter().any(|id| {
            doc.element(*id)
                .map_or(false, |el| !el.has_truthy_attr("is:global"))
        })
    }
}

fn is_extractable_style(doc: &Document, id: NodeId) -> bool {
    let Some(el) = doc.element(id) else {
        return false;
    };
    if el.tag != "style" || el.has_set_directive() || el.has_inline_directive() {
        return false;
    }
    // Styles inside SVG stay where they are.
    let in_svg = doc
        .parent(id)
        .and_then(|parent| doc.element(parent))
        .map_or(false, |parent| parent.tag == "svg");
    !in_svg
}

/// Moves every eligible `<style>` out of the tree into `doc.styles`.
///
/// Styles are prepended as they are found, so the registry ends up in reverse
/// document order.
pub fn extract_styles(doc: &mut Document) {
    let mut found = Vec::new();
    walk_document(doc, &mut |doc: &mut Document, id: NodeId| {
        if is_extractable_style(doc, id) {
            found.push(id);
        }
    });

    for id in found {
        doc.styles.insert(0, id);
    }

    let styles = doc.styles.clone();
    for style in styles {
        doc.detach(style);
    }

    tracing::debug!(count = doc.styles.len(), "extracted styles");
}
