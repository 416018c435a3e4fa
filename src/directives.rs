//! `set:html` / `set:text` desugaring.

use crate::diagnostics::{Diagnostic, DiagnosticSink, WARN_SET_DIRECTIVE_CHILDREN};
use crate::document::{Document, NodeId};
use crate::ir::{AttributeIR, NodeData, TextNode};
use crate::options::TransformOptions;
use crate::visitor::walk_document;

pub const SET_HTML: &str = "set:html";
pub const SET_TEXT: &str = "set:text";

struct SetDirective {
    node: NodeId,
    directive: AttributeIR,
}

/// Replaces the children of every element carrying a set directive with a
/// single expression child holding the directive's value.
///
/// Runs as its own traversal: targets are collected first, then rewritten.
pub fn normalize_set_directives(
    doc: &mut Document,
    options: &TransformOptions,
    sink: &mut dyn DiagnosticSink,
) -> usize {
    let mut targets = Vec::new();
    walk_document(doc, &mut |doc: &mut Document, id: NodeId| {
        let Some(el) = doc.element(id) else {
            return;
        };
        if let Some(attr) = el
            .attributes
            .iter()
            .find(|attr| attr.key == SET_HTML || attr.key == SET_TEXT)
        {
            targets.push(SetDirective {
                node: id,
                directive: attr.clone(),
            });
        }
    });

    let count = targets.len();
    for target in targets {
        apply_set_directive(doc, target, options, sink);
    }

    tracing::debug!(count, "normalized set directives");
    count
}

fn apply_set_directive(
    doc: &mut Document,
    target: SetDirective,
    options: &TransformOptions,
    sink: &mut dyn DiagnosticSink,
) {
    let SetDirective { node, directive } = target;

    let (tag, location) = match doc.element_mut(node) {
        Some(el) => {
            el.remove_attribute(&directive.key);
            (el.tag.clone(), el.location)
        }
        None => return,
    };

    let code = if directive.key == SET_HTML {
        format!("$$unescapeHTML({})", directive.value)
    } else {
        directive.value.clone()
    };
    let expression = doc.create_node(NodeData::Expression(directive.location));
    let text = doc.create_node(NodeData::Text(TextNode {
        value: code,
        location: directive.location,
    }));
    doc.append_child(expression, text);

    let children: Vec<NodeId> = doc.children(node).collect();
    let has_content = children.iter().any(|child| match doc.data(*child) {
        NodeData::Comment(_) => true,
        NodeData::Text(t) => !t.value.trim().is_empty(),
        _ => false,
    });
    for child in children {
        doc.remove_child(node, child);
    }

    if has_content {
        sink.report(
            Diagnostic::warning(
                WARN_SET_DIRECTIVE_CHILDREN,
                format!(
                    "<{}> uses the \"{}\" directive, but has child nodes which will be overwritten.",
                    tag, directive.key
                ),
                &options.filename,
            )
            .at(location),
        );
    }

    doc.append_child(node, expression);
}
