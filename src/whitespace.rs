//! Production-only whitespace collapsing for text nodes.

use lazy_static::lazy_static;
use std::collections::HashSet;

use crate::document::{Document, Node, NodeId};
use crate::ir::NodeData;
use crate::visitor::walk_document;

lazy_static! {
    /// Elements whose text content is emitted verbatim.
    static ref RAW_TAGS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("Markdown");
        s.insert("pre");
        s.insert("listing");
        s.insert("iframe");
        s.insert("noembed");
        s.insert("noframes");
        s.insert("math");
        s.insert("plaintext");
        s.insert("script");
        s.insert("style");
        s.insert("textarea");
        s.insert("title");
        s.insert("xmp");
        s
    };
}

const TRIMMED: &[char] = &['\t', ' ', '\n'];

fn is_raw_element(node: &Node) -> bool {
    match &node.data {
        NodeData::Frontmatter(_) => true,
        NodeData::Element(el) => RAW_TAGS.contains(el.tag.as_str()) || el.has_attr("is:raw"),
        _ => false,
    }
}

fn collapse(value: &str, prev: Option<bool>, next: Option<bool>) -> String {
    let mut out = value.to_string();

    // `None` means no sibling on that side; `Some(true)` means an expression sibling.
    // The trailing rule sees the leading space written by the leading rule.
    match prev {
        None => out = out.trim_start_matches(TRIMMED).to_string(),
        Some(false) => {
            let trimmed = out.trim_start_matches(TRIMMED);
            if trimmed.len() != out.len() {
                out = format!(" {}", trimmed);
            }
        }
        Some(true) => {}
    }
    match next {
        None => out = out.trim_end_matches(TRIMMED).to_string(),
        Some(false) => {
            let trimmed = out.trim_end_matches(TRIMMED);
            if trimmed.len() != out.len() {
                out = format!("{} ", trimmed);
            }
        }
        Some(true) => {}
    }

    out
}

/// Trims insignificant whitespace from every text node outside raw elements.
pub fn clean_whitespace(doc: &mut Document) -> usize {
    let mut changed = 0usize;
    walk_document(doc, &mut |doc: &mut Document, id: NodeId| {
        if !matches!(doc.data(id), NodeData::Text(_)) {
            return;
        }
        if doc.closest(id, is_raw_element).is_some() {
            return;
        }

        let prev = doc.prev_sibling(id).map(|p| doc.node(p).is_expression());
        let next = doc.next_sibling(id).map(|n| doc.node(n).is_expression());

        if let NodeData::Text(text) = doc.data_mut(id) {
            let cleaned = collapse(&text.value, prev, next);
            if cleaned != text.value {
                text.value = cleaned;
                changed += 1;
            }
        }
    });

    tracing::debug!(changed, "cleaned whitespace");
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AttributeIR, ElementInput, NodeInput};

    #[test]
    fn test_collapse_rules() {
        assert_eq!(collapse("\n  a  \n", None, None), "a");
        assert_eq!(collapse("\n  a  \n", Some(false), Some(false)), " a ");
        assert_eq!(collapse("\n  a  \n", Some(true), Some(true)), "\n  a  \n");
        assert_eq!(collapse("a", Some(false), Some(false)), "a");
        assert_eq!(collapse("  a", Some(true), None), "  a");
        assert_eq!(collapse("   ", Some(false), Some(false)), " ");
        assert_eq!(collapse("  ", Some(false), None), "");
        assert_eq!(collapse("  \n  ", Some(false), None), "");
        assert_eq!(collapse("\n  a", Some(false), None), " a");
        // Carriage returns and other whitespace are not trimmed.
        assert_eq!(collapse("\r a", None, None), "\r a");
    }

    fn texts(doc: &Document) -> Vec<String> {
        let mut out = vec![];
        let root = doc.root();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let NodeData::Text(t) = doc.data(id) {
                out.push(t.value.clone());
            }
            let children: Vec<NodeId> = doc.children(id).collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    #[test]
    fn test_clean_whitespace_tree() {
        let mut doc = Document::from_nodes(vec![ElementInput::new("p")
            .child(NodeInput::text("\n  Hello "))
            .child(NodeInput::expression("name"))
            .child(NodeInput::text(" and   "))
            .child(ElementInput::new("b").child(NodeInput::text(" x ")).into_node())
            .child(NodeInput::text("  bye\n"))
            .into_node()]);

        clean_whitespace(&mut doc);

        assert_eq!(
            texts(&doc),
            vec!["Hello ", "name", " and ", "x", " bye"]
        );
    }

    #[test]
    fn test_trailing_whitespace_after_element_is_dropped() {
        let mut doc = Document::from_nodes(vec![ElementInput::new("p")
            .child(ElementInput::new("b").into_node())
            .child(NodeInput::text("  \n  "))
            .into_node()]);

        clean_whitespace(&mut doc);

        assert_eq!(texts(&doc), vec![""]);
    }

    #[test]
    fn test_raw_elements_untouched() {
        let mut doc = Document::from_nodes(vec![
            NodeInput::frontmatter("\n const a = 1;\n"),
            ElementInput::new("pre")
                .child(ElementInput::new("code").child(NodeInput::text("  x  ")).into_node())
                .into_node(),
            ElementInput::new("div")
                .attr(AttributeIR::empty("is:raw"))
                .child(NodeInput::text("  y  "))
                .into_node(),
            ElementInput::new("textarea").child(NodeInput::text("  z  ")).into_node(),
        ]);

        let changed = clean_whitespace(&mut doc);

        assert_eq!(changed, 0);
        assert_eq!(
            texts(&doc),
            vec!["\n const a = 1;\n", "  x  ", "  y  ", "  z  "]
        );
    }
}
