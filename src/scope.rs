//! Scoped-class injection and source annotation.

use lazy_static::lazy_static;
use std::collections::HashSet;

use crate::document::{Document, NodeId};
use crate::ir::{AttributeIR, AttributeKind, ElementNode};
use crate::options::TransformOptions;
use crate::visitor::walk_document;

lazy_static! {
    /// Elements that never receive a scoped class or a source annotation.
    /// `html` is a notable omission, see `NEVER_SCOPED_SELECTORS`.
    pub static ref NEVER_SCOPED_ELEMENTS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("Fragment");
        s.insert("base");
        s.insert("body");
        s.insert("font");
        s.insert("frame");
        s.insert("frameset");
        s.insert("head");
        s.insert("link");
        s.insert("meta");
        s.insert("noframes");
        s.insert("noscript");
        s.insert("script");
        s.insert("style");
        s.insert("title");
        s
    };

    /// Selectors a CSS scoper must leave alone. `html` is scoped as an element
    /// but never as a selector.
    pub static ref NEVER_SCOPED_SELECTORS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("html");
        s.insert(":root");
        s
    };
}

pub fn scope_element(doc: &mut Document, id: NodeId, options: &TransformOptions) {
    if let Some(el) = doc.element_mut(id) {
        if !NEVER_SCOPED_ELEMENTS.contains(el.tag.as_str()) {
            inject_scoped_class(el, &options.scoped_class());
        }
    }
}

/// Adds the scoped class (`astro-<scope>`) to the first class attribute (or
/// `className` on a component), or appends a new `class` attribute when there is none.
pub fn inject_scoped_class(el: &mut ElementNode, scoped: &str) {
    let is_component = el.is_component();

    for attr in el.attributes.iter_mut() {
        if attr.key != "class" && !(is_component && attr.key == "className") {
            continue;
        }

        match attr.kind {
            AttributeKind::Shorthand => {
                if is_component {
                    attr.value = format!("{} + \" {}\"", attr.key, scoped);
                    attr.kind = AttributeKind::Expression;
                    return;
                }
                // A bare `{class}` on an html element has nothing to append to.
            }
            AttributeKind::Empty => {
                attr.kind = AttributeKind::Quoted;
                attr.value = scoped.to_string();
                return;
            }
            AttributeKind::Quoted | AttributeKind::TemplateLiteral => {
                attr.value.push(' ');
                attr.value.push_str(scoped);
                return;
            }
            AttributeKind::Expression => {
                attr.value = format!("({}) + \" {}\"", attr.value, scoped);
                return;
            }
            AttributeKind::Unknown => return,
        }
    }

    el.attributes.push(AttributeIR::quoted("class", scoped));
}

// ═══════════════════════════════════════════════════════════════════════════════
// SOURCE ANNOTATION (host-driven, not part of the default pipeline)
// ═══════════════════════════════════════════════════════════════════════════════

pub fn annotate_element(doc: &mut Document, id: NodeId, options: &TransformOptions) {
    let Some(el) = doc.element_mut(id) else {
        return;
    };
    if el.is_component() || el.fragment || NEVER_SCOPED_ELEMENTS.contains(el.tag.as_str()) {
        return;
    }

    if el.tag == "html" {
        el.attributes.push(AttributeIR::quoted(
            "data-astro-source-root",
            options.project_root.clone(),
        ));
    } else {
        el.attributes.push(AttributeIR::quoted(
            "data-astro-source-file",
            options.pathname.clone(),
        ));
    }
}

pub fn annotate_document(doc: &mut Document, options: &TransformOptions) {
    walk_document(doc, &mut |doc: &mut Document, id: NodeId| {
        annotate_element(doc, id, options)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ElementInput, ElementKind, SourceLocation};

    fn element(tag: &str, kind: ElementKind, attributes: Vec<AttributeIR>) -> ElementNode {
        ElementNode {
            tag: tag.to_string(),
            kind,
            fragment: false,
            attributes,
            location: SourceLocation::default(),
        }
    }

    #[test]
    fn test_appends_class_when_missing() {
        let mut el = element("div", ElementKind::Html, vec![AttributeIR::quoted("id", "x")]);
        inject_scoped_class(&mut el, "astro-XXXXXX");
        assert_eq!(el.attributes.len(), 2);
        assert_eq!(el.attributes[1], AttributeIR::quoted("class", "astro-XXXXXX"));
    }

    #[test]
    fn test_quoted_and_template_literal_append() {
        let mut el = element("div", ElementKind::Html, vec![AttributeIR::quoted("class", "a b")]);
        inject_scoped_class(&mut el, "astro-XXXXXX");
        assert_eq!(el.attributes[0].value, "a b astro-XXXXXX");

        let mut el = element(
            "div",
            ElementKind::Html,
            vec![AttributeIR::template_literal("class", "a ${b}")],
        );
        inject_scoped_class(&mut el, "astro-XXXXXX");
        assert_eq!(el.attributes[0].value, "a ${b} astro-XXXXXX");
        assert_eq!(el.attributes[0].kind, AttributeKind::TemplateLiteral);
    }

    #[test]
    fn test_empty_becomes_quoted() {
        let mut el = element("div", ElementKind::Html, vec![AttributeIR::empty("class")]);
        inject_scoped_class(&mut el, "astro-XXXXXX");
        assert_eq!(el.attributes, vec![AttributeIR::quoted("class", "astro-XXXXXX")]);
    }

    #[test]
    fn test_expression_is_wrapped() {
        let mut el = element(
            "div",
            ElementKind::Html,
            vec![AttributeIR::expression("class", "a ? 'b' : 'c'")],
        );
        inject_scoped_class(&mut el, "astro-XXXXXX");
        assert_eq!(el.attributes[0].value, "(a ? 'b' : 'c') + \" astro-XXXXXX\"");
        assert_eq!(el.attributes[0].kind, AttributeKind::Expression);
    }

    #[test]
    fn test_component_shorthand_class_name() {
        let mut el = element(
            "Card",
            ElementKind::Component,
            vec![AttributeIR::shorthand("className")],
        );
        inject_scoped_class(&mut el, "astro-XXXXXX");
        assert_eq!(el.attributes.len(), 1);
        assert_eq!(el.attributes[0].kind, AttributeKind::Expression);
        assert_eq!(el.attributes[0].value, "className + \" astro-XXXXXX\"");
    }

    #[test]
    fn test_html_shorthand_falls_through() {
        let mut el = element("div", ElementKind::Html, vec![AttributeIR::shorthand("class")]);
        inject_scoped_class(&mut el, "astro-XXXXXX");
        assert_eq!(el.attributes.len(), 2);
        assert_eq!(el.attributes[0], AttributeIR::shorthand("class"));
        assert_eq!(el.attributes[1], AttributeIR::quoted("class", "astro-XXXXXX"));
    }

    #[test]
    fn test_class_name_ignored_on_html_element() {
        let mut el = element("div", ElementKind::Html, vec![AttributeIR::quoted("className", "a")]);
        inject_scoped_class(&mut el, "astro-XXXXXX");
        assert_eq!(el.attributes[0].value, "a");
        assert_eq!(el.attributes[1], AttributeIR::quoted("class", "astro-XXXXXX"));
    }

    #[test]
    fn test_only_first_class_is_rewritten() {
        let mut el = element(
            "div",
            ElementKind::Html,
            vec![AttributeIR::quoted("class", "a"), AttributeIR::quoted("class", "b")],
        );
        inject_scoped_class(&mut el, "astro-XXXXXX");
        assert_eq!(el.attributes[0].value, "a astro-XXXXXX");
        assert_eq!(el.attributes[1].value, "b");
    }

    #[test]
    fn test_unknown_kind_left_untouched() {
        let mut el = element(
            "div",
            ElementKind::Html,
            vec![AttributeIR::new("class", "{...x}", AttributeKind::Unknown)],
        );
        inject_scoped_class(&mut el, "astro-XXXXXX");
        assert_eq!(el.attributes.len(), 1);
        assert_eq!(el.attributes[0].value, "{...x}");
    }

    #[test]
    fn test_scope_element_skips_never_scoped_but_not_html() {
        let mut doc = Document::from_nodes(vec![
            ElementInput::new("html").into_node(),
            ElementInput::new("head").into_node(),
            ElementInput::new("Fragment").into_node(),
        ]);
        let opts = TransformOptions::new().with_scope("s");
        let ids: Vec<NodeId> = doc.children(doc.root()).collect();
        for id in &ids {
            scope_element(&mut doc, *id, &opts);
        }

        assert_eq!(
            doc.element(ids[0]).unwrap().get_attr("class"),
            Some(&AttributeIR::quoted("class", opts.scoped_class()))
        );
        assert!(!doc.element(ids[1]).unwrap().has_attr("class"));
        assert!(!doc.element(ids[2]).unwrap().has_attr("class"));
    }

    #[test]
    fn test_annotate_document() {
        let mut doc = Document::from_nodes(vec![ElementInput::new("html")
            .child(ElementInput::new("head").into_node())
            .child(
                ElementInput::new("body")
                    .child(ElementInput::new("main").into_node())
                    .child(ElementInput::component("Card").into_node())
                    .child(ElementInput::new("div").fragment().into_node())
                    .into_node(),
            )
            .into_node()]);
        let opts = TransformOptions::new()
            .with_project_root("/project")
            .with_pathname("/project/src/pages/index.astro");

        annotate_document(&mut doc, &opts);

        let html = doc.first_child(doc.root()).unwrap();
        let html_el = doc.element(html).unwrap();
        assert_eq!(
            html_el.get_attr("data-astro-source-root").map(|a| a.value.as_str()),
            Some("/project")
        );
        assert!(!html_el.has_attr("data-astro-source-file"));

        let children: Vec<NodeId> = doc.children(html).collect();
        assert!(doc.element(children[0]).unwrap().attributes.is_empty());
        assert!(doc.element(children[1]).unwrap().attributes.is_empty());

        let body_children: Vec<NodeId> = doc.children(children[1]).collect();
        assert_eq!(
            doc.element(body_children[0])
                .unwrap()
                .get_attr("data-astro-source-file")
                .map(|a| a.value.as_str()),
            Some("/project/src/pages/index.astro")
        );
        assert!(doc.element(body_children[1]).unwrap().attributes.is_empty());
        assert!(doc.element(body_children[2]).unwrap().attributes.is_empty());
    }
}
