//! # Transform Pipeline
//!
//! Sequences the rewrite passes over one parsed document.
//!
//! ## Ordering Invariants
//!
//! 1. **Styles First**: `extract_styles` runs before `transform`; the scoping
//!    decision is computed once from the collected styles.
//! 2. **Shared Walk**: script hoisting, hydration props and scoped classes run in
//!    one traversal, each node visited once. Scoping is applied at most once per node.
//! 3. **Set Directives After**: set directives are rewritten in a second traversal,
//!    so scoping never sees children that are about to be discarded.
//! 4. **Deferred Detach**: hoisted scripts leave the tree only after every traversal
//!    that relies on sibling links has finished.
//! 5. **Printable Output**: a document emptied by hoisting gets an empty frontmatter
//!    node so the printer has an anchor.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, DiagnosticSink, TransformError};
use crate::directives::normalize_set_directives;
use crate::document::{Document, NodeId};
use crate::finalize::TransformResult;
use crate::hydration::add_component_props;
use crate::ir::{NodeData, NodeInput, SourceLocation, TextNode};
use crate::options::TransformOptions;
use crate::scope::scope_element;
use crate::scripts::extract_script;
use crate::styles::{extract_styles, GlobalDirectiveScoper, StyleScoper};
use crate::visitor::walk_document;
use crate::whitespace::clean_whitespace;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub scoped: bool,
    pub hoisted_scripts: usize,
    pub set_directives: usize,
    pub whitespace_changed: usize,
    pub inserted_placeholder: bool,
}

/// Runs the rewrite pipeline. Expects `extract_styles` to have been called.
pub fn transform(
    doc: &mut Document,
    options: &TransformOptions,
    scoper: &dyn StyleScoper,
    sink: &mut dyn DiagnosticSink,
) -> TransformSummary {
    let _span = tracing::debug_span!("transform", file = %options.filename).entered();
    let mut summary = TransformSummary::default();

    let styles = doc.styles.clone();
    summary.scoped = !styles.is_empty() && scoper.should_scope(doc, &styles, options);

    let should_scope = summary.scoped;
    walk_document(doc, &mut |doc: &mut Document, id: NodeId| {
        extract_script(doc, id, options, &mut *sink);
        add_component_props(doc, id);
        if should_scope {
            scope_element(doc, id, options);
        }
    });

    summary.set_directives = normalize_set_directives(doc, options, &mut *sink);

    let scripts = doc.scripts.clone();
    for script in &scripts {
        doc.detach(*script);
    }
    summary.hoisted_scripts = scripts.len();

    let root = doc.root();
    if doc.first_child(root).is_none() {
        let frontmatter = doc.create_node(NodeData::Frontmatter(SourceLocation::default()));
        let text = doc.create_node(NodeData::Text(TextNode::default()));
        doc.append_child(frontmatter, text);
        doc.append_child(root, frontmatter);
        summary.inserted_placeholder = true;
    }

    if options.is_production() {
        summary.whitespace_changed = clean_whitespace(doc);
    }

    tracing::debug!(
        scoped = summary.scoped,
        scripts = summary.hoisted_scripts,
        hydrated = doc.hydrated_components.len(),
        client_only = doc.client_only_components.len(),
        "transform complete"
    );
    summary
}

/// Host sequence for one document: build, extract styles, transform, snapshot.
pub fn compile_document(
    nodes: Vec<NodeInput>,
    options: &TransformOptions,
    scoper: &dyn StyleScoper,
) -> TransformResult {
    let mut doc = Document::from_nodes(nodes);
    let mut diagnostics: Vec<Diagnostic> = vec![];

    extract_styles(&mut doc);
    transform(&mut doc, options, scoper, &mut diagnostics);

    TransformResult::from_document(&doc, diagnostics)
}

/// JSON boundary: a node list and options in, a `TransformResult` out.
pub fn transform_json(nodes_json: &str, options_json: &str) -> Result<String, TransformError> {
    let nodes: Vec<NodeInput> =
        serde_json::from_str(nodes_json).map_err(TransformError::InvalidDocument)?;
    let options: TransformOptions = if options_json.trim().is_empty() {
        TransformOptions::default()
    } else {
        serde_json::from_str(options_json).map_err(TransformError::InvalidOptions)?
    };

    let result = compile_document(nodes, &options, &GlobalDirectiveScoper);
    serde_json::to_string(&result).map_err(TransformError::Serialize)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformJob {
    pub nodes: Vec<NodeInput>,
    #[serde(default)]
    pub options: TransformOptions,
}

/// Transforms independent documents in parallel. Results keep job order.
pub fn transform_batch(
    jobs: Vec<TransformJob>,
    scoper: &(dyn StyleScoper + Sync),
) -> Vec<TransformResult> {
    jobs.into_par_iter()
        .map(|job| compile_document(job.nodes, &job.options, scoper))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AttributeIR, ElementInput};
    use crate::options::BuildMode;

    #[test]
    fn test_transform_json_round_trip() {
        let nodes = serde_json::json!([
            { "type": "element", "tag": "style", "children": [{ "type": "text", "value": "div{}" }] },
            { "type": "element", "tag": "div" }
        ]);
        let out = transform_json(&nodes.to_string(), r#"{"scope":"abc"}"#).unwrap();
        let result: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(result["nodes"][0]["tag"], "div");
        assert_eq!(result["nodes"][0]["attributes"][0]["key"], "class");
        assert_eq!(result["nodes"][0]["attributes"][0]["value"], "astro-abc");
        assert_eq!(result["styles"].as_array().map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_transform_json_errors() {
        assert!(matches!(
            transform_json("{nope", "{}"),
            Err(TransformError::InvalidDocument(_))
        ));
        assert!(matches!(
            transform_json("[]", r#"{"scope": 1}"#),
            Err(TransformError::InvalidOptions(_))
        ));
        assert!(transform_json("[]", "").is_ok());
    }

    #[test]
    fn test_batch_preserves_order() {
        let jobs: Vec<TransformJob> = (0..16)
            .map(|i| TransformJob {
                nodes: vec![
                    ElementInput::new("style").into_node(),
                    ElementInput::new("div").into_node(),
                ],
                options: TransformOptions::new()
                    .with_scope(format!("s{}", i))
                    .with_mode(BuildMode::Production),
            })
            .collect();

        let results = transform_batch(jobs, &GlobalDirectiveScoper);

        assert_eq!(results.len(), 16);
        for (i, result) in results.iter().enumerate() {
            match &result.nodes[0] {
                NodeInput::Element(el) => assert_eq!(
                    el.attributes,
                    vec![AttributeIR::quoted("class", format!("astro-s{}", i))]
                ),
                other => panic!("expected element, got {:?}", other),
            }
        }
    }
}
