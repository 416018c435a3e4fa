//! Finalize Module
//!
//! Converts a transformed document into the owned, serializable shape the
//! printer consumes. Registry order is carried over as is.

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::document::{Document, NodeId};
use crate::ir::{ElementKind, NodeInput};

/// A hydrated (or client-only) component as recorded in a registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    pub name: String,
    pub kind: ElementKind,
    pub directive: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub nodes: Vec<NodeInput>,
    pub styles: Vec<NodeInput>,
    pub scripts: Vec<NodeInput>,
    pub hydrated_components: Vec<ComponentRef>,
    pub client_only_components: Vec<ComponentRef>,
    pub hydration_directives: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

fn component_refs(doc: &Document, ids: &[NodeId]) -> Vec<ComponentRef> {
    ids.iter()
        .filter_map(|id| doc.element(*id))
        .map(|el| ComponentRef {
            name: el.tag.clone(),
            kind: el.kind,
            directive: el
                .get_attr("client:component-hydration")
                .map(|attr| attr.value.clone())
                .unwrap_or_default(),
        })
        .collect()
}

impl TransformResult {
    pub fn from_document(doc: &Document, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            nodes: doc.to_nodes(),
            styles: doc.styles.iter().map(|id| doc.snapshot(*id)).collect(),
            scripts: doc.scripts.iter().map(|id| doc.snapshot(*id)).collect(),
            hydrated_components: component_refs(doc, &doc.hydrated_components),
            client_only_components: component_refs(doc, &doc.client_only_components),
            hydration_directives: doc.hydration_directives.iter().cloned().collect(),
            diagnostics,
        }
    }
}
