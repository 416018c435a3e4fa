//! # Astro Template Transform
//!
//! Rewrites a parsed `.astro` template tree ahead of printing.
//!
//! ## Pipeline Invariants
//!
//! 1. **Single Tree**: every pass mutates one arena-backed `Document`. Nodes are
//!    addressed by `NodeId`; detached nodes stay alive in the arena so registries
//!    can still point at them.
//!
//! 2. **Registries Prepend**: styles, scripts and hydrated components are pushed
//!    to the front of their registries as they are discovered. A registry therefore
//!    lists nodes in reverse document order.
//!
//! 3. **One Scope Class**: a scoped document gains `astro-<scope>` on every
//!    eligible element exactly once, whatever the class attribute kind.
//!
//! 4. **Warnings Never Abort**: W001, W002 and W003 are reported through a
//!    `DiagnosticSink`; the transform always completes.
//!
//! 5. **Printable Output**: the root always has at least one child after
//!    `transform` returns.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod diagnostics;
mod directives;
mod document;
mod finalize;
mod hydration;
mod ir;
mod options;
mod scope;
mod scripts;
mod styles;
mod transform;
mod visitor;
mod whitespace;


pub use diagnostics::{
    Diagnostic, DiagnosticSink, Severity, TracingSink, TransformError, WARN_DYNAMIC_SCRIPT_SRC,
    WARN_HOIST_DEPRECATED, WARN_SET_DIRECTIVE_CHILDREN,
};
pub use directives::{normalize_set_directives, SET_HTML, SET_TEXT};
pub use document::{Children, Document, Node, NodeId};
pub use finalize::{ComponentRef, TransformResult};
pub use hydration::add_component_props;
pub use ir::{
    AttributeIR, AttributeKind, ContainerInput, ElementInput, ElementKind, ElementNode, NodeData,
    NodeInput, SourceLocation, TextInput, TextNode,
};
pub use options::{BuildMode, TransformOptions};
pub use scope::{
    annotate_document, annotate_element, inject_scoped_class, scope_element,
    NEVER_SCOPED_ELEMENTS, NEVER_SCOPED_SELECTORS,
};
pub use scripts::extract_script;
pub use styles::{extract_styles, GlobalDirectiveScoper, StyleScoper};
pub use transform::{
    compile_document, transform, transform_batch, transform_json, TransformJob,
    TransformSummary,
};
pub use visitor::{walk, walk_document, TemplateVisitor};
pub use whitespace::clean_whitespace;

#[cfg(feature = "napi")]
#[napi]
pub fn transform_document_native(nodes_json: String, options_json: String) -> napi::Result<String> {
    transform_json(&nodes_json, &options_json).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(feature = "napi")]
#[napi]
pub fn transform_bridge() -> String {
    "Astro Transform Native Bridge Connected".to_string()
}
