//! Script hoisting.
//!
//! Eligible `<script>` elements are recorded in `doc.scripts` during the shared
//! traversal. They stay linked in the tree until the pipeline detaches them after
//! the walk.

use crate::diagnostics::{
    Diagnostic, DiagnosticSink, WARN_DYNAMIC_SCRIPT_SRC, WARN_HOIST_DEPRECATED,
};
use crate::document::{Document, NodeId};
use crate::ir::AttributeKind;
use crate::options::TransformOptions;

pub fn extract_script(
    doc: &mut Document,
    id: NodeId,
    options: &TransformOptions,
    sink: &mut dyn DiagnosticSink,
) {
    let Some(el) = doc.element(id) else {
        return;
    };
    if el.tag != "script" || el.has_set_directive() || el.has_inline_directive() {
        return;
    }

    if let Some(hoist) = el.get_attr("hoist") {
        sink.report(
            Diagnostic::warning(
                WARN_HOIST_DEPRECATED,
                format!(
                    "{}: <script hoist> is no longer needed.",
                    options.filename
                ),
                &options.filename,
            )
            .at(hoist.location),
        );
    }

    // define:vars overrides hoist.
    let by_hoist = el.has_truthy_attr("hoist") && !el.has_attr("define:vars");
    let by_bare = el.attributes.is_empty();
    let src_only = el.attributes.len() == 1 && el.attributes[0].key == "src";

    if !(by_hoist || by_bare || src_only) {
        return;
    }

    if src_only && !by_hoist {
        let src = &el.attributes[0];
        if src.kind == AttributeKind::Expression && options.static_extraction {
            sink.report(
                Diagnostic::warning(
                    WARN_DYNAMIC_SCRIPT_SRC,
                    format!(
                        "{}: <script> uses the expression {{{}}} on the src attribute and will be ignored.",
                        options.filename, src.value
                    ),
                    &options.filename,
                )
                .at(src.location),
            );
            return;
        }
    }

    doc.scripts.insert(0, id);
}
