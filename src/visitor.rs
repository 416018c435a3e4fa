use crate::document::{Document, NodeId};

/// The TemplateVisitor trait defines the single authoritative traversal mechanism for documents.
///
/// Rules:
/// 1. Traversal order is pre-order and fixed: a node, then its children in sibling order.
/// 2. A visitor may rewrite the payload (attributes, text) of the node being visited.
/// 3. A visitor MUST NOT detach or attach nodes. Structural edits are collected during
///    the walk and applied by the caller once `walk` has returned.
/// 4. No manual recursion outside of this system.
pub trait TemplateVisitor {
    fn visit_node(&mut self, doc: &mut Document, id: NodeId);
}

impl<F> TemplateVisitor for F
where
    F: FnMut(&mut Document, NodeId),
{
    fn visit_node(&mut self, doc: &mut Document, id: NodeId) {
        self(doc, id)
    }
}

/// Visits `start` and every descendant exactly once.
///
/// Uses an explicit stack, so nesting depth is bounded by heap rather than call stack.
/// Children are read after their parent has been visited.
pub fn walk<V: TemplateVisitor + ?Sized>(doc: &mut Document, start: NodeId, visitor: &mut V) {
    let mut stack = vec![start];
    let mut children = Vec::new();

    while let Some(id) = stack.pop() {
        visitor.visit_node(doc, id);

        children.clear();
        children.extend(doc.children(id));
        stack.extend(children.iter().rev().copied());
    }
}

pub fn walk_document<V: TemplateVisitor + ?Sized>(doc: &mut Document, visitor: &mut V) {
    let root = doc.root();
    walk(doc, root, visitor);
}
