//! # Document Arena
//!
//! A document owns every node in a flat arena addressed by `NodeId`. Subtree
//! ownership flows parent → child through the link fields; `parent` is a plain
//! back-reference used for ancestor lookup and detachment.
//!
//! ## Key Invariants
//!
//! 1. **Single Parent**: a node is linked under at most one parent at a time.
//! 2. **Consistent Links**: after `append_child`/`detach` the sibling chain of the
//!    affected parent is intact and no other subtree is touched.
//! 3. **Stable Handles**: detaching never invalidates a `NodeId`; detached nodes
//!    stay in the arena and may still be referenced from a registry.
//! 4. **Registry Order**: registries are filled by prepending, so a forward walk
//!    leaves them in reverse document order. Printers rely on this.

use std::collections::{BTreeSet, HashMap};

use crate::ir::{
    ContainerInput, ElementInput, ElementNode, NodeData, NodeInput, TextInput, TextNode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub data: NodeData,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            data,
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match &self.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self.data, NodeData::Expression(_))
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    pub styles: Vec<NodeId>,
    pub scripts: Vec<NodeId>,
    pub hydrated_components: Vec<NodeId>,
    pub client_only_components: Vec<NodeId>,
    pub hydration_directives: BTreeSet<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            root: NodeId(0),
            styles: vec![],
            scripts: vec![],
            hydrated_components: vec![],
            client_only_components: vec![],
            hydration_directives: BTreeSet::new(),
        }
    }

    /// Builds a document from the parser's nested node list.
    ///
    /// Intake uses a work stack, so input depth is bounded by heap rather than
    /// call stack. Each input is consumed one level at a time.
    pub fn from_nodes(nodes: Vec<NodeInput>) -> Self {
        let mut doc = Self::new();
        let mut stack: Vec<(NodeId, NodeInput)> =
            nodes.into_iter().rev().map(|node| (doc.root, node)).collect();

        while let Some((parent, input)) = stack.pop() {
            let (data, children) = split_input(input);
            let id = doc.create_node(data);
            doc.append_child(parent, id);
            stack.extend(children.into_iter().rev().map(|child| (id, child)));
        }
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()].data
    }

    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()].data
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementNode> {
        self.node(id).as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementNode> {
        match self.data_mut(id) {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Allocates a detached node.
    pub fn create_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(id),
        }
    }

    /// Links `child` as the last child of `parent`, detaching it first if needed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(child).parent.is_some() {
            self.detach(child);
        }

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = Some(parent);
            node.prev_sibling = last;
            node.next_sibling = None;
        }
        match last {
            Some(last) => self.nodes[last.index()].next_sibling = Some(child),
            None => self.nodes[parent.index()].first_child = Some(child),
        }
        self.nodes[parent.index()].last_child = Some(child);
    }

    /// Unlinks `child` from `parent`. A node that is not a child of `parent` is
    /// left alone.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(child).parent == Some(parent) {
            self.detach(child);
        }
    }

    /// Unlinks a node from its parent and siblings. Its own subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        let Some(parent) = parent else {
            return;
        };

        match prev {
            Some(prev) => self.nodes[prev.index()].next_sibling = next,
            None => self.nodes[parent.index()].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next.index()].prev_sibling = prev,
            None => self.nodes[parent.index()].last_child = prev,
        }

        let node = &mut self.nodes[id.index()];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Nearest node, starting at `id` itself, that satisfies `predicate`.
    pub fn closest<F>(&self, id: NodeId, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(&Node) -> bool,
    {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if predicate(node) {
                return Some(node_id);
            }
            current = node.parent;
        }
        None
    }

    /// Nested copy of a subtree in interchange form. The document root has no
    /// interchange form of its own and yields its children wrapped in a fragment.
    ///
    /// Children are built before their parents from a pre-order listing, without
    /// recursion.
    pub fn snapshot(&self, id: NodeId) -> NodeInput {
        let mut order = vec![];
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.children(current));
        }

        // `order[0]` is `id`; everything after it is a descendant.
        let mut built: HashMap<NodeId, NodeInput> = HashMap::with_capacity(order.len());
        for &current in order[1..].iter().rev() {
            let children = self.take_children(current, &mut built);
            built.insert(current, self.node_input(current, children));
        }
        let children = self.take_children(id, &mut built);
        self.node_input(id, children)
    }

    fn take_children(&self, id: NodeId, built: &mut HashMap<NodeId, NodeInput>) -> Vec<NodeInput> {
        self.children(id).filter_map(|child| built.remove(&child)).collect()
    }

    fn node_input(&self, id: NodeId, children: Vec<NodeInput>) -> NodeInput {
        match &self.node(id).data {
            NodeData::Document => ElementInput {
                children,
                ..ElementInput::new("Fragment").fragment()
            }
            .into_node(),
            NodeData::Element(el) => NodeInput::Element(ElementInput {
                tag: el.tag.clone(),
                kind: el.kind,
                fragment: el.fragment,
                attributes: el.attributes.clone(),
                children,
                location: el.location,
            }),
            NodeData::Text(t) => NodeInput::Text(TextInput {
                value: t.value.clone(),
                location: t.location,
            }),
            NodeData::Comment(t) => NodeInput::Comment(TextInput {
                value: t.value.clone(),
                location: t.location,
            }),
            NodeData::Frontmatter(location) => NodeInput::Frontmatter(ContainerInput {
                children,
                location: *location,
            }),
            NodeData::Expression(location) => NodeInput::Expression(ContainerInput {
                children,
                location: *location,
            }),
        }
    }

    /// Snapshots of the root's children, i.e. what the printer emits.
    pub fn to_nodes(&self) -> Vec<NodeInput> {
        self.children(self.root).map(|c| self.snapshot(c)).collect()
    }
}

/// Payload of one input node and its not-yet-inserted children.
fn split_input(input: NodeInput) -> (NodeData, Vec<NodeInput>) {
    match input {
        NodeInput::Element(el) => (
            NodeData::Element(ElementNode {
                tag: el.tag,
                kind: el.kind,
                fragment: el.fragment,
                attributes: el.attributes,
                location: el.location,
            }),
            el.children,
        ),
        NodeInput::Text(t) => (
            NodeData::Text(TextNode {
                value: t.value,
                location: t.location,
            }),
            vec![],
        ),
        NodeInput::Comment(t) => (
            NodeData::Comment(TextNode {
                value: t.value,
                location: t.location,
            }),
            vec![],
        ),
        NodeInput::Frontmatter(c) => (NodeData::Frontmatter(c.location), c.children),
        NodeInput::Expression(c) => (NodeData::Expression(c.location), c.children),
    }
}

pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}
