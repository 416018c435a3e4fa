//! IR Types for the Transform Stage
//!
//! Node payloads, attributes and the nested interchange form (`NodeInput`) the
//! host parser hands over. The arena that links nodes together lives in
//! `document.rs`.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// SOURCE LOCATION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ATTRIBUTES
// ═══════════════════════════════════════════════════════════════════════════════

/// Syntactic form of an attribute value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeKind {
    /// `<div hidden>`
    Empty,
    /// `<div class="a">`
    #[default]
    Quoted,
    /// `<Comp {class}>`
    Shorthand,
    /// `<div class={a}>`
    Expression,
    /// ``<div class=`a ${b}`>``
    TemplateLiteral,
    /// A form this stage does not know about. Passes leave it untouched.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeIR {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub kind: AttributeKind,
    #[serde(default)]
    pub location: SourceLocation,
}

impl AttributeIR {
    pub fn new(key: impl Into<String>, value: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind,
            location: SourceLocation::default(),
        }
    }

    pub fn empty(key: impl Into<String>) -> Self {
        Self::new(key, "", AttributeKind::Empty)
    }

    pub fn quoted(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, value, AttributeKind::Quoted)
    }

    /// Shorthand attributes carry their key as the implied value.
    pub fn shorthand(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(key.clone(), key, AttributeKind::Shorthand)
    }

    pub fn expression(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, value, AttributeKind::Expression)
    }

    pub fn template_literal(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, value, AttributeKind::TemplateLiteral)
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Conventional truthiness: valueless forms are true; literal `false`
    /// (quoted or as an expression) is false.
    pub fn is_truthy(&self) -> bool {
        match self.kind {
            AttributeKind::Empty | AttributeKind::Shorthand => true,
            AttributeKind::Quoted | AttributeKind::TemplateLiteral | AttributeKind::Expression => {
                self.value.trim() != "false"
            }
            AttributeKind::Unknown => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE PAYLOADS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse-time classification of an element. Never changes during rewriting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    #[default]
    Html,
    Component,
    CustomElement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub tag: String,
    pub kind: ElementKind,
    pub fragment: bool,
    pub attributes: Vec<AttributeIR>,
    pub location: SourceLocation,
}

impl ElementNode {
    pub fn is_component(&self) -> bool {
        self.kind == ElementKind::Component
    }

    pub fn is_custom_element(&self) -> bool {
        self.kind == ElementKind::CustomElement
    }

    /// First attribute with the given key, in list order.
    pub fn get_attr(&self, key: &str) -> Option<&AttributeIR> {
        self.attributes.iter().find(|attr| attr.key == key)
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.get_attr(key).is_some()
    }

    pub fn has_truthy_attr(&self, key: &str) -> bool {
        self.attributes
            .iter()
            .any(|attr| attr.key == key && attr.is_truthy())
    }

    pub fn has_set_directive(&self) -> bool {
        self.has_attr("set:html") || self.has_attr("set:text")
    }

    pub fn has_inline_directive(&self) -> bool {
        self.has_attr("is:inline")
    }

    /// Removes the first attribute with the given key and returns it.
    pub fn remove_attribute(&mut self, key: &str) -> Option<AttributeIR> {
        let index = self.attributes.iter().position(|attr| attr.key == key)?;
        Some(self.attributes.remove(index))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Root of a document. Never appears inside the tree.
    Document,
    Element(ElementNode),
    Text(TextNode),
    Comment(TextNode),
    Frontmatter(SourceLocation),
    Expression(SourceLocation),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextNode {
    pub value: String,
    pub location: SourceLocation,
}

// ═══════════════════════════════════════════════════════════════════════════════
// INTERCHANGE FORM
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeInput {
    Element(ElementInput),
    Text(TextInput),
    Comment(TextInput),
    Frontmatter(ContainerInput),
    Expression(ContainerInput),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ElementInput {
    pub tag: String,
    #[serde(default)]
    pub kind: ElementKind,
    #[serde(default)]
    pub fragment: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeIR>,
    #[serde(default)]
    pub children: Vec<NodeInput>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextInput {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInput {
    #[serde(default)]
    pub children: Vec<NodeInput>,
    #[serde(default)]
    pub location: SourceLocation,
}

impl ElementInput {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            kind: ElementKind::Html,
            fragment: false,
            attributes: vec![],
            children: vec![],
            location: SourceLocation::default(),
        }
    }

    pub fn component(tag: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Component,
            ..Self::new(tag)
        }
    }

    pub fn custom_element(tag: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::CustomElement,
            ..Self::new(tag)
        }
    }

    pub fn fragment(mut self) -> Self {
        self.fragment = true;
        self
    }

    pub fn attr(mut self, attr: AttributeIR) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn child(mut self, child: NodeInput) -> Self {
        self.children.push(child);
        self
    }

    pub fn into_node(self) -> NodeInput {
        NodeInput::Element(self)
    }
}

impl NodeInput {
    pub fn text(value: impl Into<String>) -> Self {
        NodeInput::Text(TextInput {
            value: value.into(),
            location: SourceLocation::default(),
        })
    }

    pub fn comment(value: impl Into<String>) -> Self {
        NodeInput::Comment(TextInput {
            value: value.into(),
            location: SourceLocation::default(),
        })
    }

    /// An expression container holding its code as a single text child.
    pub fn expression(code: impl Into<String>) -> Self {
        NodeInput::Expression(ContainerInput {
            children: vec![NodeInput::text(code)],
            location: SourceLocation::default(),
        })
    }

    pub fn frontmatter(code: impl Into<String>) -> Self {
        NodeInput::Frontmatter(ContainerInput {
            children: vec![NodeInput::text(code)],
            location: SourceLocation::default(),
        })
    }
}
