//! ML Parser AST
//!
//! Markup tree stored as an arena. Nodes are addressed by [`NodeId`]; parents
//! live in a side table so the tree has no back-pointers and serializes
//! as-is for snapshots.

use serde::Serialize;

use crate::config::Generate;
use crate::expression_parser::{Expression, ScriptParts};
use crate::parse_util::ParseSourceSpan;
use crate::style::StyleSheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Discriminant every pass after typing dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeType {
    Document,
    Element,
    Component,
    Fragment,
    Script,
    Style,
    Block(BlockKind),
    Text,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockKind {
    If,
    Elseif,
    Else,
    For,
    Slot,
    SlotContent,
}

impl BlockKind {
    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::If => "if",
            BlockKind::Elseif => "elseif",
            BlockKind::Else => "else",
            BlockKind::For => "for",
            BlockKind::Slot => "slot",
            BlockKind::SlotContent => "content",
        }
    }
}

/// Byte offsets and/or line/column range of a node, when requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub ty: NodeType,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
    pub params: Params,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Node {
    pub fn new(ty: NodeType, kind: NodeKind) -> Self {
        Node {
            ty,
            kind,
            children: Vec::new(),
            params: Params::default(),
            position: None,
        }
    }

    pub fn element(element: Element) -> Self {
        Node::new(NodeType::Element, NodeKind::Element(element))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::new(
            NodeType::Text,
            NodeKind::Text(Text {
                content: TextContent::Raw(content.into()),
            }),
        )
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Node::new(
            NodeType::Comment,
            NodeKind::Comment(Comment {
                content: content.into(),
            }),
        )
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match &mut self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this node is a markup tag, whatever it was typed as.
    pub fn is_tag(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    /// Text made only of whitespace.
    pub fn is_blank_text(&self) -> bool {
        match &self.kind {
            NodeKind::Text(Text {
                content: TextContent::Raw(raw),
            }) => raw.chars().all(crate::chars::is_whitespace),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "node")]
pub enum NodeKind {
    Document,
    Element(Element),
    Text(Text),
    Comment(Comment),
}

#[derive(Debug, Clone, Serialize)]
pub struct Element {
    pub name: String,
    pub void_element: bool,
    pub self_closing: bool,
    pub attributes: Vec<Attribute>,
    /// Verbatim inner text of raw containers (script, style, template, textarea).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            void_element: false,
            self_closing: false,
            attributes: Vec::new(),
            raw: None,
        }
    }

    /// First attribute whose full written name matches.
    pub fn attribute(&self, full_name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.full_name() == full_name)
    }

    pub fn has_attribute(&self, full_name: &str) -> bool {
        self.attribute(full_name).is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Text {
    pub content: TextContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TextContent {
    Raw(String),
    Parts(Vec<InterpolationPart>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quote {
    Double,
    Single,
    Brace,
    Unquoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeKind {
    Attribute,
    Event,
    Bind,
    Ref,
    Action,
    Modifier,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Empty,
    Text { text: String, quote: Quote },
    Parts { parts: Vec<InterpolationPart>, quote: Quote },
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<char>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    pub value: AttributeValue,
    pub kind: AttributeKind,
    /// Source slice the attribute was read from.
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        let name = name.into();
        Attribute {
            prefix: None,
            raw: name.clone(),
            name,
            suffix: None,
            value,
            kind: AttributeKind::Attribute,
            position: None,
        }
    }

    /// Name as written, affixes included.
    pub fn full_name(&self) -> String {
        let mut full = String::new();
        if let Some(prefix) = self.prefix {
            full.push(prefix);
        }
        full.push_str(&self.name);
        if let Some(suffix) = &self.suffix {
            full.push_str(suffix);
        }
        full
    }

    /// `.a.b` suffix split into `["a", "b"]`.
    pub fn modifiers(&self) -> Vec<&str> {
        self.suffix
            .as_deref()
            .map(|s| s.split('.').filter(|m| !m.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Unparsed value text, if the value has not been split into parts yet.
    pub fn text_value(&self) -> Option<&str> {
        match &self.value {
            AttributeValue::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// The value parts, once interpolation parsing has run.
    pub fn parts(&self) -> &[InterpolationPart] {
        match &self.value {
            AttributeValue::Parts { parts, .. } => parts,
            _ => &[],
        }
    }

    /// The value when it is exactly one expression.
    pub fn single_expression(&self) -> Option<&Expression> {
        match self.parts() {
            [InterpolationPart::Expression(interpolation)] => Some(&interpolation.expression),
            _ => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty() && self.prefix.is_none()
    }
}

/// One piece of interpolated text or attribute value.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum InterpolationPart {
    Literal(String),
    Expression(Interpolation),
}

#[derive(Debug, Clone, Serialize)]
pub struct Interpolation {
    pub expression: Expression,
    /// Written as `{@html expr}`.
    pub html: bool,
}

impl InterpolationPart {
    /// An expression reading at least one free identifier. Constant
    /// expressions are evaluated into the static markup instead.
    pub fn is_dynamic(&self) -> bool {
        match self {
            InterpolationPart::Expression(interpolation) => !interpolation.expression.is_static,
            InterpolationPart::Literal(_) => false,
        }
    }
}

/// Parsed `for` block header.
#[derive(Debug, Clone, Serialize)]
pub struct ForLoop {
    pub iterable: Expression,
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Expression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guard: Option<Expression>,
}

#[derive(Debug, Clone, Serialize)]
pub enum BlockParams {
    Condition(Expression),
    Loop(ForLoop),
    Slot(String),
}

/// Side-channel metadata filled in by the transform passes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Params {
    /// Set once the Types pass has classified the node.
    #[serde(skip)]
    pub typed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reference: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate: Option<Generate>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub typescript: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<BlockParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<ScriptParts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleSheet>,
}

/// Arena-backed markup tree rooted at [`NodeId::ROOT`].
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    nodes: Vec<Node>,
    #[serde(skip)]
    parents: Vec<Option<NodeId>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            nodes: vec![Node::new(NodeType::Document, NodeKind::Document)],
            parents: vec![None],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Appends `node` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.parents.push(Some(parent));
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.index()).copied().flatten()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn sibling(&self, id: NodeId, offset: isize) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)? as isize + offset;
        if index < 0 {
            return None;
        }
        self.children(parent).get(index as usize).copied()
    }

    /// Nearest ancestor that is a markup tag.
    pub fn element_parent(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if self.node(parent).is_tag() {
                return Some(parent);
            }
            current = self.parent(parent);
        }
        None
    }

    /// Removes `id` from its parent's child list. The node stays in the arena.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.nodes[parent.index()].children.retain(|&c| c != id);
            self.parents[id.index()] = None;
        }
    }

    /// All attached nodes below `id` in document order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// Ids of every attached node in document order, the root first.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = vec![NodeId::ROOT];
        out.extend(self.descendants(NodeId::ROOT));
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
