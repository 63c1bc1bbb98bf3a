//! Style AST
//!
//! Lightweight stylesheet tree: rules and at-rules with their raw declaration
//! text. Nested rules are children until resolution flattens them.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleSheet {
    pub nodes: Vec<StyleNode>,
}

impl StyleSheet {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum StyleNode {
    Rule(StyleRule),
    AtRule(AtRule),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRule {
    pub selectors: Vec<String>,
    /// Body text with nested rules cut out.
    pub declarations: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StyleNode>,
}

impl StyleRule {
    pub fn new(selectors: Vec<String>, declarations: impl Into<String>) -> Self {
        StyleRule {
            selectors,
            declarations: declarations.into(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtRule {
    /// Name without the `@`.
    pub name: String,
    pub params: String,
    pub declarations: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StyleNode>,
    /// `false` for statement at-rules such as `@import url(a.css);`.
    pub has_block: bool,
}

/// At-rules that condition their content and may wrap a parent selector.
const CONDITIONAL_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "document",
    "layer",
    "container",
    "scope",
    "starting-style",
];

impl AtRule {
    pub fn is_conditional(&self) -> bool {
        CONDITIONAL_AT_RULES.contains(&self.name.to_ascii_lowercase().as_str())
    }
}
