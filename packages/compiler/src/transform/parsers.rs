//! Parsers pass
//!
//! Hands the verbatim bodies of `Script` and `Style` nodes to their
//! sub-parsers. Returns whether any script is TypeScript, which selects the
//! dialect used for template expressions.

use crate::error::Result;
use crate::expression_parser::ExpressionParser;
use crate::ml_parser::{Document, NodeType};
use crate::style::parse_style;

pub fn extract(doc: &mut Document) -> Result<bool> {
    let mut typescript = false;
    for id in doc.walk() {
        let node = doc.node_mut(id);
        match node.ty {
            NodeType::Script => {
                typescript |= node.params.typescript;
                if node.params.script.is_some() {
                    continue;
                }
                let raw = node.as_element().and_then(|e| e.raw.clone()).unwrap_or_default();
                let parser = ExpressionParser::with_typescript(node.params.typescript);
                node.params.script = Some(parser.parse_script(&raw)?);
            }
            NodeType::Style => {
                if node.params.style.is_some() {
                    continue;
                }
                let raw = node.as_element().and_then(|e| e.raw.clone()).unwrap_or_default();
                node.params.style = Some(parse_style(&raw)?);
            }
            _ => {}
        }
    }
    Ok(typescript)
}
