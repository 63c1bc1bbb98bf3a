//! Texts pass
//!
//! Splits text content into parts. A text that keeps an expression reading
//! a free identifier marks its element parent as referenced.

use crate::expression_parser::{ExpressionError, ExpressionParser};
use crate::ml_parser::{Document, InterpolationPart, NodeKind, NodeType, TextContent};

use super::interpolation::parse_interpolation;

pub fn parse_texts(doc: &mut Document, parser: &ExpressionParser) -> Result<(), ExpressionError> {
    for id in doc.walk() {
        let node = doc.node_mut(id);
        if node.ty != NodeType::Text {
            continue;
        }
        let NodeKind::Text(text) = &mut node.kind else {
            continue;
        };
        let TextContent::Raw(raw) = &text.content else {
            continue;
        };
        let parts = parse_interpolation(raw, parser)?;
        let dynamic = parts.iter().any(InterpolationPart::is_dynamic);
        text.content = TextContent::Parts(parts);

        if dynamic {
            if let Some(parent) = doc.element_parent(id) {
                doc.node_mut(parent).params.reference = true;
            }
        }
    }
    Ok(())
}
