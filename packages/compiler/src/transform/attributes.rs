//! Attributes pass
//!
//! Splits attribute values into literal and expression parts and marks the
//! owning element as referenced when any part, or the attribute kind itself,
//! needs a runtime binding.

use crate::chars;
use crate::expression_parser::{Expression, ExpressionError, ExpressionParser};
use crate::ml_parser::{
    Attribute, AttributeKind, AttributeValue, Document, Interpolation, InterpolationPart,
    NodeType, Quote,
};
use crate::parse_util::Diagnostics;

use super::interpolation::{has_interpolation, parse_interpolation};

pub fn parse_attributes(
    doc: &mut Document,
    parser: &ExpressionParser,
    diagnostics: &mut Diagnostics,
) -> Result<(), ExpressionError> {
    for id in doc.walk() {
        let node = doc.node_mut(id);
        if !matches!(
            node.ty,
            NodeType::Element | NodeType::Component | NodeType::Fragment
        ) {
            continue;
        }
        let Some(element) = node.as_element_mut() else {
            continue;
        };

        let mut attributes = Vec::with_capacity(element.attributes.len());
        for mut attribute in std::mem::take(&mut element.attributes) {
            if attribute.is_anonymous() {
                match shorthand(&attribute, parser)? {
                    Some(named) => attribute = named,
                    None => {
                        diagnostics.add_error(
                            format!(
                                "Anonymous attribute {} must be a single identifier",
                                attribute.raw
                            ),
                            attribute.position.and_then(|p| p.loc),
                        );
                        continue;
                    }
                }
            } else {
                parse_value(&mut attribute, parser)?;
            }
            attributes.push(attribute);
        }

        let referenced = attributes.iter().any(|a| {
            a.kind != AttributeKind::Attribute || a.parts().iter().any(InterpolationPart::is_dynamic)
        });
        element.attributes = attributes;
        node.params.reference |= referenced;
    }
    Ok(())
}

fn parse_value(attribute: &mut Attribute, parser: &ExpressionParser) -> Result<(), ExpressionError> {
    let kind = attribute.kind;
    let parts = match &attribute.value {
        AttributeValue::Parts { .. } => return Ok(()),
        AttributeValue::Empty => match implicit_expression(attribute, parser)? {
            Some(expression) => (vec![expression_part(expression)], Quote::Brace),
            None => return Ok(()),
        },
        AttributeValue::Text { text, quote: Quote::Brace } => {
            if text.trim().is_empty() {
                (vec![InterpolationPart::Literal("{}".to_string())], Quote::Brace)
            } else {
                let expression = parser.parse_expression(text)?;
                let part = match (&expression.literal, kind) {
                    (Some(folded), AttributeKind::Attribute) => {
                        InterpolationPart::Literal(folded.clone())
                    }
                    _ => expression_part(expression),
                };
                (vec![part], Quote::Brace)
            }
        }
        AttributeValue::Text { text, quote } => {
            let whole_expression = matches!(
                kind,
                AttributeKind::Event | AttributeKind::Bind | AttributeKind::Ref | AttributeKind::Action
            ) && !has_interpolation(text)
                && !text.trim().is_empty();
            if whole_expression {
                (vec![expression_part(parser.parse_expression(text)?)], *quote)
            } else {
                (parse_interpolation(text, parser)?, *quote)
            }
        }
    };
    attribute.value = AttributeValue::Parts {
        parts: parts.0,
        quote: parts.1,
    };
    Ok(())
}

/// Expression a valueless binding attribute stands for: `@click` calls
/// `click`, `:value` binds `value`, `class.active` toggles on `active`.
fn implicit_expression(
    attribute: &Attribute,
    parser: &ExpressionParser,
) -> Result<Option<Expression>, ExpressionError> {
    let name = match attribute.kind {
        AttributeKind::Event | AttributeKind::Bind | AttributeKind::Ref => attribute.name.as_str(),
        AttributeKind::Modifier => attribute.modifiers().last().copied().unwrap_or_default(),
        AttributeKind::Attribute | AttributeKind::Action => return Ok(None),
    };
    if !chars::is_identifier(name) {
        return Ok(None);
    }
    parser.parse_expression(name).map(Some)
}

/// `{name}` into `name={name}`.
fn shorthand(
    attribute: &Attribute,
    parser: &ExpressionParser,
) -> Result<Option<Attribute>, ExpressionError> {
    let Some(text) = attribute.text_value().map(str::trim) else {
        return Ok(None);
    };
    if !chars::is_identifier(text) {
        return Ok(None);
    }
    let expression = parser.parse_expression(text)?;
    Ok(Some(Attribute {
        name: text.to_string(),
        value: AttributeValue::Parts {
            parts: vec![expression_part(expression)],
            quote: Quote::Brace,
        },
        ..attribute.clone()
    }))
}

fn expression_part(expression: Expression) -> InterpolationPart {
    InterpolationPart::Expression(Interpolation {
        expression,
        html: false,
    })
}
