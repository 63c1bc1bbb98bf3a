//! Types pass
//!
//! Assigns every tag its node type exactly once and classifies attributes by
//! their affix.

use crate::chars;
use crate::config::Generate;
use crate::ml_parser::{
    get_block_kind, is_known_element, Attribute, AttributeKind, AttributeValue, Document,
    NodeType, FRAGMENT_ATTRIBUTE,
};
use crate::parse_util::{Diagnostics, ParseSourceSpan};

pub fn classify(doc: &mut Document, diagnostics: &mut Diagnostics) {
    for id in doc.walk() {
        let node = doc.node_mut(id);
        if node.ty != NodeType::Element || node.params.typed {
            continue;
        }
        let Some(element) = node.as_element_mut() else {
            continue;
        };

        let mut fragment = None;
        if let Some(index) = element
            .attributes
            .iter()
            .position(|a| a.full_name() == FRAGMENT_ATTRIBUTE)
        {
            let attribute = element.attributes.remove(index);
            match attribute.text_value().map(str::trim) {
                Some(name) if !name.is_empty() => fragment = Some(name.to_string()),
                _ => diagnostics.add_error(
                    format!("{} on <{}> requires a value", FRAGMENT_ATTRIBUTE, element.name),
                    attribute_span(&attribute),
                ),
            }
        }

        for attribute in &mut element.attributes {
            attribute.kind = attribute_kind(attribute);
        }

        let name = element.name.as_str();
        let (ty, generate, typescript) = if name.eq_ignore_ascii_case("script") {
            (
                NodeType::Script,
                script_target(&element.attributes),
                element
                    .attribute("lang")
                    .and_then(Attribute::text_value)
                    .is_some_and(|lang| lang == "ts"),
            )
        } else if name.eq_ignore_ascii_case("style") {
            (NodeType::Style, None, false)
        } else if fragment.is_some() {
            (NodeType::Fragment, None, false)
        } else if let Some(kind) = get_block_kind(name) {
            (NodeType::Block(kind), None, false)
        } else if is_known_element(name) {
            (NodeType::Element, None, false)
        } else {
            (NodeType::Component, None, false)
        };

        node.ty = ty;
        node.params.typed = true;
        // Component invocations render through an anchor.
        node.params.reference |= ty == NodeType::Component;
        node.params.fragment = fragment;
        node.params.generate = generate;
        node.params.typescript = typescript;
    }
}

fn attribute_kind(attribute: &Attribute) -> AttributeKind {
    match attribute.prefix {
        Some(chars::AT) => AttributeKind::Event,
        Some(chars::COLON) => AttributeKind::Bind,
        Some(chars::HASH) => AttributeKind::Ref,
        Some(chars::STAR) => AttributeKind::Action,
        _ if attribute.suffix.is_some() => AttributeKind::Modifier,
        _ => AttributeKind::Attribute,
    }
}

/// `<script ssr>`, `<script csr>` or `<script generate="ssr">`.
fn script_target(attributes: &[Attribute]) -> Option<Generate> {
    attributes.iter().find_map(|a| match (&a.value, a.full_name().as_str()) {
        (AttributeValue::Empty, "ssr") => Some(Generate::Ssr),
        (AttributeValue::Empty, "csr") => Some(Generate::Csr),
        (AttributeValue::Text { text, .. }, "generate") => Generate::from_str_opt(text),
        _ => None,
    })
}

fn attribute_span(attribute: &Attribute) -> Option<ParseSourceSpan> {
    attribute.position.and_then(|p| p.loc)
}
