//! Markup serializer
//!
//! Prints a [`Document`] back to template markup. Parsed interpolations are
//! written as `{code}`, so the output parses to the same structure.

use super::ast::{
    Attribute, AttributeValue, Document, InterpolationPart, Node, NodeId, NodeKind, Quote,
    TextContent,
};
use super::tags::FRAGMENT_ATTRIBUTE;

pub fn to_html(doc: &Document) -> String {
    let mut out = String::new();
    for &child in doc.children(NodeId::ROOT) {
        write_node(doc, child, &mut out);
    }
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let node = doc.node(id);
    match &node.kind {
        NodeKind::Document => {}
        NodeKind::Text(text) => match &text.content {
            TextContent::Raw(raw) => out.push_str(raw),
            TextContent::Parts(parts) => write_parts(parts, out),
        },
        NodeKind::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(&comment.content);
            out.push_str("-->");
        }
        NodeKind::Element(element) => {
            out.push('<');
            out.push_str(&element.name);
            write_fragment_name(node, out);
            for attribute in &element.attributes {
                out.push(' ');
                write_attribute(attribute, out);
            }
            if element.self_closing {
                out.push_str("/>");
                return;
            }
            out.push('>');
            if element.void_element {
                return;
            }
            if let Some(raw) = &element.raw {
                out.push_str(raw);
            }
            for &child in &node.children {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
    }
}

fn write_fragment_name(node: &Node, out: &mut String) {
    if let Some(fragment) = &node.params.fragment {
        out.push(' ');
        out.push_str(FRAGMENT_ATTRIBUTE);
        out.push_str("=\"");
        out.push_str(fragment);
        out.push('"');
    }
}

fn write_attribute(attribute: &Attribute, out: &mut String) {
    let name = attribute.full_name();
    match &attribute.value {
        AttributeValue::Empty => out.push_str(&name),
        AttributeValue::Text { text, quote } => write_value(&name, *quote, out, |out| out.push_str(text)),
        AttributeValue::Parts { parts, quote } => match (quote, parts.as_slice()) {
            (Quote::Brace, [InterpolationPart::Expression(interpolation)]) => {
                write_value(&name, Quote::Brace, out, |out| {
                    out.push_str(&interpolation.expression.code)
                })
            }
            _ => write_value(&name, Quote::Double, out, |out| write_parts(parts, out)),
        },
    }
}

fn write_value(name: &str, quote: Quote, out: &mut String, body: impl FnOnce(&mut String)) {
    out.push_str(name);
    if !name.is_empty() {
        out.push('=');
    }
    let (open, close) = match quote {
        Quote::Double => ("\"", "\""),
        Quote::Single => ("'", "'"),
        Quote::Brace => ("{", "}"),
        Quote::Unquoted => ("", ""),
    };
    out.push_str(open);
    body(out);
    out.push_str(close);
}

fn write_parts(parts: &[InterpolationPart], out: &mut String) {
    for part in parts {
        match part {
            InterpolationPart::Literal(text) => out.push_str(text),
            InterpolationPart::Expression(interpolation) => {
                out.push('{');
                if interpolation.html {
                    out.push_str("@html ");
                }
                out.push_str(&interpolation.expression.code);
                out.push('}');
            }
        }
    }
}
