//! ML Parser Test Utils
//!
//! Flattens a parsed tree into `(kind, label, depth)` rows so tests can
//! compare structure without spelling out nodes.

#![allow(dead_code)]

use tessera_compiler::ml_parser::{self, Document, InterpolationPart, NodeId, NodeKind, ParseOptions, TextContent};
use tessera_compiler::parse_util::Diagnostics;

pub fn parse(source: &str) -> (Document, Diagnostics) {
    parse_with(source, &ParseOptions::default())
}

pub fn parse_with(source: &str, options: &ParseOptions) -> (Document, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let doc = ml_parser::parse(source, options, &mut diagnostics);
    (doc, diagnostics)
}

pub fn humanize_dom(doc: &Document) -> Vec<(String, String, usize)> {
    let mut rows = Vec::new();
    for &child in doc.children(NodeId::ROOT) {
        humanize_node(doc, child, 0, &mut rows);
    }
    rows
}

fn humanize_node(doc: &Document, id: NodeId, depth: usize, rows: &mut Vec<(String, String, usize)>) {
    let node = doc.node(id);
    let (kind, label) = match &node.kind {
        NodeKind::Document => ("document", String::new()),
        NodeKind::Element(element) => ("element", element.name.clone()),
        NodeKind::Comment(comment) => ("comment", comment.content.clone()),
        NodeKind::Text(text) => ("text", text_label(&text.content)),
    };
    rows.push((kind.to_string(), label, depth));
    for &child in doc.children(id) {
        humanize_node(doc, child, depth + 1, rows);
    }
}

fn text_label(content: &TextContent) -> String {
    match content {
        TextContent::Raw(raw) => raw.clone(),
        TextContent::Parts(parts) => parts
            .iter()
            .map(|part| match part {
                InterpolationPart::Literal(text) => text.clone(),
                InterpolationPart::Expression(interpolation) => {
                    format!("{{{}}}", interpolation.expression.code)
                }
            })
            .collect(),
    }
}

pub fn row(kind: &str, label: &str, depth: usize) -> (String, String, usize) {
    (kind.to_string(), label.to_string(), depth)
}

pub fn error_messages(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics.errors().iter().map(|e| e.msg.clone()).collect()
}
