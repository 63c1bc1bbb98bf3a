//! Style serializer
//!
//! Prints a stylesheet as minified CSS. Rules whose body minifies to nothing
//! are dropped.

use super::ast::{StyleNode, StyleSheet};
use crate::chars;

pub fn ast_to_css(sheet: &StyleSheet) -> String {
    let mut out = String::new();
    write_nodes(&sheet.nodes, &mut out);
    out
}

fn write_nodes(nodes: &[StyleNode], out: &mut String) {
    for node in nodes {
        match node {
            StyleNode::Rule(rule) => {
                let declarations = minify_declarations(&rule.declarations);
                if declarations.is_empty() || rule.selectors.is_empty() {
                    continue;
                }
                let selectors: Vec<String> = rule.selectors.iter().map(|s| minify_selector(s)).collect();
                out.push_str(&selectors.join(","));
                out.push('{');
                out.push_str(&declarations);
                out.push('}');
            }
            StyleNode::AtRule(at_rule) => {
                let params = minify_declarations(&at_rule.params);
                let mut head = format!("@{}", at_rule.name);
                if !params.is_empty() {
                    head.push(chars::SPACE);
                    head.push_str(&params);
                }
                if !at_rule.has_block {
                    out.push_str(&head);
                    out.push(';');
                    continue;
                }
                let mut body = minify_declarations(&at_rule.declarations);
                let mut inner = String::new();
                write_nodes(&at_rule.children, &mut inner);
                if body.is_empty() && inner.is_empty() {
                    continue;
                }
                if !body.is_empty() && !inner.is_empty() {
                    body.push(';');
                }
                out.push_str(&head);
                out.push('{');
                out.push_str(&body);
                out.push_str(&inner);
                out.push('}');
            }
        }
    }
}

/// Collapses whitespace outside strings and strips it around `punct`.
fn minify(text: &str, punct: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut pending_space = false;
    let mut after_punct = true;

    for ch in text.chars() {
        if let Some(q) = quote {
            out.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        if chars::is_whitespace(ch) {
            pending_space = true;
            continue;
        }
        if punct.contains(&ch) {
            out.push(ch);
            pending_space = false;
            after_punct = true;
            continue;
        }
        if pending_space && !after_punct {
            out.push(chars::SPACE);
        }
        pending_space = false;
        after_punct = false;
        if ch == chars::SQ || ch == chars::DQ {
            quote = Some(ch);
        }
        out.push(ch);
    }
    out
}

pub fn minify_declarations(text: &str) -> String {
    let mut out = minify(text, &[chars::COLON, chars::SEMICOLON, chars::COMMA]);
    while out.ends_with(chars::SEMICOLON) {
        out.pop();
    }
    while out.starts_with(chars::SEMICOLON) {
        out.remove(0);
    }
    out
}

/// Selector whitespace is significant around `:`, so only commas and
/// combinators absorb it.
pub fn minify_selector(text: &str) -> String {
    minify(text, &[chars::COMMA, chars::GT, '+', '~'])
}
