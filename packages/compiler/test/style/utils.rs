//! Style Test Utils

#![allow(dead_code)]

use tessera_compiler::style::{ast_to_css, parse_style, scope_stylesheet, StyleNode};

/// Parses, flattens and prints `css` minified.
pub fn compile_css(css: &str) -> String {
    ast_to_css(&parse_style(css).expect("stylesheet parses"))
}

/// Parses, flattens, scopes to `hash` and prints `css` minified.
pub fn scope_css(css: &str, hash: &str) -> String {
    let sheet = parse_style(css).expect("stylesheet parses");
    ast_to_css(&scope_stylesheet(&sheet, hash))
}

pub fn rule_selectors(node: &StyleNode) -> Vec<String> {
    match node {
        StyleNode::Rule(rule) => rule.selectors.clone(),
        StyleNode::AtRule(_) => Vec::new(),
    }
}

pub fn attr(hash: &str) -> String {
    format!("[this=\"{}\"]", hash)
}
