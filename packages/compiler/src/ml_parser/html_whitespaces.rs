//! HTML Whitespace Processing
//!
//! Whitespace policy for text nodes: runs collapse to a single space unless
//! preserved, and whitespace-only text at the document root or the edges of
//! an element is dropped when trimming.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;

use super::ast::{Document, NodeId};

static SKIP_WS_TRIM_TAGS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["pre", "textarea", "script", "style"].into_iter().collect());

static WS_REPLACE_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\n\r\x0B\x0C]+").unwrap());

/// Whether whitespace inside `name` is significant.
pub fn preserves_whitespace(name: &str) -> bool {
    SKIP_WS_TRIM_TAGS.contains(name.to_ascii_lowercase().as_str())
}

pub fn collapse_whitespace(text: &str) -> Cow<'_, str> {
    WS_REPLACE_REGEXP.replace_all(text, " ")
}

/// Drops whitespace-only text at the root and as first/last child of
/// elements outside preformatted content.
pub fn trim_whitespace_nodes(doc: &mut Document) {
    let blank_roots: Vec<NodeId> = doc
        .children(NodeId::ROOT)
        .iter()
        .copied()
        .filter(|&id| doc.node(id).is_blank_text())
        .collect();
    for id in blank_roots {
        doc.detach(id);
    }

    let mut stack: Vec<NodeId> = doc.children(NodeId::ROOT).to_vec();
    while let Some(id) = stack.pop() {
        let Some(element) = doc.node(id).as_element() else {
            continue;
        };
        if preserves_whitespace(&element.name) {
            continue;
        }
        if let Some(&first) = doc.children(id).first() {
            if doc.node(first).is_blank_text() {
                doc.detach(first);
            }
        }
        if let Some(&last) = doc.children(id).last() {
            if doc.node(last).is_blank_text() {
                doc.detach(last);
            }
        }
        stack.extend(doc.children(id).iter().copied());
    }
}
