//! Selector scoping
//!
//! Confines a component's rules to its own markup. Root elements of the
//! component carry `this="HASH"`; every selector `S` becomes
//! `[this="HASH"] S,S'` where `S'` puts the attribute on the first compound.

use once_cell::sync::Lazy;
use regex::Regex;
use xxhash_rust::xxh3::xxh3_64;

use super::ast::{AtRule, StyleNode, StyleRule, StyleSheet};
use crate::chars;

/// Scoping attribute carried by component root elements.
pub const SCOPE_ATTRIBUTE: &str = "this";

static GLOBAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":global\(([^)]*)\)").unwrap());

const UNSCOPED_COMPOUNDS: &[&str] = &[":root", "html", "body"];

const LEGACY_PSEUDO_ELEMENTS: &[&str] = &[":before", ":after", ":first-line", ":first-letter"];

/// Full base-36 digest of `css`. Callers take a prefix of it.
pub fn content_hash(css: &str) -> String {
    to_base36(xxh3_64(css.as_bytes()))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

pub fn scope_stylesheet(sheet: &StyleSheet, hash: &str) -> StyleSheet {
    let attribute = format!("[{}=\"{}\"]", SCOPE_ATTRIBUTE, hash);
    StyleSheet {
        nodes: scope_nodes(&sheet.nodes, &attribute),
    }
}

fn scope_nodes(nodes: &[StyleNode], attribute: &str) -> Vec<StyleNode> {
    nodes
        .iter()
        .map(|node| match node {
            StyleNode::Rule(rule) => StyleNode::Rule(StyleRule {
                selectors: rule
                    .selectors
                    .iter()
                    .flat_map(|s| scope_selector(s, attribute))
                    .collect(),
                declarations: rule.declarations.clone(),
                children: Vec::new(),
            }),
            StyleNode::AtRule(at_rule) if at_rule.is_conditional() => StyleNode::AtRule(AtRule {
                children: scope_nodes(&at_rule.children, attribute),
                ..at_rule.clone()
            }),
            other => other.clone(),
        })
        .collect()
}

/// Scoped forms of one selector.
pub fn scope_selector(selector: &str, attribute: &str) -> Vec<String> {
    if GLOBAL_RE.is_match(selector) {
        return vec![GLOBAL_RE.replace_all(selector, "$1").trim().to_string()];
    }

    let compounds = split_compounds(selector);
    let skip = compounds
        .iter()
        .take_while(|(compound, _)| is_unscoped(compound))
        .count();
    if skip == compounds.len() {
        return vec![selector.trim().to_string()];
    }

    let prefix: String = compounds[..skip]
        .iter()
        .map(|(compound, combinator)| format!("{}{}", compound, combinator))
        .collect();
    let rest: String = compounds[skip..]
        .iter()
        .map(|(compound, combinator)| format!("{}{}", compound, combinator))
        .collect();
    let (first, tail) = &compounds[skip];
    let tail_rest: String = compounds[skip + 1..]
        .iter()
        .map(|(compound, combinator)| format!("{}{}", compound, combinator))
        .collect();

    let descendant = format!("{}{} {}", prefix, attribute, rest.trim_end());
    let own = format!(
        "{}{}{}{}",
        prefix,
        attach_to_compound(first, attribute),
        tail,
        tail_rest
    );
    vec![descendant, own.trim_end().to_string()]
}

fn is_unscoped(compound: &str) -> bool {
    UNSCOPED_COMPOUNDS.iter().any(|base| {
        compound == *base
            || compound
                .strip_prefix(base)
                .is_some_and(|rest| rest.starts_with(['.', '[', '#', ':']))
    })
}

/// Inserts `attribute` before the compound's pseudo-element, if any.
fn attach_to_compound(compound: &str, attribute: &str) -> String {
    let split = compound.find("::").or_else(|| {
        LEGACY_PSEUDO_ELEMENTS
            .iter()
            .filter_map(|p| compound.find(p))
            .min()
    });
    match split {
        Some(at) => format!("{}{}{}", &compound[..at], attribute, &compound[at..]),
        None => format!("{}{}", compound, attribute),
    }
}

/// Splits a selector into compounds, each paired with the combinator text
/// that follows it.
fn split_compounds(selector: &str) -> Vec<(String, String)> {
    let mut compounds = Vec::new();
    let mut compound = String::new();
    let mut combinator = String::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;

    for ch in selector.trim().chars() {
        if let Some(q) = quote {
            compound.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        let is_combinator = depth == 0
            && (chars::is_whitespace(ch) || ch == chars::GT || ch == '+' || ch == '~');
        if is_combinator {
            combinator.push(ch);
            continue;
        }
        if !combinator.is_empty() {
            compounds.push((std::mem::take(&mut compound), std::mem::take(&mut combinator)));
        }
        match ch {
            chars::SQ | chars::DQ => quote = Some(ch),
            chars::LPAREN | chars::LBRACKET => depth += 1,
            chars::RPAREN | chars::RBRACKET => depth -= 1,
            _ => {}
        }
        compound.push(ch);
    }
    compounds.push((compound, combinator));
    compounds
}
