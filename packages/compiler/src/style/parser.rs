//! Style parser
//!
//! Locates `{`/`}` pairs directly instead of tokenizing CSS. Each block's
//! declarations are its body with the nested child blocks cut out.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ast::{AtRule, StyleNode, StyleRule, StyleSheet};
use super::StyleError;
use crate::chars;

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());

pub fn css_to_ast(css: &str) -> Result<StyleSheet, StyleError> {
    let text = COMMENT_RE.replace_all(css, "");
    let pairs = brace_pairs(&text)?;
    let (declarations, mut nodes) = parse_block(&text, 0, text.len(), &pairs);

    let statements: Vec<StyleNode> = declarations
        .split(chars::SEMICOLON)
        .map(str::trim)
        .filter(|s| s.starts_with(chars::AT))
        .map(|s| {
            let (name, params) = split_at_rule(s);
            StyleNode::AtRule(AtRule {
                name,
                params,
                declarations: String::new(),
                children: Vec::new(),
                has_block: false,
            })
        })
        .collect();
    nodes.splice(0..0, statements);
    Ok(StyleSheet { nodes })
}

/// `(open, close)` byte offsets of every brace pair, sorted by `open`.
fn brace_pairs(text: &str) -> Result<Vec<(usize, usize)>, StyleError> {
    let bytes = text.as_bytes();
    let mut pairs = Vec::new();
    let mut stack = Vec::new();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == chars::BACKSLASH as u8 {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b as char {
                chars::SQ | chars::DQ => quote = Some(b),
                chars::LBRACE => stack.push(i),
                chars::RBRACE => match stack.pop() {
                    Some(open) => pairs.push((open, i)),
                    None => return Err(StyleError::UnbalancedBraces { offset: i }),
                },
                _ => {}
            },
        }
        i += 1;
    }
    if let Some(&open) = stack.last() {
        return Err(StyleError::UnbalancedBraces { offset: open });
    }
    pairs.sort_unstable();
    Ok(pairs)
}

fn parse_block(
    text: &str,
    start: usize,
    end: usize,
    pairs: &[(usize, usize)],
) -> (String, Vec<StyleNode>) {
    let mut declarations = String::new();
    let mut children = Vec::new();
    let mut cursor = start;

    loop {
        let next = pairs.partition_point(|&(open, _)| open < cursor);
        let Some(&(open, close)) = pairs.get(next).filter(|&&(open, _)| open < end) else {
            break;
        };
        let segment = &text[cursor..open];
        let split = segment.rfind(chars::SEMICOLON).map_or(0, |i| i + 1);
        declarations.push_str(&segment[..split]);
        let prelude = segment[split..].trim();

        let (body, nested) = parse_block(text, open + 1, close, pairs);
        children.push(make_node(prelude, body, nested));
        cursor = close + 1;
    }
    declarations.push_str(&text[cursor..end]);
    (declarations, children)
}

fn make_node(prelude: &str, declarations: String, children: Vec<StyleNode>) -> StyleNode {
    if prelude.starts_with(chars::AT) {
        let (name, params) = split_at_rule(prelude);
        StyleNode::AtRule(AtRule {
            name,
            params,
            declarations,
            children,
            has_block: true,
        })
    } else {
        StyleNode::Rule(StyleRule {
            selectors: split_selectors(prelude),
            declarations,
            children,
        })
    }
}

/// `@media screen` into (`media`, `screen`).
fn split_at_rule(prelude: &str) -> (String, String) {
    let body = &prelude[1..];
    let end = body
        .find(|c: char| chars::is_whitespace(c) || c == chars::LPAREN)
        .unwrap_or(body.len());
    (body[..end].to_string(), body[end..].trim().to_string())
}

/// Splits a selector list on top-level commas.
pub fn split_selectors(prelude: &str) -> Vec<String> {
    let mut selectors = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut current = String::new();
    for ch in prelude.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            current.push(ch);
            continue;
        }
        match ch {
            chars::SQ | chars::DQ => quote = Some(ch),
            chars::LPAREN | chars::LBRACKET => depth += 1,
            chars::RPAREN | chars::RBRACKET => depth -= 1,
            chars::COMMA if depth == 0 => {
                selectors.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    selectors.push(current.trim().to_string());
    selectors.retain(|s| !s.is_empty());
    selectors
}
