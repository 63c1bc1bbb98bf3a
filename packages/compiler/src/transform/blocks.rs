//! Blocks pass
//!
//! Turns the attribute tokens of control-flow tags into block parameters:
//!
//! - `<if {cond}>`, `<if value="cond">` or `<if a as b>` read as a condition.
//!   A standalone `as` token stands for `&&`.
//! - `<for ITERABLE as ITEM[, INDEX] [key KEY] [if GUARD]>` reads as a loop.
//!   The first `as` binds the item, later ones stand for `&&` in the guard.
//! - `<slot name="x">` and `<content name="x">` name a slot, `"default"` when
//!   omitted.

use lazy_static::lazy_static;
use regex::Regex;

use crate::chars;
use crate::expression_parser::{ExpressionError, ExpressionParser};
use crate::ml_parser::{Attribute, BlockKind, BlockParams, Document, Element, ForLoop, NodeType};

pub const DEFAULT_SLOT: &str = "default";

lazy_static! {
    /// `item` or `item, index`
    static ref FOR_BINDINGS_PATTERN: Regex =
        Regex::new(r"^\s*([^,\s]+)\s*(?:,\s*([^,\s]+)\s*)?$").unwrap();
}

pub fn normalize(doc: &mut Document, parser: &ExpressionParser) -> Result<(), ExpressionError> {
    for id in doc.walk() {
        let node = doc.node_mut(id);
        let NodeType::Block(kind) = node.ty else {
            continue;
        };
        if node.params.block.is_some() {
            continue;
        }
        let Some(element) = node.as_element_mut() else {
            continue;
        };

        let params = match kind {
            BlockKind::If | BlockKind::Elseif => {
                let header = block_header(element);
                Some(BlockParams::Condition(
                    parser.parse_expression(&replace_keyword(&header, "as", "&&"))?,
                ))
            }
            BlockKind::For => Some(BlockParams::Loop(parse_for_header(
                &block_header(element),
                parser,
            )?)),
            BlockKind::Slot | BlockKind::SlotContent => Some(BlockParams::Slot(
                element
                    .attribute("name")
                    .and_then(Attribute::text_value)
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(DEFAULT_SLOT)
                    .to_string(),
            )),
            BlockKind::Else => None,
        };
        element.attributes.clear();

        node.params.reference |= matches!(kind, BlockKind::If | BlockKind::For | BlockKind::Slot);
        node.params.block = params;
    }
    Ok(())
}

/// Expression text of a block tag, rebuilt from its attribute tokens.
fn block_header(element: &Element) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    let value = element.attribute("value").and_then(Attribute::text_value);
    for attribute in &element.attributes {
        if attribute.full_name() == "value" {
            continue;
        }
        match attribute.text_value() {
            Some(inner) if attribute.is_anonymous() => tokens.push(inner),
            _ => tokens.push(&attribute.raw),
        }
    }
    match value {
        Some(value) if tokens.is_empty() => value.to_string(),
        Some(value) => format!("({}) {}", value, tokens.join(" ")),
        None => tokens.join(" "),
    }
}

pub fn parse_for_header(header: &str, parser: &ExpressionParser) -> Result<ForLoop, ExpressionError> {
    let Some(as_at) = find_keyword(header, "as", 0) else {
        return Err(ExpressionError::Syntax {
            text: header.to_string(),
            message: "for block expects `ITERABLE as ITEM`".to_string(),
        });
    };
    let iterable = parser.parse_expression(&header[..as_at])?;

    let rest_start = as_at + 2;
    let key_at = find_keyword(header, "key", rest_start);
    let if_at = find_keyword(header, "if", key_at.unwrap_or(rest_start));
    let bindings_end = key_at.or(if_at).unwrap_or(header.len());

    let bindings = &header[rest_start..bindings_end];
    let Some(captures) = FOR_BINDINGS_PATTERN.captures(bindings) else {
        return Err(ExpressionError::Binding {
            name: bindings.trim().to_string(),
            text: header.to_string(),
        });
    };
    let item = parser.parse_binding(&captures[1], header)?;
    let index = match captures.get(2) {
        Some(index) => Some(parser.parse_binding(index.as_str(), header)?),
        None => None,
    };

    let key = match key_at {
        Some(at) => Some(parser.parse_expression(&header[at + 3..if_at.unwrap_or(header.len())])?),
        None => None,
    };
    let guard = match if_at {
        Some(at) => Some(parser.parse_expression(&replace_keyword(&header[at + 2..], "as", "&&"))?),
        None => None,
    };

    Ok(ForLoop {
        iterable,
        item,
        index,
        key,
        guard,
    })
}

/// Byte offset of the first standalone `keyword` at or after `from` that sits
/// outside strings and brackets.
pub fn find_keyword(text: &str, keyword: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let mut i = from;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' | b'`' => quote = Some(b),
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            _ if depth == 0 && text.is_char_boundary(i) && text[i..].starts_with(keyword) => {
                let before = text[..i].chars().next_back();
                let after = text[i + keyword.len()..].chars().next();
                if !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char) {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn is_word_char(ch: char) -> bool {
    chars::is_identifier_part(ch) || ch == chars::PERIOD
}

/// Replaces every standalone `keyword` outside strings and brackets.
fn replace_keyword(text: &str, keyword: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    while let Some(at) = find_keyword(text, keyword, last) {
        out.push_str(&text[last..at]);
        out.push_str(replacement);
        last = at + keyword.len();
    }
    out.push_str(&text[last..]);
    out
}
