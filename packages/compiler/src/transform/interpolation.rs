//! Curly-brace interpolation
//!
//! Splits raw text into literal and `{expression}` parts. Brace matching is
//! quote-aware and tracks nesting, so object literals and strings containing
//! braces stay inside their expression.

use crate::chars;
use crate::expression_parser::{ExpressionError, ExpressionParser};
use crate::ml_parser::{find_closing_brace, Interpolation, InterpolationPart};

const HTML_MARKER: &str = "@html";

pub fn parse_interpolation(
    text: &str,
    parser: &ExpressionParser,
) -> Result<Vec<InterpolationPart>, ExpressionError> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < text.len() {
        let Some(open) = text[i..].find(chars::LBRACE).map(|o| i + o) else {
            literal.push_str(&text[i..]);
            break;
        };
        literal.push_str(&text[i..open]);
        let Some(close) = find_closing_brace(text, open) else {
            literal.push_str(&text[open..]);
            break;
        };

        let inner = &text[open + 1..close];
        if inner.trim().is_empty() {
            literal.push_str(&text[open..=close]);
        } else {
            let (html, source) = split_html_marker(inner);
            let expression = parser.parse_expression(source)?;
            match &expression.literal {
                Some(folded) if !html => literal.push_str(folded),
                _ => {
                    if !literal.is_empty() {
                        parts.push(InterpolationPart::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(InterpolationPart::Expression(Interpolation { expression, html }));
                }
            }
        }
        i = close + 1;
    }

    if !literal.is_empty() {
        parts.push(InterpolationPart::Literal(literal));
    }
    Ok(parts)
}

/// `@html expr` into (`true`, `expr`).
fn split_html_marker(inner: &str) -> (bool, &str) {
    let trimmed = inner.trim_start();
    match trimmed.strip_prefix(HTML_MARKER) {
        Some(rest) if rest.starts_with(chars::is_whitespace) => (true, rest),
        _ => (false, inner),
    }
}

/// Whether `text` holds at least one balanced, non-blank `{...}` span.
pub fn has_interpolation(text: &str) -> bool {
    let mut from = 0;
    while let Some(open) = text[from..].find(chars::LBRACE).map(|o| from + o) {
        match find_closing_brace(text, open) {
            Some(close) if !text[open + 1..close].trim().is_empty() => return true,
            Some(close) => from = close + 1,
            None => return false,
        }
    }
    false
}
