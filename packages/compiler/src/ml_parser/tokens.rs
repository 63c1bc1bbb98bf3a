//! ML Parser Tokens
//!
//! Tokens produced by the markup lexer. Offsets are byte offsets into the
//! template source, `end` exclusive.

use super::ast::Quote;

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeToken {
    pub name: String,
    pub value: Option<(String, Quote)>,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Text {
        text: String,
        start: usize,
        end: usize,
    },
    Comment {
        content: String,
        start: usize,
        end: usize,
    },
    TagOpen {
        name: String,
        attributes: Vec<AttributeToken>,
        self_closing: bool,
        start: usize,
        end: usize,
    },
    TagClose {
        name: String,
        start: usize,
        end: usize,
    },
    /// Verbatim body of a raw-text container.
    RawText {
        text: String,
        start: usize,
        end: usize,
    },
}

impl Token {
    pub fn start(&self) -> usize {
        match self {
            Token::Text { start, .. }
            | Token::Comment { start, .. }
            | Token::TagOpen { start, .. }
            | Token::TagClose { start, .. }
            | Token::RawText { start, .. } => *start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            Token::Text { end, .. }
            | Token::Comment { end, .. }
            | Token::TagOpen { end, .. }
            | Token::TagClose { end, .. }
            | Token::RawText { end, .. } => *end,
        }
    }
}
