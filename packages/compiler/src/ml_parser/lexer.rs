//! ML Parser Lexer
//!
//! Hand-written character scanner that turns template source into tokens.
//! Raw-text containers (`script`, `style`, `template`, `textarea`) are never
//! tokenized as markup, and a `<` inside a balanced `{...}` span is text.

use super::ast::Quote;
use super::tags;
use super::tokens::{AttributeToken, Token};
use crate::chars;

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub msg: String,
    pub start: usize,
    pub end: usize,
}

/// Tokenization result
#[derive(Debug, Clone, Default)]
pub struct TokenizeResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

pub fn tokenize(source: &str) -> TokenizeResult {
    let mut tokenizer = Tokenizer::new(source);
    tokenizer.tokenize();
    TokenizeResult {
        tokens: tokenizer.tokens,
        errors: tokenizer.errors,
    }
}

/// Index of the `}` closing the `{` at `open`, skipping quoted strings and
/// nested braces.
pub fn find_closing_brace(source: &str, open: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    if bytes.get(open) != Some(&(chars::LBRACE as u8)) {
        return None;
    }
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;
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
                chars::SQ | chars::DQ | chars::BT => quote = Some(b),
                chars::LBRACE => depth += 1,
                chars::RBRACE => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

struct Tokenizer<'s> {
    source: &'s str,
    pos: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'s> Tokenizer<'s> {
    fn new(source: &'s str) -> Self {
        Tokenizer {
            source,
            pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source.get(self.pos + offset..)?.chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
        }
    }

    fn starts_with(&self, text: &str) -> bool {
        self.source[self.pos..].starts_with(text)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !chars::is_whitespace(ch) {
                break;
            }
            self.advance();
        }
    }

    fn error(&mut self, msg: impl Into<String>, start: usize, end: usize) {
        self.errors.push(LexError {
            msg: msg.into(),
            start,
            end,
        });
    }

    fn tokenize(&mut self) {
        while !self.eof() {
            if self.starts_with("<!--") {
                self.consume_comment();
            } else if self.starts_with("<!") {
                self.consume_declaration();
            } else if self.starts_with("</") && self.peek_at(2).is_some_and(chars::is_tag_start) {
                self.consume_tag_close();
            } else if self.peek() == Some(chars::LT) && self.peek_at(1).is_some_and(chars::is_tag_start) {
                self.consume_tag_open();
            } else {
                self.consume_text();
            }
        }
    }

    fn is_markup_start(&self) -> bool {
        if self.peek() != Some(chars::LT) {
            return false;
        }
        match self.peek_at(1) {
            Some(chars::BANG) => true,
            Some(chars::SLASH) => self.peek_at(2).is_some_and(chars::is_tag_start),
            Some(ch) => chars::is_tag_start(ch),
            None => false,
        }
    }

    fn consume_text(&mut self) {
        let start = self.pos;
        // Always take the first character so a lone `<` cannot stall the loop.
        let mut first = true;
        while !self.eof() {
            if !first && self.is_markup_start() {
                break;
            }
            first = false;
            if self.peek() == Some(chars::LBRACE) {
                if let Some(close) = find_closing_brace(self.source, self.pos) {
                    self.pos = close + 1;
                    continue;
                }
            }
            self.advance();
        }
        self.push_text(start, self.pos);
    }

    fn push_text(&mut self, start: usize, end: usize) {
        if start == end {
            return;
        }
        let text = &self.source[start..end];
        if let Some(Token::Text {
            text: previous,
            end: previous_end,
            ..
        }) = self.tokens.last_mut()
        {
            if *previous_end == start {
                previous.push_str(text);
                *previous_end = end;
                return;
            }
        }
        self.tokens.push(Token::Text {
            text: text.to_string(),
            start,
            end,
        });
    }

    fn consume_comment(&mut self) {
        let start = self.pos;
        let body = start + 4;
        match self.source[body..].find("-->") {
            Some(offset) => {
                self.pos = body + offset + 3;
                self.tokens.push(Token::Comment {
                    content: self.source[body..body + offset].to_string(),
                    start,
                    end: self.pos,
                });
            }
            None => {
                self.pos = self.source.len();
                self.error("Unterminated comment", start, self.pos);
                self.tokens.push(Token::Comment {
                    content: self.source[body..].to_string(),
                    start,
                    end: self.pos,
                });
            }
        }
    }

    /// `<!DOCTYPE html>` and friends are kept as verbatim text.
    fn consume_declaration(&mut self) {
        let start = self.pos;
        self.pos = match self.source[start..].find(chars::GT) {
            Some(offset) => start + offset + 1,
            None => self.source.len(),
        };
        self.push_text(start, self.pos);
    }

    fn consume_tag_name(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !chars::is_tag_name_part(ch) {
                break;
            }
            self.advance();
        }
        self.source[start..self.pos].to_string()
    }

    fn consume_tag_open(&mut self) {
        let start = self.pos;
        self.advance();
        let name = self.consume_tag_name();
        let mut attributes = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            if self.eof() {
                self.error(
                    format!("Unexpected end of input inside <{}>", name),
                    start,
                    self.pos,
                );
                break;
            }
            if self.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if self.peek() == Some(chars::GT) {
                self.advance();
                break;
            }
            if let Some(attribute) = self.consume_attribute() {
                attributes.push(attribute);
            }
        }

        let end = self.pos;
        let raw_container = !self_closing && tags::is_raw_text_element(&name);
        self.tokens.push(Token::TagOpen {
            name: name.clone(),
            attributes,
            self_closing,
            start,
            end,
        });
        if raw_container {
            self.consume_raw_text(&name);
        }
    }

    fn consume_attribute(&mut self) -> Option<AttributeToken> {
        let start = self.pos;

        if self.peek() == Some(chars::LBRACE) {
            let value = self.consume_brace_value(start)?;
            return Some(AttributeToken {
                name: String::new(),
                value: Some((value, Quote::Brace)),
                start,
                end: self.pos,
            });
        }

        while let Some(ch) = self.peek() {
            if chars::is_whitespace(ch)
                || ch == chars::EQ
                || ch == chars::GT
                || ch == chars::SLASH
                || ch == chars::DQ
                || ch == chars::SQ
            {
                break;
            }
            self.advance();
        }
        if self.pos == start {
            // Stray character such as a lone `/` or `=`.
            self.advance();
            return None;
        }
        let name = self.source[start..self.pos].to_string();

        let name_end = self.pos;
        self.skip_whitespace();
        if self.peek() != Some(chars::EQ) {
            self.pos = name_end;
            return Some(AttributeToken {
                name,
                value: None,
                start,
                end: name_end,
            });
        }
        self.advance();
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ (chars::DQ | chars::SQ)) => {
                let kind = if quote == chars::DQ {
                    Quote::Double
                } else {
                    Quote::Single
                };
                Some((self.consume_quoted_value(quote, start), kind))
            }
            Some(chars::LBRACE) => self
                .consume_brace_value(start)
                .map(|value| (value, Quote::Brace)),
            _ => Some((self.consume_unquoted_value(), Quote::Unquoted)),
        };

        Some(AttributeToken {
            name,
            value,
            start,
            end: self.pos,
        })
    }

    fn consume_quoted_value(&mut self, quote: char, attr_start: usize) -> String {
        self.advance();
        let value_start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == quote {
                let value = self.source[value_start..self.pos].to_string();
                self.advance();
                return value;
            }
            if ch == chars::LBRACE {
                if let Some(close) = find_closing_brace(self.source, self.pos) {
                    self.pos = close + 1;
                    continue;
                }
            }
            self.advance();
        }
        self.error("Unterminated attribute value", attr_start, self.pos);
        self.source[value_start..].to_string()
    }

    fn consume_brace_value(&mut self, attr_start: usize) -> Option<String> {
        match find_closing_brace(self.source, self.pos) {
            Some(close) => {
                let value = self.source[self.pos + 1..close].to_string();
                self.pos = close + 1;
                Some(value)
            }
            None => {
                let value = self.source[self.pos + 1..].to_string();
                self.pos = self.source.len();
                self.error("Unterminated attribute expression", attr_start, self.pos);
                Some(value)
            }
        }
    }

    fn consume_unquoted_value(&mut self) -> String {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if chars::is_whitespace(ch) || ch == chars::GT || self.starts_with("/>") {
                break;
            }
            self.advance();
        }
        self.source[start..self.pos].to_string()
    }

    fn consume_raw_text(&mut self, name: &str) {
        let start = self.pos;
        let lower = self.source[start..].to_ascii_lowercase();
        let needle = format!("</{}", name.to_ascii_lowercase());
        let mut search = 0;
        let close = loop {
            match lower[search..].find(&needle) {
                Some(offset) => {
                    let at = search + offset;
                    let after = lower[at + needle.len()..].chars().next();
                    if after.map_or(true, |ch| ch == chars::GT || chars::is_whitespace(ch)) {
                        break Some(start + at);
                    }
                    search = at + needle.len();
                }
                None => break None,
            }
        };

        let end = close.unwrap_or(self.source.len());
        self.tokens.push(Token::RawText {
            text: self.source[start..end].to_string(),
            start,
            end,
        });
        self.pos = end;
        if close.is_some() {
            self.consume_tag_close();
        }
    }

    fn consume_tag_close(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let name = self.consume_tag_name();
        match self.source[self.pos..].find(chars::GT) {
            Some(offset) => self.pos += offset + 1,
            None => {
                self.pos = self.source.len();
                self.error(format!("Unterminated closing tag </{}", name), start, self.pos);
            }
        }
        self.tokens.push(Token::TagClose {
            name,
            start,
            end: self.pos,
        });
    }
}
