//! Parse Utilities
//!
//! Source locations, spans and the accumulating diagnostics collector shared
//! by the markup parser, the transform passes and the code generator.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chars;

/// A point in the template source. `line` and `col` are zero-based.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ParseLocation {
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl ParseLocation {
    pub fn new(offset: usize, line: usize, col: usize) -> Self {
        ParseLocation { offset, line, col }
    }
}

impl fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ParseSourceSpan {
    pub start: ParseLocation,
    pub end: ParseLocation,
}

impl ParseSourceSpan {
    pub fn new(start: ParseLocation, end: ParseLocation) -> Self {
        ParseSourceSpan { start, end }
    }

    /// The slice of `source` this span covers.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start.offset..self.end.offset).unwrap_or("")
    }
}

/// Maps byte offsets to line/column pairs.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, ch) in source.char_indices() {
            if ch == chars::NEWLINE {
                line_starts.push(i + 1);
            }
        }
        LineIndex { line_starts }
    }

    pub fn location(&self, offset: usize) -> ParseLocation {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        ParseLocation::new(offset, line, offset - self.line_starts[line])
    }

    pub fn span(&self, start: usize, end: usize) -> ParseSourceSpan {
        ParseSourceSpan::new(self.location(start), self.location(end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseErrorLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseError {
    pub msg: String,
    pub span: Option<ParseSourceSpan>,
    pub level: ParseErrorLevel,
}

impl ParseError {
    pub fn new(msg: impl Into<String>, span: Option<ParseSourceSpan>) -> Self {
        ParseError {
            msg: msg.into(),
            span,
            level: ParseErrorLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>, span: Option<ParseSourceSpan>) -> Self {
        ParseError {
            msg: msg.into(),
            span,
            level: ParseErrorLevel::Warning,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            ParseErrorLevel::Warning => "WARNING",
            ParseErrorLevel::Error => "ERROR",
        };
        match &self.span {
            Some(span) => write!(f, "{}: {} ({})", level, self.msg, span.start),
            None => write!(f, "{}: {}", level, self.msg),
        }
    }
}

/// Collects non-fatal problems so a single pass can report all of them.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<ParseError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, msg: impl Into<String>, span: Option<ParseSourceSpan>) {
        self.errors.push(ParseError::new(msg, span));
    }

    pub fn add_warning(&mut self, msg: impl Into<String>, span: Option<ParseSourceSpan>) {
        self.errors.push(ParseError::warning(msg, span));
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| e.level == ParseErrorLevel::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}
