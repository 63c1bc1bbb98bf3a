//! ML Parser
//!
//! Builds the arena [`Document`] from lexer tokens using an explicit stack
//! of open elements. Problems are reported to the diagnostics collector and
//! parsing always produces a tree.

use log::debug;

use super::ast::{Attribute, AttributeKind, AttributeValue, Document, Element, Node, NodeId, NodeKind, Position, TextContent};
use super::html_whitespaces::{collapse_whitespace, preserves_whitespace, trim_whitespace_nodes};
use super::lexer::tokenize;
use super::tags;
use super::tokens::{AttributeToken, Token};
use crate::config::CompilerOptions;
use crate::parse_util::{Diagnostics, LineIndex};

/// Markup options derived from [`CompilerOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub affix: bool,
    pub preserve_whitespace: bool,
    pub trim: bool,
    pub comments: bool,
    pub index: bool,
    pub loc: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions::from(&CompilerOptions::default())
    }
}

impl From<&CompilerOptions> for ParseOptions {
    fn from(options: &CompilerOptions) -> Self {
        ParseOptions {
            affix: options.attribute.affix,
            preserve_whitespace: options.transform.whitespace,
            trim: options.transform.trim,
            comments: options.transform.comments,
            index: options.position.index,
            loc: options.position.loc,
        }
    }
}

/// Parses template source into a markup tree.
pub fn parse(source: &str, options: &ParseOptions, diagnostics: &mut Diagnostics) -> Document {
    debug!("parsing markup ({} bytes)", source.len());
    let result = tokenize(source);
    let mut builder = TreeBuilder::new(source, options);

    for error in &result.errors {
        builder.report(diagnostics, &error.msg, error.start, error.end);
    }
    for token in result.tokens {
        builder.consume(token, diagnostics);
    }
    builder.finish(diagnostics)
}

struct TreeBuilder<'s> {
    source: &'s str,
    options: &'s ParseOptions,
    lines: LineIndex,
    doc: Document,
    stack: Vec<NodeId>,
    produced: usize,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str, options: &'s ParseOptions) -> Self {
        TreeBuilder {
            source,
            options,
            lines: LineIndex::new(source),
            doc: Document::new(),
            stack: Vec::new(),
            produced: 0,
        }
    }

    fn report(&self, diagnostics: &mut Diagnostics, msg: &str, start: usize, end: usize) {
        diagnostics.add_error(msg, Some(self.lines.span(start, end)));
    }

    fn parent(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn position(&self, start: usize, end: usize) -> Option<Position> {
        if !self.options.index && !self.options.loc {
            return None;
        }
        Some(Position {
            start: self.options.index.then_some(start),
            end: self.options.index.then_some(end),
            loc: self.options.loc.then(|| self.lines.span(start, end)),
        })
    }

    fn in_preformatted(&self) -> bool {
        self.stack.iter().any(|&id| {
            self.doc
                .node(id)
                .as_element()
                .is_some_and(|e| preserves_whitespace(&e.name))
        })
    }

    fn consume(&mut self, token: Token, diagnostics: &mut Diagnostics) {
        match token {
            Token::Text { text, start, end } => self.add_text(text, start, end),
            Token::Comment {
                content,
                start,
                end,
            } => {
                self.produced += 1;
                if self.options.comments {
                    let mut node = Node::comment(content);
                    node.position = self.position(start, end);
                    let parent = self.parent();
                    self.doc.append(parent, node);
                }
            }
            Token::TagOpen {
                name,
                attributes,
                self_closing,
                start,
                end,
            } => self.open_element(name, attributes, self_closing, start, end),
            Token::RawText { text, .. } => {
                let parent = self.parent();
                if let Some(element) = self.doc.node_mut(parent).as_element_mut() {
                    element.raw = Some(text);
                }
            }
            Token::TagClose { name, start, end } => self.close_element(&name, start, end, diagnostics),
        }
    }

    fn add_text(&mut self, text: String, start: usize, end: usize) {
        self.produced += 1;
        let collapse = !self.options.preserve_whitespace && !self.in_preformatted();
        let text = if collapse {
            collapse_whitespace(&text).into_owned()
        } else {
            text
        };

        let parent = self.parent();
        let index = self.options.index;
        if let Some(&last) = self.doc.children(parent).last() {
            let node = self.doc.node_mut(last);
            if let NodeKind::Text(existing) = &mut node.kind {
                if let TextContent::Raw(raw) = &mut existing.content {
                    raw.push_str(&text);
                    if collapse {
                        *raw = collapse_whitespace(raw).into_owned();
                    }
                    if let Some(position) = node.position.as_mut() {
                        if index {
                            position.end = Some(end);
                        }
                    }
                    return;
                }
            }
        }

        let mut node = Node::text(text);
        node.position = self.position(start, end);
        self.doc.append(parent, node);
    }

    fn open_element(
        &mut self,
        name: String,
        attributes: Vec<AttributeToken>,
        self_closing: bool,
        start: usize,
        end: usize,
    ) {
        self.produced += 1;
        let mut element = Element::new(name);
        element.self_closing = self_closing;
        element.void_element = self_closing || tags::is_void_element(&element.name);
        element.attributes = attributes
            .into_iter()
            .map(|token| self.build_attribute(token))
            .collect();
        let void_element = element.void_element;

        let mut node = Node::element(element);
        node.position = self.position(start, end);
        let parent = self.parent();
        let id = self.doc.append(parent, node);
        if !void_element {
            self.stack.push(id);
        }
    }

    fn build_attribute(&self, token: AttributeToken) -> Attribute {
        let (prefix, name, suffix) = if self.options.affix && !token.name.is_empty() {
            tags::split_affix(&token.name)
        } else {
            (None, token.name, None)
        };
        let value = match token.value {
            Some((text, quote)) => AttributeValue::Text { text, quote },
            None => AttributeValue::Empty,
        };
        Attribute {
            prefix,
            name,
            suffix,
            value,
            kind: AttributeKind::Attribute,
            raw: self.source[token.start..token.end].to_string(),
            position: self.position(token.start, token.end),
        }
    }

    fn close_element(&mut self, name: &str, start: usize, end: usize, diagnostics: &mut Diagnostics) {
        let depth = self.stack.iter().rposition(|&id| {
            self.doc
                .node(id)
                .as_element()
                .is_some_and(|e| names_match(&e.name, name))
        });

        let Some(depth) = depth else {
            if !tags::is_void_element(name) {
                self.report(
                    diagnostics,
                    &format!("Unexpected closing tag \"{}\"", name),
                    start,
                    end,
                );
            }
            return;
        };

        while self.stack.len() > depth + 1 {
            if let Some(unclosed) = self.stack.pop() {
                self.report_unclosed(unclosed, diagnostics);
            }
        }
        if let Some(closed) = self.stack.pop() {
            if self.options.index {
                if let Some(position) = self.doc.node_mut(closed).position.as_mut() {
                    position.end = Some(end);
                }
            }
            if self.options.loc {
                let close = self.lines.location(end);
                if let Some(loc) = self
                    .doc
                    .node_mut(closed)
                    .position
                    .as_mut()
                    .and_then(|p| p.loc.as_mut())
                {
                    loc.end = close;
                }
            }
        }
    }

    fn report_unclosed(&self, id: NodeId, diagnostics: &mut Diagnostics) {
        let name = self
            .doc
            .node(id)
            .as_element()
            .map(|e| e.name.clone())
            .unwrap_or_default();
        diagnostics.add_error(format!("Unclosed element \"{}\"", name), None);
    }

    fn finish(mut self, diagnostics: &mut Diagnostics) -> Document {
        while let Some(unclosed) = self.stack.pop() {
            self.report_unclosed(unclosed, diagnostics);
        }
        if self.options.trim {
            trim_whitespace_nodes(&mut self.doc);
        }
        if self.produced == 0 && !self.source.trim().is_empty() {
            self.report(
                diagnostics,
                "Template produced no nodes",
                0,
                self.source.len(),
            );
        }
        self.doc
    }
}

fn names_match(open: &str, close: &str) -> bool {
    open == close || (tags::is_raw_text_element(open) && open.eq_ignore_ascii_case(close))
}
