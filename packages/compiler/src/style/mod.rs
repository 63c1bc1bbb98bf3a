//! Style Module
//!
//! Embedded CSS pipeline: parse to a small AST, flatten nesting, scope
//! selectors to a component and print minified CSS.

pub mod ast;
pub mod parser;
pub mod resolve;
pub mod scope;
pub mod serializer;

use thiserror::Error;

pub use ast::{AtRule, StyleNode, StyleRule, StyleSheet};
pub use parser::css_to_ast;
pub use resolve::resolve;
pub use scope::{content_hash, scope_selector, scope_stylesheet, SCOPE_ATTRIBUTE};
pub use serializer::ast_to_css;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("Unbalanced braces in style at offset {offset}")]
    UnbalancedBraces { offset: usize },
}

/// Parses `css` and flattens its nesting.
pub fn parse_style(css: &str) -> Result<StyleSheet, StyleError> {
    Ok(resolve(&css_to_ast(css)?))
}
