//! ML (Markup Language) Parser Module
//!
//! Template markup to arena AST and back.

pub mod ast;
pub mod html_whitespaces;
pub mod lexer;
pub mod parser;
pub mod serializer;
pub mod tags;
pub mod tokens;

pub use ast::*;
pub use lexer::{find_closing_brace, tokenize, TokenizeResult};
pub use parser::{parse, ParseOptions};
pub use serializer::to_html;
pub use tags::*;
