/**
 * Expression Parser Module
 *
 * Embedded JS/TS expressions and script blocks, backed by oxc.
 */
pub mod ast;
pub mod parser;
pub mod serializer;

pub use ast::*;
pub use parser::ExpressionParser;
pub use serializer::generate_code;
