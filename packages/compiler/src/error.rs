//! Fatal compiler errors
//!
//! Markup, typing and configuration problems found while walking a template
//! are accumulated in [`crate::parse_util::Diagnostics`]. The errors here stop
//! the current compile unit because no sensible partial output exists.

use thiserror::Error;

use crate::expression_parser::ExpressionError;
use crate::style::StyleError;

pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error("Invalid compiler options: {0}")]
    Config(String),
}
