//! Expression Parser AST
//!
//! What the compiler keeps from an embedded expression or script once the
//! JS/TS parser has looked at it: the source text plus the facts codegen
//! needs (free identifiers, assignment targets, shape, folded literal).

use serde::Serialize;
use smallvec::SmallVec;
use thiserror::Error;

pub type Dependencies = SmallVec<[String; 4]>;

/// Coarse shape of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExpressionKind {
    Identifier,
    Member,
    Function,
    Literal,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    /// Source text, trimmed.
    pub code: String,
    /// Free identifiers read by the expression, in first-use order.
    pub dependencies: Dependencies,
    /// Root identifiers the expression assigns to.
    #[serde(skip_serializing_if = "SmallVec::is_empty")]
    pub assigned: SmallVec<[String; 2]>,
    pub kind: ExpressionKind,
    /// Text of a string, number or boolean literal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(rename = "static")]
    pub is_static: bool,
}

impl Expression {
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }

    /// Whether the expression can be passed where a callable is expected.
    pub fn is_callable_reference(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::Identifier | ExpressionKind::Member | ExpressionKind::Function
        )
    }
}

/// A `<script>` body split the way codegen consumes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScriptParts {
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    /// Remaining top-level statements, in order.
    pub statements: Vec<String>,
    /// Names bound by top-level `let`/`var` declarations.
    pub declared: Vec<String>,
    /// Root identifiers assigned anywhere in the script.
    pub assigned: Vec<String>,
    pub typescript: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Invalid expression `{text}`: {message}")]
    Syntax { text: String, message: String },

    #[error("Invalid script: {message}")]
    Script { message: String },

    #[error("Invalid binding name `{name}` in `{text}`")]
    Binding { name: String, text: String },

    #[error("Empty expression")]
    Empty,
}
