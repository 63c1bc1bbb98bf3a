//! Expression Parser
//!
//! Thin layer over the oxc JS/TS parser. Template expressions and script
//! bodies are parsed to validate them and to extract dependency facts; the
//! original source text is what codegen emits. Identifiers are resolved with
//! `oxc_semantic`, so names bound inside nested functions never leak out.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    AssignmentExpression, AssignmentTarget, BindingIdentifier, Declaration, Expression as JsExpression,
    IdentifierReference, SimpleAssignmentTarget, Statement, UpdateExpression, VariableDeclaration,
    VariableDeclarationKind,
};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_semantic::{Scoping, SemanticBuilder};
use oxc_span::{GetSpan, SourceType};

use super::ast::{Expression, ExpressionError, ExpressionKind, ScriptParts};
use crate::chars;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionParser {
    typescript: bool,
}

impl ExpressionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_typescript(typescript: bool) -> Self {
        ExpressionParser { typescript }
    }

    fn source_type(&self) -> SourceType {
        if self.typescript {
            SourceType::ts()
        } else {
            SourceType::mjs()
        }
    }

    pub fn parse_expression(&self, text: &str) -> Result<Expression, ExpressionError> {
        let code = text.trim();
        if code.is_empty() {
            return Err(ExpressionError::Empty);
        }

        let allocator = Allocator::default();
        let expression = Parser::new(&allocator, code, self.source_type())
            .parse_expression()
            .map_err(|errors| ExpressionError::Syntax {
                text: code.to_string(),
                message: errors
                    .first()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unexpected token".to_string()),
            })?;

        // Scope analysis needs a program; the newlines keep a trailing line
        // comment from swallowing the closing paren.
        let wrapped = format!("(\n{}\n);", code);
        let ret = Parser::new(&allocator, &wrapped, self.source_type()).parse();
        if ret.panicked || !ret.errors.is_empty() {
            return Err(ExpressionError::Syntax {
                text: code.to_string(),
                message: ret
                    .errors
                    .first()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unexpected token".to_string()),
            });
        }
        let semantic = SemanticBuilder::new().build(&ret.program).semantic;
        let mut collector = IdentifierCollector::new(semantic.scoping());
        collector.visit_program(&ret.program);

        Ok(Expression {
            code: code.to_string(),
            is_static: collector.references.is_empty(),
            dependencies: collector.references.into_iter().collect(),
            assigned: collector.assigned.into_iter().collect(),
            kind: expression_kind(&expression),
            literal: fold_literal(&expression),
        })
    }

    pub fn parse_script(&self, text: &str) -> Result<ScriptParts, ExpressionError> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, text, self.source_type()).parse();
        if ret.panicked || !ret.errors.is_empty() {
            return Err(ExpressionError::Script {
                message: ret
                    .errors
                    .first()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unexpected token".to_string()),
            });
        }

        let mut parts = ScriptParts {
            typescript: self.typescript,
            ..ScriptParts::default()
        };
        for statement in &ret.program.body {
            let span = statement.span();
            let code = text[span.start as usize..span.end as usize].to_string();
            match statement {
                Statement::ImportDeclaration(_) => parts.imports.push(code),
                Statement::ExportNamedDeclaration(export) => {
                    if let Some(Declaration::VariableDeclaration(declaration)) = &export.declaration {
                        collect_declared(declaration, &mut parts.declared);
                    }
                    parts.exports.push(code);
                }
                Statement::ExportDefaultDeclaration(_) | Statement::ExportAllDeclaration(_) => {
                    parts.exports.push(code)
                }
                Statement::VariableDeclaration(declaration) => {
                    collect_declared(declaration, &mut parts.declared);
                    parts.statements.push(code);
                }
                _ => parts.statements.push(code),
            }
        }

        let semantic = SemanticBuilder::new().build(&ret.program).semantic;
        let mut collector = IdentifierCollector::new(semantic.scoping());
        collector.visit_program(&ret.program);
        parts.assigned = collector.assigned;
        Ok(parts)
    }

    /// Validates a loop binding name.
    pub fn parse_binding(&self, name: &str, text: &str) -> Result<String, ExpressionError> {
        let name = name.trim();
        if chars::is_identifier(name) {
            Ok(name.to_string())
        } else {
            Err(ExpressionError::Binding {
                name: name.to_string(),
                text: text.to_string(),
            })
        }
    }
}

/// Collects the names a piece of code reads and assigns from its enclosing
/// scope: unresolved globals and top-level bindings. References resolving
/// to parameters or locals of a nested function are skipped.
struct IdentifierCollector<'s> {
    scoping: &'s Scoping,
    references: Vec<String>,
    assigned: Vec<String>,
}

impl<'s> IdentifierCollector<'s> {
    fn new(scoping: &'s Scoping) -> Self {
        IdentifierCollector {
            scoping,
            references: Vec::new(),
            assigned: Vec::new(),
        }
    }

    fn is_outer(&self, it: &IdentifierReference<'_>) -> bool {
        let Some(reference_id) = it.reference_id.get() else {
            return true;
        };
        match self.scoping.get_reference(reference_id).symbol_id() {
            Some(symbol_id) => self.scoping.symbol_scope_id(symbol_id) == self.scoping.root_scope_id(),
            None => true,
        }
    }

    fn assign(&mut self, root: Option<&IdentifierReference<'_>>) {
        if let Some(root) = root {
            if self.is_outer(root) {
                push_unique(&mut self.assigned, root.name.as_str());
            }
        }
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

impl<'a, 's> Visit<'a> for IdentifierCollector<'s> {
    fn visit_identifier_reference(&mut self, it: &IdentifierReference<'a>) {
        if self.is_outer(it) {
            push_unique(&mut self.references, it.name.as_str());
        }
    }

    fn visit_assignment_expression(&mut self, it: &AssignmentExpression<'a>) {
        self.assign(assignment_target_root(&it.left));
        walk::walk_assignment_expression(self, it);
    }

    fn visit_update_expression(&mut self, it: &UpdateExpression<'a>) {
        self.assign(simple_target_root(&it.argument));
        walk::walk_update_expression(self, it);
    }
}

#[derive(Default)]
struct BindingCollector {
    names: Vec<String>,
}

impl<'a> Visit<'a> for BindingCollector {
    fn visit_binding_identifier(&mut self, it: &BindingIdentifier<'a>) {
        push_unique(&mut self.names, it.name.as_str());
    }
}

fn collect_declared(declaration: &VariableDeclaration<'_>, declared: &mut Vec<String>) {
    if !matches!(
        declaration.kind,
        VariableDeclarationKind::Let | VariableDeclarationKind::Var
    ) {
        return;
    }
    let mut collector = BindingCollector::default();
    for declarator in &declaration.declarations {
        collector.visit_binding_pattern(&declarator.id);
    }
    for name in collector.names {
        push_unique(declared, &name);
    }
}

fn expression_root<'b, 'a>(expression: &'b JsExpression<'a>) -> Option<&'b IdentifierReference<'a>> {
    match expression {
        JsExpression::Identifier(id) => Some(id),
        JsExpression::StaticMemberExpression(member) => expression_root(&member.object),
        JsExpression::ComputedMemberExpression(member) => expression_root(&member.object),
        JsExpression::PrivateFieldExpression(member) => expression_root(&member.object),
        JsExpression::ParenthesizedExpression(inner) => expression_root(&inner.expression),
        _ => None,
    }
}

fn assignment_target_root<'b, 'a>(
    target: &'b AssignmentTarget<'a>,
) -> Option<&'b IdentifierReference<'a>> {
    match target {
        AssignmentTarget::AssignmentTargetIdentifier(id) => Some(id),
        AssignmentTarget::StaticMemberExpression(member) => expression_root(&member.object),
        AssignmentTarget::ComputedMemberExpression(member) => expression_root(&member.object),
        AssignmentTarget::PrivateFieldExpression(member) => expression_root(&member.object),
        _ => None,
    }
}

fn simple_target_root<'b, 'a>(
    target: &'b SimpleAssignmentTarget<'a>,
) -> Option<&'b IdentifierReference<'a>> {
    match target {
        SimpleAssignmentTarget::AssignmentTargetIdentifier(id) => Some(id),
        SimpleAssignmentTarget::StaticMemberExpression(member) => expression_root(&member.object),
        SimpleAssignmentTarget::ComputedMemberExpression(member) => expression_root(&member.object),
        SimpleAssignmentTarget::PrivateFieldExpression(member) => expression_root(&member.object),
        _ => None,
    }
}

fn expression_kind(expression: &JsExpression<'_>) -> ExpressionKind {
    match expression {
        JsExpression::Identifier(_) => ExpressionKind::Identifier,
        JsExpression::StaticMemberExpression(_)
        | JsExpression::ComputedMemberExpression(_)
        | JsExpression::PrivateFieldExpression(_) => ExpressionKind::Member,
        JsExpression::ArrowFunctionExpression(_) | JsExpression::FunctionExpression(_) => {
            ExpressionKind::Function
        }
        JsExpression::StringLiteral(_)
        | JsExpression::NumericLiteral(_)
        | JsExpression::BooleanLiteral(_) => ExpressionKind::Literal,
        JsExpression::ParenthesizedExpression(inner) => expression_kind(&inner.expression),
        _ => ExpressionKind::Other,
    }
}

fn fold_literal(expression: &JsExpression<'_>) -> Option<String> {
    match expression {
        JsExpression::StringLiteral(literal) => Some(literal.value.to_string()),
        JsExpression::NumericLiteral(literal) => Some(format_number(literal.value)),
        JsExpression::BooleanLiteral(literal) => Some(literal.value.to_string()),
        JsExpression::ParenthesizedExpression(inner) => fold_literal(&inner.expression),
        _ => None,
    }
}

/// Formats a number the way JavaScript's `String(n)` does for common values.
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}
