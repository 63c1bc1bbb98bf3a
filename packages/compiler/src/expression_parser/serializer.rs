//! Code generation for parsed JS/TS
//!
//! Reprints source through the oxc code generator so textually different but
//! equivalent statements (quote style, spacing) compare equal.

use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;

use super::ast::ExpressionError;

/// Normalized text of `source`, one statement per line.
pub fn generate_code(source: &str, typescript: bool) -> Result<String, ExpressionError> {
    let allocator = Allocator::default();
    let source_type = if typescript {
        SourceType::ts()
    } else {
        SourceType::mjs()
    };
    let ret = Parser::new(&allocator, source, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        return Err(ExpressionError::Script {
            message: ret
                .errors
                .first()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unexpected token".to_string()),
        });
    }
    Ok(Codegen::new().build(&ret.program).code.trim_end().to_string())
}
