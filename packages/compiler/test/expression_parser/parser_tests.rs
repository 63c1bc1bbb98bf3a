/**
 * Expression Parser Tests
 *
 * Dependency, assignment and shape facts extracted from template
 * expressions, and the split of script bodies.
 */

#[cfg(test)]
mod tests {
    use tessera_compiler::expression_parser::{
        generate_code, ExpressionError, ExpressionKind, ExpressionParser,
    };

    fn parser() -> ExpressionParser {
        ExpressionParser::new()
    }

    mod expressions {
        use super::*;

        #[test]
        fn should_collect_free_identifiers_in_first_use_order() {
            let expression = parser().parse_expression("a + b.c + a").unwrap();
            assert_eq!(expression.dependencies.as_slice(), ["a", "b"]);
            assert!(expression.depends_on("b"));
            assert!(!expression.depends_on("c"));
        }

        #[test]
        fn should_exclude_arrow_parameters() {
            let expression = parser().parse_expression("(e) => save(e, id)").unwrap();
            assert_eq!(expression.dependencies.as_slice(), ["save", "id"]);
            assert_eq!(expression.kind, ExpressionKind::Function);
        }

        #[test]
        fn should_trim_the_source_text() {
            let expression = parser().parse_expression("  user.name  ").unwrap();
            assert_eq!(expression.code, "user.name");
        }

        #[test]
        fn should_classify_expression_shapes() {
            let cases = [
                ("x", ExpressionKind::Identifier),
                ("a.b", ExpressionKind::Member),
                ("a[0]", ExpressionKind::Member),
                ("() => 1", ExpressionKind::Function),
                ("function () {}", ExpressionKind::Function),
                ("'s'", ExpressionKind::Literal),
                ("a + 1", ExpressionKind::Other),
            ];
            for (code, kind) in cases {
                assert_eq!(parser().parse_expression(code).unwrap().kind, kind, "{}", code);
            }
        }

        #[test]
        fn should_fold_literals() {
            let cases = [("'hi'", "hi"), ("42", "42"), ("true", "true"), ("(1.5)", "1.5")];
            for (code, folded) in cases {
                let expression = parser().parse_expression(code).unwrap();
                assert_eq!(expression.literal.as_deref(), Some(folded), "{}", code);
                assert!(expression.is_static);
            }
        }

        #[test]
        fn should_mark_constant_expressions_static() {
            let expression = parser().parse_expression("1 + 2").unwrap();
            assert!(expression.is_static);
            assert_eq!(expression.literal, None);
            assert_eq!(expression.kind, ExpressionKind::Other);
        }

        #[test]
        fn should_collect_assignment_roots() {
            let update = parser().parse_expression("count++").unwrap();
            assert_eq!(update.assigned.as_slice(), ["count"]);

            let member = parser().parse_expression("user.name = value").unwrap();
            assert_eq!(member.assigned.as_slice(), ["user"]);
            assert!(member.depends_on("value"));

            let read = parser().parse_expression("a == b").unwrap();
            assert!(read.assigned.is_empty());
        }

        #[test]
        fn should_report_callable_references() {
            assert!(parser().parse_expression("save").unwrap().is_callable_reference());
            assert!(parser().parse_expression("store.save").unwrap().is_callable_reference());
            assert!(!parser().parse_expression("save()").unwrap().is_callable_reference());
        }

        #[test]
        fn should_reject_invalid_expressions() {
            assert!(matches!(
                parser().parse_expression("a +"),
                Err(ExpressionError::Syntax { .. })
            ));
            assert_eq!(parser().parse_expression("   "), Err(ExpressionError::Empty));
        }

        #[test]
        fn should_accept_typescript_when_enabled() {
            let expression = ExpressionParser::with_typescript(true)
                .parse_expression("value as number")
                .unwrap();
            assert!(expression.depends_on("value"));
        }
    }

    mod scripts {
        use super::*;

        const SCRIPT: &str = r#"import { a } from "x";
export const n = 1;
let count = 0;
const k = 2;
function inc() { count++; }"#;

        #[test]
        fn should_split_imports_exports_and_statements() {
            let parts = parser().parse_script(SCRIPT).unwrap();
            assert_eq!(parts.imports, vec!["import { a } from \"x\";"]);
            assert_eq!(parts.exports, vec!["export const n = 1;"]);
            assert_eq!(
                parts.statements,
                vec!["let count = 0;", "const k = 2;", "function inc() { count++; }"]
            );
        }

        #[test]
        fn should_collect_let_and_var_declarations_only() {
            let parts = parser()
                .parse_script("let a = 1; var b; const c = 2; let { d, e: [f] } = o;")
                .unwrap();
            assert_eq!(parts.declared, vec!["a", "b", "d", "f"]);
        }

        #[test]
        fn should_collect_assignments_anywhere_in_the_script() {
            let parts = parser().parse_script(SCRIPT).unwrap();
            assert_eq!(parts.assigned, vec!["count"]);
        }

        #[test]
        fn should_parse_typescript_scripts() {
            let parts = ExpressionParser::with_typescript(true)
                .parse_script("let n: number = 1;")
                .unwrap();
            assert!(parts.typescript);
            assert_eq!(parts.declared, vec!["n"]);
        }

        #[test]
        fn should_reject_invalid_scripts() {
            assert!(matches!(
                parser().parse_script("let = ;"),
                Err(ExpressionError::Script { .. })
            ));
        }
    }

    mod codegen {
        use super::*;

        #[test]
        fn should_normalize_equivalent_statements() {
            assert_eq!(
                generate_code("import {a} from 'x'", false).unwrap(),
                generate_code("import { a } from \"x\";", false).unwrap()
            );
        }

        #[test]
        fn should_reject_invalid_source() {
            assert!(generate_code("import {", false).is_err());
        }
    }
}
