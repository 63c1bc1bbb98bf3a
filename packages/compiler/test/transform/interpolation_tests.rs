/**
 * Interpolation Tests
 *
 * Splitting of `{expression}` spans out of text and attribute values.
 */

#[cfg(test)]
mod tests {
    use tessera_compiler::expression_parser::ExpressionParser;
    use tessera_compiler::ml_parser::InterpolationPart;
    use tessera_compiler::transform::{has_interpolation, parse_interpolation};

    fn split(text: &str) -> Vec<String> {
        parse_interpolation(text, &ExpressionParser::new())
            .unwrap()
            .iter()
            .map(|part| match part {
                InterpolationPart::Literal(text) => format!("L:{}", text),
                InterpolationPart::Expression(interpolation) if interpolation.html => {
                    format!("H:{}", interpolation.expression.code)
                }
                InterpolationPart::Expression(interpolation) => {
                    format!("E:{}", interpolation.expression.code)
                }
            })
            .collect()
    }

    #[test]
    fn should_split_literals_and_expressions() {
        assert_eq!(split("a {b} c"), vec!["L:a ", "E:b", "L: c"]);
        assert_eq!(split("{a}{b}"), vec!["E:a", "E:b"]);
        assert_eq!(split("plain"), vec!["L:plain"]);
        assert!(split("").is_empty());
    }

    #[test]
    fn should_fold_literal_expressions_into_text() {
        assert_eq!(split("x{'y'}{1}z"), vec!["L:xy1z"]);
    }

    #[test]
    fn should_keep_empty_and_unbalanced_braces_as_text() {
        assert_eq!(split("a {} b"), vec!["L:a {} b"]);
        assert_eq!(split("a { b"), vec!["L:a { b"]);
    }

    #[test]
    fn should_match_braces_past_nesting_and_strings() {
        assert_eq!(split("{ fmt({ a: '}' }) }"), vec!["E:fmt({ a: '}' })"]);
        assert_eq!(split("{`x${y}`}"), vec!["E:`x${y}`"]);
    }

    #[test]
    fn should_mark_raw_html_expressions() {
        assert_eq!(split("{@html raw}"), vec!["H:raw"]);
        assert_eq!(split("{@html 'x'}"), vec!["H:'x'"]);
    }

    #[test]
    fn should_report_invalid_expressions() {
        assert!(parse_interpolation("{a +}", &ExpressionParser::new()).is_err());
    }

    #[test]
    fn should_detect_interpolations() {
        assert!(has_interpolation("a {b} c"));
        assert!(has_interpolation("{} {x}"));
        assert!(!has_interpolation("a {  } c"));
        assert!(!has_interpolation("a { c"));
        assert!(!has_interpolation("plain"));
    }
}
