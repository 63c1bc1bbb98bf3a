/**
 * HTML Parser Tests
 *
 * Tree building, attribute tokenization, whitespace policy, positions and
 * error recovery of the markup parser.
 */

#[path = "util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{error_messages, humanize_dom, parse, parse_with, row};
    use tessera_compiler::ml_parser::{
        Attribute, AttributeValue, Document, Element, NodeId, ParseOptions, Quote,
    };

    fn first_element(doc: &Document) -> &Element {
        doc.node(doc.children(NodeId::ROOT)[0])
            .as_element()
            .expect("first root node is an element")
    }

    fn value_of(attribute: &Attribute) -> Option<(String, Quote)> {
        match &attribute.value {
            AttributeValue::Text { text, quote } => Some((text.clone(), *quote)),
            _ => None,
        }
    }

    mod elements {
        use super::*;

        #[test]
        fn should_parse_nested_elements() {
            let (doc, diagnostics) = parse("<div><p>a</p><span></span></div>");
            assert!(diagnostics.is_empty());
            assert_eq!(
                humanize_dom(&doc),
                vec![
                    row("element", "div", 0),
                    row("element", "p", 1),
                    row("text", "a", 2),
                    row("element", "span", 1),
                ]
            );
        }

        #[test]
        fn should_parse_text_and_comments_at_the_root() {
            let (doc, _) = parse("a<!-- c -->b");
            assert_eq!(
                humanize_dom(&doc),
                vec![row("text", "a", 0), row("comment", " c ", 0), row("text", "b", 0)]
            );
        }

        #[test]
        fn should_drop_comments_when_disabled() {
            let options = ParseOptions {
                comments: false,
                ..ParseOptions::default()
            };
            let (doc, _) = parse_with("<p>a<!--x-->b</p>", &options);
            assert_eq!(
                humanize_dom(&doc),
                vec![row("element", "p", 0), row("text", "ab", 1)]
            );
        }

        #[test]
        fn should_handle_void_and_self_closing_elements() {
            let (doc, diagnostics) = parse("<br><img/><div/>x");
            assert!(diagnostics.is_empty());
            assert_eq!(
                humanize_dom(&doc),
                vec![
                    row("element", "br", 0),
                    row("element", "img", 0),
                    row("element", "div", 0),
                    row("text", "x", 0),
                ]
            );
            let div = doc.node(doc.children(NodeId::ROOT)[2]).as_element().unwrap();
            assert!(div.self_closing);
            assert!(div.void_element);
            let br = first_element(&doc);
            assert!(br.void_element);
            assert!(!br.self_closing);
        }

        #[test]
        fn should_keep_raw_text_element_content_verbatim() {
            let (doc, diagnostics) = parse("<script>if (a<b) {}</script><style>.a{}</style>");
            assert!(diagnostics.is_empty());
            let script = first_element(&doc);
            assert_eq!(script.raw.as_deref(), Some("if (a<b) {}"));
            assert!(doc.children(doc.children(NodeId::ROOT)[0]).is_empty());
            let style = doc.node(doc.children(NodeId::ROOT)[1]).as_element().unwrap();
            assert_eq!(style.raw.as_deref(), Some(".a{}"));
        }

        #[test]
        fn should_treat_markup_inside_braces_as_text() {
            let (doc, _) = parse(r#"<p>{a < b ? "<i>" : ""}</p>"#);
            assert_eq!(
                humanize_dom(&doc),
                vec![
                    row("element", "p", 0),
                    row("text", r#"{a < b ? "<i>" : ""}"#, 1),
                ]
            );
        }

        #[test]
        fn should_keep_declarations_as_text() {
            let (doc, _) = parse("<!DOCTYPE html><p></p>");
            assert_eq!(
                humanize_dom(&doc),
                vec![row("text", "<!DOCTYPE html>", 0), row("element", "p", 0)]
            );
        }
    }

    mod whitespace {
        use super::*;

        #[test]
        fn should_collapse_whitespace_outside_pre() {
            let (doc, _) = parse("<p>a \n  b</p><pre>a \n  b</pre>");
            assert_eq!(
                humanize_dom(&doc),
                vec![
                    row("element", "p", 0),
                    row("text", "a b", 1),
                    row("element", "pre", 0),
                    row("text", "a \n  b", 1),
                ]
            );
        }

        #[test]
        fn should_trim_whitespace_at_edges() {
            let (doc, _) = parse("\n<div>\n  <p>x</p>\n</div>\n");
            assert_eq!(
                humanize_dom(&doc),
                vec![
                    row("element", "div", 0),
                    row("element", "p", 1),
                    row("text", "x", 2),
                ]
            );
        }

        #[test]
        fn should_keep_edge_whitespace_when_trim_is_disabled() {
            let options = ParseOptions {
                trim: false,
                ..ParseOptions::default()
            };
            let (doc, _) = parse_with("<div> <p>x</p> </div>", &options);
            assert_eq!(
                humanize_dom(&doc),
                vec![
                    row("element", "div", 0),
                    row("text", " ", 1),
                    row("element", "p", 1),
                    row("text", "x", 2),
                    row("text", " ", 1),
                ]
            );
        }

        #[test]
        fn should_preserve_whitespace_when_requested() {
            let options = ParseOptions {
                preserve_whitespace: true,
                ..ParseOptions::default()
            };
            let (doc, _) = parse_with("<p>a   b</p>", &options);
            assert_eq!(
                humanize_dom(&doc),
                vec![row("element", "p", 0), row("text", "a   b", 1)]
            );
        }

        #[test]
        fn should_not_report_whitespace_only_sources() {
            let (doc, diagnostics) = parse("  \n ");
            assert!(doc.is_empty());
            assert!(diagnostics.is_empty());
            let (doc, diagnostics) = parse("");
            assert!(doc.is_empty());
            assert!(diagnostics.is_empty());
        }
    }

    mod attributes {
        use super::*;

        #[test]
        fn should_parse_every_quote_style() {
            let (doc, diagnostics) = parse("<input a=\"1\" b='2' c={x} d=4 e>");
            assert!(diagnostics.is_empty());
            let values: Vec<_> = first_element(&doc)
                .attributes
                .iter()
                .map(|a| (a.name.clone(), value_of(a)))
                .collect();
            assert_eq!(
                values,
                vec![
                    ("a".to_string(), Some(("1".to_string(), Quote::Double))),
                    ("b".to_string(), Some(("2".to_string(), Quote::Single))),
                    ("c".to_string(), Some(("x".to_string(), Quote::Brace))),
                    ("d".to_string(), Some(("4".to_string(), Quote::Unquoted))),
                    ("e".to_string(), None),
                ]
            );
        }

        #[test]
        fn should_split_prefixes_and_suffixes() {
            let (doc, _) = parse(
                "<button @click.prevent={save} :value={v} #el *tooltip=\"hi\" class.active={on}></button>",
            );
            let affixes: Vec<_> = first_element(&doc)
                .attributes
                .iter()
                .map(|a| (a.prefix, a.name.clone(), a.suffix.clone()))
                .collect();
            assert_eq!(
                affixes,
                vec![
                    (Some('@'), "click".to_string(), Some(".prevent".to_string())),
                    (Some(':'), "value".to_string(), None),
                    (Some('#'), "el".to_string(), None),
                    (Some('*'), "tooltip".to_string(), None),
                    (None, "class".to_string(), Some(".active".to_string())),
                ]
            );
        }

        #[test]
        fn should_keep_names_whole_when_affixes_are_disabled() {
            let options = ParseOptions {
                affix: false,
                ..ParseOptions::default()
            };
            let (doc, _) = parse_with("<b @click.once={x}></b>", &options);
            let attribute = &first_element(&doc).attributes[0];
            assert_eq!(attribute.prefix, None);
            assert_eq!(attribute.name, "@click.once");
            assert_eq!(attribute.suffix, None);
        }

        #[test]
        fn should_record_the_raw_attribute_source() {
            let (doc, _) = parse("<Card {title} label = 'x'></Card>");
            let attributes = &first_element(&doc).attributes;
            assert!(attributes[0].is_anonymous());
            assert_eq!(attributes[0].raw, "{title}");
            assert_eq!(attributes[1].raw, "label = 'x'");
        }

        #[test]
        fn should_report_unterminated_values() {
            let (_, diagnostics) = parse("<div a=\"x>");
            assert!(error_messages(&diagnostics).contains(&"Unterminated attribute value".to_string()));
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn should_report_unclosed_elements() {
            let (doc, diagnostics) = parse("<div><span>");
            assert_eq!(
                error_messages(&diagnostics),
                vec!["Unclosed element \"span\"", "Unclosed element \"div\""]
            );
            assert_eq!(
                humanize_dom(&doc),
                vec![row("element", "div", 0), row("element", "span", 1)]
            );
        }

        #[test]
        fn should_close_inner_elements_with_an_outer_close() {
            let (doc, diagnostics) = parse("<div><span></div><p></p>");
            assert_eq!(error_messages(&diagnostics), vec!["Unclosed element \"span\""]);
            assert_eq!(
                humanize_dom(&doc),
                vec![
                    row("element", "div", 0),
                    row("element", "span", 1),
                    row("element", "p", 0),
                ]
            );
        }

        #[test]
        fn should_report_unexpected_closing_tags() {
            let (doc, diagnostics) = parse("<p></b></p>");
            assert_eq!(
                error_messages(&diagnostics),
                vec!["Unexpected closing tag \"b\""]
            );
            assert_eq!(humanize_dom(&doc), vec![row("element", "p", 0)]);
        }
    }

    mod positions {
        use super::*;

        #[test]
        fn should_omit_positions_by_default() {
            let (doc, _) = parse("<div>a</div>");
            assert!(doc.node(doc.children(NodeId::ROOT)[0]).position.is_none());
        }

        #[test]
        fn should_record_byte_offsets() {
            let options = ParseOptions {
                index: true,
                ..ParseOptions::default()
            };
            let (doc, _) = parse_with("<div>a</div>", &options);
            let div = doc.children(NodeId::ROOT)[0];
            let position = doc.node(div).position.unwrap();
            assert_eq!((position.start, position.end), (Some(0), Some(12)));
            assert!(position.loc.is_none());

            let text = doc.node(doc.children(div)[0]).position.unwrap();
            assert_eq!((text.start, text.end), (Some(5), Some(6)));
        }

        #[test]
        fn should_record_line_and_column() {
            let options = ParseOptions {
                loc: true,
                ..ParseOptions::default()
            };
            let (doc, _) = parse_with("<div>\n  <p>x</p>\n</div>", &options);
            let div = doc.children(NodeId::ROOT)[0];
            let p = doc.children(div)[0];
            let position = doc.node(p).position.unwrap();
            assert!(position.start.is_none());
            let loc = position.loc.unwrap();
            assert_eq!((loc.start.line, loc.start.col), (1, 2));
            assert_eq!((loc.end.line, loc.end.col), (1, 10));
        }
    }
}
