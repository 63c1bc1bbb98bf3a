/**
 * Transform Pass Tests
 *
 * Node typing, sub-parser extraction, block headers, attribute values and
 * text parts produced by the pass sequence.
 */

#[cfg(test)]
mod tests {
    use tessera_compiler::ml_parser::{
        AttributeKind, AttributeValue, BlockKind, BlockParams, Document, Element, InterpolationPart,
        Node, NodeId, NodeKind, NodeType, Quote, TextContent,
    };
    use tessera_compiler::transform;
    use tessera_compiler::{CompileError, CompilerOptions, Diagnostics, Generate};

    fn run(source: &str) -> (Document, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let doc = tessera_compiler::parse(source, &CompilerOptions::default(), &mut diagnostics)
            .expect("template transforms");
        (doc, diagnostics)
    }

    fn roots(doc: &Document) -> Vec<&Node> {
        doc.children(NodeId::ROOT).iter().map(|&id| doc.node(id)).collect()
    }

    fn element(node: &Node) -> &Element {
        node.as_element().expect("node is a tag")
    }

    fn condition(node: &Node) -> &str {
        match &node.params.block {
            Some(BlockParams::Condition(expression)) => &expression.code,
            other => panic!("expected a condition, got {:?}", other),
        }
    }

    fn literal(text: &str) -> String {
        text.to_string()
    }

    /// Parts rendered as `"text"` for literals and `{code}` for expressions.
    fn describe(parts: &[InterpolationPart]) -> Vec<String> {
        parts
            .iter()
            .map(|part| match part {
                InterpolationPart::Literal(text) => format!("\"{}\"", text),
                InterpolationPart::Expression(interpolation) if interpolation.html => {
                    format!("{{@html {}}}", interpolation.expression.code)
                }
                InterpolationPart::Expression(interpolation) => {
                    format!("{{{}}}", interpolation.expression.code)
                }
            })
            .collect()
    }

    mod types {
        use super::*;

        #[test]
        fn should_classify_every_tag() {
            let (doc, diagnostics) = run(concat!(
                "<script>let a;</script><style>.a{}</style><div></div><Card></Card>",
                "<if {a}></if><for items as i></for><slot></slot><span @name=\"Row\"></span>",
                "<svg><circle></circle></svg>"
            ));
            assert!(diagnostics.is_empty());
            let types: Vec<NodeType> = roots(&doc).iter().map(|n| n.ty).collect();
            assert_eq!(
                types,
                vec![
                    NodeType::Script,
                    NodeType::Style,
                    NodeType::Element,
                    NodeType::Component,
                    NodeType::Block(BlockKind::If),
                    NodeType::Block(BlockKind::For),
                    NodeType::Block(BlockKind::Slot),
                    NodeType::Fragment,
                    NodeType::Element,
                ]
            );
        }

        #[test]
        fn should_record_fragment_names() {
            let (doc, _) = run("<span @name=\"Row\" class=\"r\"></span>");
            let node = roots(&doc)[0];
            assert_eq!(node.params.fragment.as_deref(), Some("Row"));
            let names: Vec<String> = element(node).attributes.iter().map(|a| a.full_name()).collect();
            assert_eq!(names, vec!["class"]);
        }

        #[test]
        fn should_reject_fragments_without_a_name() {
            let (doc, diagnostics) = run("<div @name></div>");
            assert_eq!(roots(&doc)[0].ty, NodeType::Element);
            assert_eq!(
                diagnostics.errors()[0].msg,
                "@name on <div> requires a value"
            );
        }

        #[test]
        fn should_classify_attributes_by_affix() {
            let (doc, _) = run("<div title=\"x\" @click={f} :value={v} #el *tip class.on={b}></div>");
            let kinds: Vec<AttributeKind> = element(roots(&doc)[0]).attributes.iter().map(|a| a.kind).collect();
            assert_eq!(
                kinds,
                vec![
                    AttributeKind::Attribute,
                    AttributeKind::Event,
                    AttributeKind::Bind,
                    AttributeKind::Ref,
                    AttributeKind::Action,
                    AttributeKind::Modifier,
                ]
            );
        }

        #[test]
        fn should_read_script_targets_and_language() {
            let (doc, _) = run(concat!(
                "<script ssr>a;</script>",
                "<script generate=\"csr\">b;</script>",
                "<script lang=\"ts\">let x: number = 1;</script>"
            ));
            let scripts = roots(&doc);
            assert_eq!(scripts[0].params.generate, Some(Generate::Ssr));
            assert_eq!(scripts[1].params.generate, Some(Generate::Csr));
            assert_eq!(scripts[2].params.generate, None);
            assert!(scripts[2].params.typescript);
            assert!(!scripts[0].params.typescript);
        }

        #[test]
        fn should_classify_script_and_style_case_insensitively() {
            let (doc, diagnostics) = run("<SCRIPT>let a = 1;</SCRIPT><Style>.a { color: red }</Style>");
            assert!(diagnostics.is_empty());
            let nodes = roots(&doc);
            assert_eq!(nodes[0].ty, NodeType::Script);
            assert_eq!(nodes[0].params.script.as_ref().unwrap().declared, vec!["a"]);
            assert_eq!(nodes[1].ty, NodeType::Style);
            assert!(nodes[1].params.style.is_some());
        }

        #[test]
        fn should_reference_component_invocations() {
            let (doc, _) = run("<Card></Card><div></div>");
            let nodes = roots(&doc);
            assert!(nodes[0].params.reference);
            assert!(!nodes[1].params.reference);
        }
    }

    mod parsers {
        use super::*;

        #[test]
        fn should_parse_script_and_style_bodies() {
            let (doc, _) = run(
                "<script>let a = 1;</script><style>.a { color: red; &:hover { color: blue } }</style>",
            );
            let nodes = roots(&doc);
            let script = nodes[0].params.script.as_ref().unwrap();
            assert_eq!(script.declared, vec!["a"]);
            let style = nodes[1].params.style.as_ref().unwrap();
            assert_eq!(style.nodes.len(), 2);
        }

        #[test]
        fn should_use_typescript_for_expressions_next_to_ts_scripts() {
            let (doc, _) = run("<script lang=\"ts\">let n: number = 1;</script><p>{n as number}</p>");
            let p = doc.children(NodeId::ROOT)[1];
            assert!(doc.node(p).params.reference);
        }

        #[test]
        fn should_fail_on_invalid_scripts() {
            let mut diagnostics = Diagnostics::new();
            let result = tessera_compiler::parse(
                "<script>let = ;</script>",
                &CompilerOptions::default(),
                &mut diagnostics,
            );
            assert!(matches!(result, Err(CompileError::Expression(_))));
        }
    }

    mod blocks {
        use super::*;

        #[test]
        fn should_read_if_chain_conditions() {
            let (doc, _) = run(
                "<if {count > 1}></if><elseif ready as visible></elseif><else></else>",
            );
            let nodes = roots(&doc);
            assert_eq!(condition(nodes[0]), "count > 1");
            assert_eq!(condition(nodes[1]), "ready && visible");
            assert!(nodes[2].params.block.is_none());
            assert!(nodes[0].params.reference);
            assert!(!nodes[1].params.reference);
            assert!(!nodes[2].params.reference);
            assert!(element(nodes[0]).attributes.is_empty());
        }

        #[test]
        fn should_read_the_value_attribute() {
            let (doc, _) = run("<if value=\"a\"></if><if value=\"a\" as b></if>");
            let nodes = roots(&doc);
            assert_eq!(condition(nodes[0]), "a");
            assert_eq!(condition(nodes[1]), "(a) && b");
        }

        #[test]
        fn should_read_for_headers() {
            let (doc, _) = run("<for {list} as row, n key row.id if {n > 0}></for>");
            let Some(BlockParams::Loop(header)) = &roots(&doc)[0].params.block else {
                panic!("expected a loop header");
            };
            assert_eq!(header.iterable.code, "list");
            assert_eq!(header.item, "row");
            assert_eq!(header.index.as_deref(), Some("n"));
            assert_eq!(header.key.as_ref().map(|k| k.code.as_str()), Some("row.id"));
            assert_eq!(header.guard.as_ref().map(|g| g.code.as_str()), Some("n > 0"));
        }

        #[test]
        fn should_fail_on_for_blocks_without_as() {
            let mut diagnostics = Diagnostics::new();
            let result = tessera_compiler::parse(
                "<for items></for>",
                &CompilerOptions::default(),
                &mut diagnostics,
            );
            assert!(matches!(result, Err(CompileError::Expression(_))));
        }

        #[test]
        fn should_name_slots() {
            let (doc, _) = run("<slot></slot><slot name=\"footer\"></slot><Card><content name=\"head\"></content></Card>");
            let nodes = roots(&doc);
            let slot_name = |node: &Node| match &node.params.block {
                Some(BlockParams::Slot(name)) => name.clone(),
                other => panic!("expected a slot, got {:?}", other),
            };
            assert_eq!(slot_name(nodes[0]), "default");
            assert_eq!(slot_name(nodes[1]), "footer");
            let content = doc.children(doc.children(NodeId::ROOT)[2])[0];
            assert_eq!(doc.node(content).ty, NodeType::Block(BlockKind::SlotContent));
            assert_eq!(slot_name(doc.node(content)), "head");
        }
    }

    mod attributes {
        use super::*;

        #[test]
        fn should_split_values_into_parts() {
            let (doc, _) = run(
                "<a href=\"/u/{id}\" title={'x'} :value={v} @click=\"count++\" data-x={}></a>",
            );
            let attributes = &element(roots(&doc)[0]).attributes;
            let described: Vec<Vec<String>> = attributes.iter().map(|a| describe(a.parts())).collect();
            assert_eq!(
                described,
                vec![
                    vec![literal("\"/u/\""), literal("{id}")],
                    vec![literal("\"x\"")],
                    vec![literal("{v}")],
                    vec![literal("{count++}")],
                    vec![literal("\"{}\"")],
                ]
            );
            assert!(matches!(
                attributes[0].value,
                AttributeValue::Parts { quote: Quote::Double, .. }
            ));
        }

        #[test]
        fn should_keep_literal_expressions_on_bindings() {
            let (doc, _) = run("<Card :size={3}></Card>");
            let attribute = &element(roots(&doc)[0]).attributes[0];
            assert_eq!(attribute.single_expression().map(|e| e.code.as_str()), Some("3"));
        }

        #[test]
        fn should_derive_implicit_expressions() {
            let (doc, _) = run("<input :value @input class.active>");
            let attributes = &element(roots(&doc)[0]).attributes;
            let codes: Vec<Option<&str>> = attributes
                .iter()
                .map(|a| a.single_expression().map(|e| e.code.as_str()))
                .collect();
            assert_eq!(codes, vec![Some("value"), Some("input"), Some("active")]);
        }

        #[test]
        fn should_expand_shorthand_and_reject_other_anonymous_attributes() {
            let (doc, diagnostics) = run("<Card {title} {a + b}></Card>");
            let attributes = &element(roots(&doc)[0]).attributes;
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].name, "title");
            assert_eq!(
                attributes[0].single_expression().map(|e| e.code.as_str()),
                Some("title")
            );
            assert_eq!(
                diagnostics.errors()[0].msg,
                "Anonymous attribute {a + b} must be a single identifier"
            );
        }

        #[test]
        fn should_reference_elements_with_bindings() {
            let (doc, _) = run("<div><p>static</p><p>{x}</p><p class={c}></p><p @click={f}></p></div>");
            let div = doc.children(NodeId::ROOT)[0];
            assert!(!doc.node(div).params.reference);
            let references: Vec<bool> = doc
                .children(div)
                .iter()
                .map(|&id| doc.node(id).params.reference)
                .collect();
            assert_eq!(references, vec![false, true, true, true]);
        }
    }

    mod texts {
        use super::*;

        #[test]
        fn should_split_text_into_parts() {
            let (doc, _) = run("<p>Hi {name}, {@html body}</p>");
            let p = doc.children(NodeId::ROOT)[0];
            let NodeKind::Text(text) = &doc.node(doc.children(p)[0]).kind else {
                panic!("expected text");
            };
            let TextContent::Parts(parts) = &text.content else {
                panic!("expected parsed text");
            };
            assert_eq!(
                describe(parts),
                vec![
                    literal("\"Hi \""),
                    literal("{name}"),
                    literal("\", \""),
                    literal("{@html body}"),
                ]
            );
        }

        #[test]
        fn should_not_reference_parents_of_folded_text() {
            let (doc, _) = run("<p>{'static'}</p>");
            let p = doc.children(NodeId::ROOT)[0];
            assert!(!doc.node(p).params.reference);
        }

        #[test]
        fn should_not_reference_parents_of_constant_expressions() {
            let (doc, _) = run("<p title={1 + 2}>{[1, 2].join(\"-\")}</p><b>{((n) => n)(1) + k}</b>");
            let nodes = roots(&doc);
            assert!(!nodes[0].params.reference);
            assert!(nodes[1].params.reference);
        }
    }

    #[test]
    fn should_leave_the_tree_unchanged_when_run_twice() {
        let source = concat!(
            "<script>let n = 0;</script><style>.a { color: red }</style>",
            "<div class=\"a {n}\" @click=\"n++\" *tip>{n}</div>",
            "<if {n}><b>x</b></if><else>y</else>",
            "<for items as item><Card {item} :open></Card></for>",
            "<slot name=\"end\"></slot><span @name=\"Row\">{label}</span>"
        );
        let (mut doc, _) = run(source);
        let before = doc.to_json().unwrap();

        let mut diagnostics = Diagnostics::new();
        transform::transform(&mut doc, &mut diagnostics).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(doc.to_json().unwrap(), before);
    }
}
