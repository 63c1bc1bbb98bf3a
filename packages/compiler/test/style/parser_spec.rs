//! Style Parser Tests
//!
//! Parsing, nesting resolution and minified printing of embedded styles.

mod utils;
use tessera_compiler::style::{css_to_ast, StyleError, StyleNode};
use utils::{compile_css, rule_selectors};

#[test]
fn should_flatten_nested_rules() {
    let css = "
        .card {
            color: red;
            &:hover { color: blue; }
            .title { font-weight: bold }
        }
    ";
    assert_eq!(
        compile_css(css),
        ".card{color:red}.card:hover{color:blue}.card .title{font-weight:bold}"
    );
}

#[test]
fn should_expand_nesting_against_every_parent() {
    assert_eq!(compile_css(".a, .b { .c { x: 1 } }"), ".a .c,.b .c{x:1}");
    assert_eq!(compile_css(".a { > .b, + .c { x: 1 } }"), ".a>.b,.a+.c{x:1}");
}

#[test]
fn should_join_ampersand_suffixes() {
    assert_eq!(compile_css(".btn { &-primary { color: red } }"), ".btn-primary{color:red}");
}

#[test]
fn should_wrap_parents_in_nested_media_queries() {
    assert_eq!(
        compile_css(".a { color: red; @media (max-width: 600px) { color: blue } }"),
        ".a{color:red}@media (max-width:600px){.a{color:blue}}"
    );
}

#[test]
fn should_keep_top_level_media_queries() {
    assert_eq!(
        compile_css("@media print { .a { display: none } }"),
        "@media print{.a{display:none}}"
    );
}

#[test]
fn should_keep_keyframes_untouched() {
    assert_eq!(
        compile_css("@keyframes spin { from { transform: rotate(0) } to { transform: rotate(360deg) } }"),
        "@keyframes spin{from{transform:rotate(0)}to{transform:rotate(360deg)}}"
    );
}

#[test]
fn should_keep_statement_at_rules() {
    assert_eq!(
        compile_css("@import url(\"a.css\");\n.a { color: red }"),
        "@import url(\"a.css\");.a{color:red}"
    );
}

#[test]
fn should_strip_comments_and_empty_rules() {
    assert_eq!(compile_css("/* x { */ .a { color: red }"), ".a{color:red}");
    assert_eq!(compile_css(".a {} .b { color: red }"), ".b{color:red}");
}

#[test]
fn should_preserve_strings() {
    assert_eq!(
        compile_css(".a::after { content: \"a  b;\" }"),
        ".a::after{content:\"a  b;\"}"
    );
}

#[test]
fn should_build_a_nested_tree_before_resolution() {
    let sheet = css_to_ast(".a { color: red; .b { } }").unwrap();
    assert_eq!(sheet.nodes.len(), 1);
    let StyleNode::Rule(rule) = &sheet.nodes[0] else {
        panic!("expected a rule");
    };
    assert_eq!(rule.selectors, vec![".a"]);
    assert_eq!(rule.children.len(), 1);
    assert_eq!(rule_selectors(&rule.children[0]), vec![".b"]);
}

#[test]
fn should_reject_unbalanced_braces() {
    assert!(matches!(
        css_to_ast(".a { .b { color: red }"),
        Err(StyleError::UnbalancedBraces { .. })
    ));
}
