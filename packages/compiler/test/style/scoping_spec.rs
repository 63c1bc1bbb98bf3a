//! Style Scoping Tests
//!
//! Selector rewriting that confines component styles to the component's
//! markup, and the content hashes the scope attribute carries.

mod utils;
use tessera_compiler::style::{content_hash, scope_selector, SCOPE_ATTRIBUTE};
use utils::{attr, scope_css};

#[test]
fn should_scope_rules_as_descendant_and_own_selectors() {
    assert_eq!(
        scope_css(".a { color: red }", "abc"),
        "[this=\"abc\"] .a,.a[this=\"abc\"]{color:red}"
    );
}

#[test]
fn should_scope_every_selector_of_a_list() {
    assert_eq!(
        scope_css("h1, .b { margin: 0 }", "h"),
        "[this=\"h\"] h1,h1[this=\"h\"],[this=\"h\"] .b,.b[this=\"h\"]{margin:0}"
    );
}

#[test]
fn should_put_the_attribute_on_the_first_compound() {
    assert_eq!(
        scope_selector("ul > li + li", &attr("h")),
        vec!["[this=\"h\"] ul > li + li", "ul[this=\"h\"] > li + li"]
    );
    assert_eq!(
        scope_css("ul > li + li { margin: 0 }", "h"),
        "[this=\"h\"] ul>li+li,ul[this=\"h\"]>li+li{margin:0}"
    );
}

#[test]
fn should_place_the_attribute_before_pseudo_elements() {
    assert_eq!(
        scope_selector("a:after", &attr("h")),
        vec!["[this=\"h\"] a:after", "a[this=\"h\"]:after"]
    );
    assert_eq!(
        scope_selector("p::first-line", &attr("h")),
        vec!["[this=\"h\"] p::first-line", "p[this=\"h\"]::first-line"]
    );
}

#[test]
fn should_leave_document_roots_and_globals_unscoped() {
    assert_eq!(scope_selector("html", &attr("h")), vec!["html"]);
    assert_eq!(
        scope_selector(":root .a", &attr("h")),
        vec![":root [this=\"h\"] .a", ":root .a[this=\"h\"]"]
    );
    assert_eq!(scope_selector(":global(.theme) .x", &attr("h")), vec![".theme .x"]);
}

#[test]
fn should_scope_rules_inside_media_queries() {
    assert_eq!(
        scope_css("@media print { .a { color: red } }", "h"),
        "@media print{[this=\"h\"] .a,.a[this=\"h\"]{color:red}}"
    );
}

#[test]
fn should_not_scope_keyframes() {
    assert_eq!(
        scope_css("@keyframes k { from { opacity: 0 } }", "h"),
        "@keyframes k{from{opacity:0}}"
    );
}

#[test]
fn should_scope_resolved_nesting() {
    assert_eq!(
        scope_css(".card { &:hover { color: blue } }", "h"),
        "[this=\"h\"] .card:hover,.card:hover[this=\"h\"]{color:blue}"
    );
}

#[test]
fn should_derive_stable_base36_hashes() {
    let hash = content_hash(".a{color:red}");
    assert_eq!(hash, content_hash(".a{color:red}"));
    assert_ne!(hash, content_hash(".a{color:blue}"));
    assert!(hash.len() >= 6);
    assert!(hash.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[test]
fn should_use_the_this_attribute() {
    assert_eq!(SCOPE_ATTRIBUTE, "this");
}
