//! ML Parser Tags
//!
//! Tag vocabularies: void elements, raw-text containers, the HTML/SVG element
//! set and the control-flow tags.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::ast::BlockKind;
use crate::chars;

/// Reserved attribute declaring an inline sub-template.
pub const FRAGMENT_ATTRIBUTE: &str = "@name";

static VOID_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect()
});

static RAW_TEXT_ELEMENTS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["script", "style", "template", "textarea"].into_iter().collect());

static HTML_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Document and sections
        "html", "head", "body", "title", "base", "link", "meta", "style", "script", "noscript",
        "template", "main", "header", "footer", "nav", "section", "article", "aside", "address",
        "h1", "h2", "h3", "h4", "h5", "h6", "hgroup", "search",
        // Grouping
        "div", "p", "hr", "pre", "blockquote", "ol", "ul", "li", "menu", "dl", "dt", "dd",
        "figure", "figcaption",
        // Text level
        "a", "em", "strong", "small", "s", "cite", "q", "dfn", "abbr", "ruby", "rt", "rp",
        "data", "time", "code", "var", "samp", "kbd", "sub", "sup", "i", "b", "u", "mark",
        "bdi", "bdo", "span", "br", "wbr", "ins", "del",
        // Embedded content
        "picture", "source", "img", "iframe", "embed", "object", "param", "video", "audio",
        "track", "map", "area", "canvas",
        // Tables
        "table", "caption", "colgroup", "col", "tbody", "thead", "tfoot", "tr", "td", "th",
        // Forms
        "form", "label", "input", "button", "select", "datalist", "optgroup", "option",
        "textarea", "output", "progress", "meter", "fieldset", "legend",
        // Interactive
        "details", "summary", "dialog",
    ]
    .into_iter()
    .collect()
});

static SVG_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "svg", "g", "defs", "desc", "symbol", "use", "image", "switch", "path", "rect",
        "circle", "ellipse", "line", "polyline", "polygon", "text", "tspan", "textPath",
        "marker", "pattern", "clipPath", "mask", "filter", "linearGradient", "radialGradient",
        "stop", "foreignObject", "animate", "animateMotion", "animateTransform", "set", "view",
        "feBlend", "feColorMatrix", "feComposite", "feFlood", "feGaussianBlur", "feImage",
        "feMerge", "feMergeNode", "feMorphology", "feOffset", "feTurbulence",
    ]
    .into_iter()
    .collect()
});

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(name.to_ascii_lowercase().as_str())
}

pub fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(name.to_ascii_lowercase().as_str())
}

/// Case-sensitive: `button` is an element, `Button` a component.
pub fn is_known_element(name: &str) -> bool {
    HTML_ELEMENTS.contains(name) || SVG_ELEMENTS.contains(name)
}

pub fn get_block_kind(name: &str) -> Option<BlockKind> {
    match name {
        "if" => Some(BlockKind::If),
        "elseif" => Some(BlockKind::Elseif),
        "else" => Some(BlockKind::Else),
        "for" => Some(BlockKind::For),
        "slot" => Some(BlockKind::Slot),
        "content" => Some(BlockKind::SlotContent),
        _ => None,
    }
}

/// Splits `@click.prevent` into (`Some('@')`, `"click"`, `Some(".prevent")`).
pub fn split_affix(name: &str) -> (Option<char>, String, Option<String>) {
    let mut rest = name;
    let mut prefix = None;
    if let Some(first) = name.chars().next() {
        if chars::AFFIX_PREFIXES.contains(&first) && name.len() > first.len_utf8() {
            prefix = Some(first);
            rest = &name[first.len_utf8()..];
        }
    }
    // The first character of the bare name never starts a suffix.
    match rest.char_indices().skip(1).find(|&(_, ch)| ch == chars::PERIOD) {
        Some((dot, _)) => (prefix, rest[..dot].to_string(), Some(rest[dot..].to_string())),
        None => (prefix, rest.to_string(), None),
    }
}
