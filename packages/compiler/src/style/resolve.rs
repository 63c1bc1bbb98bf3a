//! Nesting resolution
//!
//! Flattens nested rules into plain selector lists: `&` takes the parent
//! selector, other nested selectors become descendants, and conditional
//! at-rules nested in a rule wrap the parent selector.

use super::ast::{AtRule, StyleNode, StyleRule, StyleSheet};

pub fn resolve(sheet: &StyleSheet) -> StyleSheet {
    StyleSheet {
        nodes: flatten(&sheet.nodes, &[]),
    }
}

fn flatten(nodes: &[StyleNode], parents: &[String]) -> Vec<StyleNode> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            StyleNode::Rule(rule) => {
                let selectors = resolve_selectors(&rule.selectors, parents);
                out.push(StyleNode::Rule(StyleRule::new(
                    selectors.clone(),
                    rule.declarations.clone(),
                )));
                out.extend(flatten(&rule.children, &selectors));
            }
            StyleNode::AtRule(at_rule) if at_rule.is_conditional() => {
                let mut children = Vec::new();
                let mut declarations = at_rule.declarations.clone();
                if !parents.is_empty() {
                    children.push(StyleNode::Rule(StyleRule::new(
                        parents.to_vec(),
                        std::mem::take(&mut declarations),
                    )));
                }
                children.extend(flatten(&at_rule.children, parents));
                out.push(StyleNode::AtRule(AtRule {
                    name: at_rule.name.clone(),
                    params: at_rule.params.clone(),
                    declarations,
                    children,
                    has_block: at_rule.has_block,
                }));
            }
            StyleNode::AtRule(at_rule) => out.push(StyleNode::AtRule(at_rule.clone())),
        }
    }
    out
}

/// Expands `children` against every parent selector.
pub fn resolve_selectors(children: &[String], parents: &[String]) -> Vec<String> {
    if parents.is_empty() {
        return children
            .iter()
            .map(|child| child.replace('&', "").trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    let mut resolved = Vec::with_capacity(children.len() * parents.len());
    for parent in parents {
        for child in children {
            if child.contains('&') {
                resolved.push(child.replace('&', parent));
            } else {
                resolved.push(format!("{} {}", parent, child));
            }
        }
    }
    resolved
}
