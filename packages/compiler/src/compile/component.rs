//! Component
//!
//! Codegen-time aggregate for one component: the root template or a
//! `@name` fragment. Owns its reference counter, render frames, script,
//! exports, style and reactivity facts. `generate` renders it once.

use indexmap::IndexSet;
use log::trace;

use super::emitter::EmitterContext;
use super::spot::{Block, Frame, Spot, SpotKind, SpotRenderer};
use crate::config::Generate;
use crate::expression_parser::{Expression, ExpressionKind};
use crate::ml_parser::{AttributeKind, Document, NodeId, NodeType};
use crate::style::{ast_to_css, scope_stylesheet, StyleSheet};

#[derive(Debug, Clone)]
pub struct Component {
    pub name: String,
    /// Node the component renders from: the document or a fragment element.
    pub root: NodeId,
    pub is_default: bool,
    reference_counter: u32,
    frames: Vec<Frame>,
    script: Option<Vec<String>>,
    pub exports: Vec<String>,
    /// Top-level `let`/`var` names of the component's scripts.
    pub declared: IndexSet<String>,
    pub updated_dependencies: IndexSet<String>,
    pub style: StyleSheet,
    pub style_hash: Option<String>,
    /// Hashes that had to grow past the minimum length to stay unique.
    pub changed_style_hashes: Vec<String>,
    generated: Option<String>,
}

impl Component {
    pub fn new(name: impl Into<String>, root: NodeId) -> Self {
        Component {
            name: name.into(),
            root,
            is_default: false,
            reference_counter: 0,
            frames: vec![Frame::default()],
            script: None,
            exports: Vec::new(),
            declared: IndexSet::new(),
            updated_dependencies: IndexSet::new(),
            style: StyleSheet::default(),
            style_hash: None,
            changed_style_hashes: Vec::new(),
            generated: None,
        }
    }

    /// Nodes owned by this component in document order. Nested fragments
    /// are components of their own and are not descended into.
    pub fn nodes(&self, doc: &Document) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.root != NodeId::ROOT {
            out.push(self.root);
        }
        let mut stack: Vec<NodeId> = doc.children(self.root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if doc.node(id).ty == NodeType::Fragment {
                continue;
            }
            stack.extend(doc.children(id).iter().rev());
        }
        out
    }

    /// Collects styles and reactivity facts before any code is emitted.
    /// An identifier is reactive when it is declared with `let`/`var` in a
    /// script and assigned in a script, an event handler or a bind/ref target.
    pub fn analyze(&mut self, doc: &Document, generate: Generate) {
        let mut assigned: IndexSet<String> = IndexSet::new();
        for id in self.nodes(doc) {
            let node = doc.node(id);
            if node.ty == NodeType::Fragment && id != self.root {
                continue;
            }
            match node.ty {
                NodeType::Script if targets(node.params.generate, generate) => {
                    if let Some(script) = &node.params.script {
                        self.declared.extend(script.declared.iter().cloned());
                        assigned.extend(script.assigned.iter().cloned());
                    }
                }
                NodeType::Style => {
                    if let Some(sheet) = &node.params.style {
                        self.style.nodes.extend(sheet.nodes.iter().cloned());
                    }
                }
                _ => {}
            }
            let Some(element) = node.as_element() else {
                continue;
            };
            for attribute in &element.attributes {
                let Some(expression) = attribute.single_expression() else {
                    continue;
                };
                match attribute.kind {
                    AttributeKind::Event => assigned.extend(expression.assigned.iter().cloned()),
                    AttributeKind::Bind | AttributeKind::Ref => {
                        assigned.extend(assignment_root(expression))
                    }
                    _ => {}
                }
            }
        }
        self.updated_dependencies = self
            .declared
            .iter()
            .filter(|name| assigned.contains(*name))
            .cloned()
            .collect();
    }

    pub fn allocate_reference(&mut self) -> u32 {
        let reference = self.reference_counter;
        self.reference_counter += 1;
        trace!("{}: reference {}", self.name, reference);
        reference
    }

    pub fn reference_count(&self) -> u32 {
        self.reference_counter
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        if self.frames.is_empty() {
            self.frames.push(Frame::default());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Starts collecting into a nested frame.
    pub fn push_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    pub fn pop_frame(&mut self) -> Frame {
        if self.frames.len() > 1 {
            self.frames.pop().unwrap_or_default()
        } else {
            Frame::default()
        }
    }

    pub fn push_html(&mut self, html: &str) {
        self.frame_mut().push_html(html);
    }

    pub fn push_constant(&mut self, code: &str, raw: bool) {
        self.frame_mut().push_constant(code, raw);
    }

    pub fn push_spot(&mut self, reference: Option<u32>, kind: SpotKind) {
        self.frame_mut().push_spot(reference, kind);
    }

    /// Static markup blocks of the top-level frame.
    pub fn blocks(&self) -> &[Block] {
        self.frames.first().map(|f| f.blocks.as_slice()).unwrap_or_default()
    }

    /// Spots of the top-level frame, in append order.
    pub fn spots(&self) -> &[Spot] {
        self.frames.first().map(|f| f.spots.as_slice()).unwrap_or_default()
    }

    pub fn script(&self) -> Option<&[String]> {
        self.script.as_deref()
    }

    /// The first script's statements become the component's primary script;
    /// later ones run where they appear, as script spots.
    pub fn add_script(&mut self, statements: Vec<String>) {
        if statements.iter().all(|s| s.trim().is_empty()) {
            return;
        }
        if self.script.is_none() {
            self.script = Some(statements);
        } else {
            self.push_spot(None, SpotKind::Script { statements });
        }
    }

    pub fn is_reactive(&self, expression: &Expression) -> bool {
        expression
            .dependencies
            .iter()
            .any(|d| self.updated_dependencies.contains(d))
    }

    /// Minified stylesheet before scoping.
    pub fn style_text(&self) -> String {
        ast_to_css(&self.style)
    }

    /// Minified stylesheet scoped to this component's hash.
    pub fn scoped_style_text(&self) -> String {
        match &self.style_hash {
            Some(hash) => ast_to_css(&scope_stylesheet(&self.style, hash)),
            None => String::new(),
        }
    }

    /// Module-level code of the component. Rendered on the first call; later
    /// calls return the same text.
    pub fn generate(&mut self, generate: Generate) -> &str {
        if self.generated.is_none() {
            let code = self.render(generate);
            self.generated = Some(code);
        }
        self.generated.as_deref().unwrap_or_default()
    }

    fn render(&self, generate: Generate) -> String {
        let mut ctx = EmitterContext::create_root();
        for export in &self.exports {
            ctx.print_statement(export);
        }
        ctx.println(&format!("export function {}($props = {{}}) {{", self.name));
        ctx.inc_indent();
        for statement in self.script.iter().flatten() {
            ctx.print_statement(statement);
        }
        let mut renderer = SpotRenderer::new(generate, self.updated_dependencies.clone());
        if let Some(frame) = self.frames.first() {
            renderer.render_body(frame, &mut ctx);
        }
        ctx.dec_indent();
        ctx.println("}");
        ctx.to_source()
    }
}

/// Whether a script tagged for `target` runs when generating `generate`.
pub fn targets(target: Option<Generate>, generate: Generate) -> bool {
    target.map_or(true, |t| t == generate)
}

/// Identifier a bind or ref target writes to.
fn assignment_root(expression: &Expression) -> Option<String> {
    match expression.kind {
        ExpressionKind::Identifier | ExpressionKind::Member => expression.dependencies.first().cloned(),
        _ => None,
    }
}
