//! Compile Visitor
//!
//! Walks the transformed markup of one component in document order and
//! fills its frames with static markup, reference markers and spots.
//! Dispatch is on `NodeType`; every type has an explicit arm.

use log::debug;

use super::component::{targets, Component};
use super::emitter::escape_attribute;
use super::spot::{Branch, EventModifiers, Frame, Prop, SpotKind};
use super::template::ImportSet;
use crate::config::{CompilerOptions, CssCompile};
use crate::ml_parser::{
    is_void_element, Attribute, AttributeKind, AttributeValue, BlockKind, BlockParams, Document,
    Element, InterpolationPart, NodeId, NodeKind, NodeType, TextContent,
};
use crate::parse_util::{Diagnostics, ParseSourceSpan};
use crate::style::SCOPE_ATTRIBUTE;
use crate::transform::blocks::DEFAULT_SLOT;

pub struct CompileVisitor<'a> {
    doc: &'a Document,
    options: &'a CompilerOptions,
    component: &'a mut Component,
    imports: &'a mut ImportSet,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> CompileVisitor<'a> {
    pub fn new(
        doc: &'a Document,
        options: &'a CompilerOptions,
        component: &'a mut Component,
        imports: &'a mut ImportSet,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        CompileVisitor {
            doc,
            options,
            component,
            imports,
            diagnostics,
        }
    }

    /// The document outlives the visitor, so nodes read through it stay
    /// borrowable while the component is mutated.
    fn doc(&self) -> &'a Document {
        self.doc
    }

    /// Compiles the component's whole markup.
    pub fn compile_component(&mut self) {
        debug!("compiling component {}", self.component.name);
        if self.options.css.compile == CssCompile::Injected {
            if let Some(hash) = self.component.style_hash.clone() {
                let css = self.component.scoped_style_text();
                if !css.is_empty() {
                    self.component.push_html(&format!(
                        "<style {}=\"{}\">{}</style>",
                        SCOPE_ATTRIBUTE, hash, css
                    ));
                }
            }
        }
        let root = self.component.root;
        if root == NodeId::ROOT {
            self.visit_children(root);
        } else {
            self.visit_element(root);
        }
    }

    pub fn visit(&mut self, id: NodeId) {
        let node = self.doc().node(id);
        match node.ty {
            NodeType::Document => self.visit_children(id),
            NodeType::Element => self.visit_element(id),
            // Fragments are compiled as components of their own.
            NodeType::Fragment => {}
            NodeType::Component => self.visit_invocation(id),
            NodeType::Script => self.visit_script(id),
            NodeType::Style => {}
            NodeType::Text => self.visit_text(id),
            NodeType::Comment => {
                if let NodeKind::Comment(comment) = &node.kind {
                    self.component.push_html(&format!("<!--{}-->", comment.content));
                }
            }
            NodeType::Block(BlockKind::If) => self.visit_if_chain(&[id]),
            NodeType::Block(kind @ (BlockKind::Elseif | BlockKind::Else)) => {
                self.warn(
                    format!("<{}> block without a preceding <if>", kind.tag()),
                    self.node_span(id),
                );
            }
            NodeType::Block(BlockKind::For) => self.visit_for(id),
            NodeType::Block(BlockKind::Slot) => self.visit_slot(id),
            NodeType::Block(BlockKind::SlotContent) => {
                self.warn(
                    "<content> block outside a component invocation".to_string(),
                    self.node_span(id),
                );
                self.visit_children(id);
            }
        }
    }

    /// Children in order. An `if` block gathers the `elseif`/`else` siblings
    /// that follow it, skipping blank text and comments between them.
    fn visit_children(&mut self, parent: NodeId) {
        let children = self.doc().children(parent);
        let mut i = 0;
        while i < children.len() {
            let id = children[i];
            if self.doc().node(id).ty != NodeType::Block(BlockKind::If) {
                self.visit(id);
                i += 1;
                continue;
            }
            let mut chain = vec![id];
            let mut next = i + 1;
            loop {
                let mut j = next;
                while j < children.len() && self.is_filler(children[j]) {
                    j += 1;
                }
                match children.get(j).map(|&c| self.doc().node(c).ty) {
                    Some(NodeType::Block(BlockKind::Elseif)) => {
                        chain.push(children[j]);
                        next = j + 1;
                    }
                    Some(NodeType::Block(BlockKind::Else)) => {
                        chain.push(children[j]);
                        next = j + 1;
                        break;
                    }
                    _ => break,
                }
            }
            self.visit_if_chain(&chain);
            i = next;
        }
    }

    fn is_filler(&self, id: NodeId) -> bool {
        let node = self.doc().node(id);
        node.ty == NodeType::Comment
            || match &node.kind {
                NodeKind::Text(text) => match &text.content {
                    TextContent::Raw(raw) => raw.trim().is_empty(),
                    TextContent::Parts(parts) => parts.iter().all(|p| match p {
                        InterpolationPart::Literal(text) => text.trim().is_empty(),
                        InterpolationPart::Expression(_) => false,
                    }),
                },
                _ => false,
            }
    }

    fn visit_element(&mut self, id: NodeId) {
        let node = self.doc().node(id);
        let Some(element) = node.as_element() else {
            return;
        };
        let needs_reference = node.params.reference
            || element
                .attributes
                .iter()
                .any(|a| a.kind != AttributeKind::Attribute || a.parts().iter().any(|p| p.is_dynamic()));
        let reference = needs_reference.then(|| self.component.allocate_reference());

        self.component.push_html(&format!("<{}", element.name));
        if self.is_scope_root(id) {
            if let Some(hash) = &self.component.style_hash {
                let scope = format!(" {}=\"{}\"", SCOPE_ATTRIBUTE, hash);
                self.component.push_html(&scope);
            }
        }
        if let Some(reference) = reference {
            self.component.push_html(&format!(" data-ref=\"{}\"", reference));
        }
        self.visit_attributes(element, reference);
        self.component.push_html(">");

        // Self-closed non-void tags still get a closing tag; the HTML parser
        // that builds the template ignores the slash.
        if is_void_element(&element.name) {
            return;
        }
        match &element.raw {
            Some(raw) => self.component.push_html(raw),
            None => self.visit_children(id),
        }
        self.component.push_html(&format!("</{}>", element.name));
    }

    /// Elements whose nearest enclosing tag, ignoring control blocks, is the
    /// component root. Fragment roots are their own scope root.
    fn is_scope_root(&self, id: NodeId) -> bool {
        if id == self.component.root {
            return true;
        }
        let mut current = self.doc().parent(id);
        while let Some(parent) = current {
            if parent == self.component.root {
                return true;
            }
            if !matches!(self.doc().node(parent).ty, NodeType::Block(_)) {
                return false;
            }
            current = self.doc().parent(parent);
        }
        false
    }

    fn visit_attributes(&mut self, element: &Element, reference: Option<u32>) {
        let has_modifier = |base: &str| {
            element
                .attributes
                .iter()
                .any(|a| a.kind == AttributeKind::Modifier && a.name == base)
        };
        let combine_class = has_modifier("class");
        let combine_style = has_modifier("style");

        let mut class_value = Vec::new();
        let mut class_toggles = Vec::new();
        let mut style_value = Vec::new();
        let mut style_properties = Vec::new();

        for attribute in &element.attributes {
            let span = attribute_span(attribute);
            match attribute.kind {
                AttributeKind::Attribute => {
                    let parts = attribute.parts();
                    let dynamic = parts.iter().any(|p| p.is_dynamic());
                    match attribute.name.as_str() {
                        "class" if dynamic || combine_class => class_value = parts.to_vec(),
                        "style" if dynamic || combine_style => style_value = parts.to_vec(),
                        _ if dynamic => self.component.push_spot(
                            reference,
                            SpotKind::Attribute {
                                name: attribute.name.clone(),
                                value: parts.to_vec(),
                            },
                        ),
                        _ => self.push_static_attribute(attribute),
                    }
                }
                AttributeKind::Modifier => {
                    let Some(expression) = attribute.single_expression() else {
                        self.warn(format!("`{}` needs a value", attribute.full_name()), span);
                        continue;
                    };
                    let modifiers = attribute.modifiers();
                    match attribute.name.as_str() {
                        "class" => class_toggles.extend(
                            modifiers
                                .iter()
                                .map(|m| (m.to_string(), expression.clone())),
                        ),
                        "style" => style_properties.push((modifiers.join("."), expression.clone())),
                        _ => self.warn(
                            format!("Unknown modifier attribute `{}`", attribute.full_name()),
                            span,
                        ),
                    }
                }
                AttributeKind::Event => {
                    let Some(handler) = attribute.single_expression() else {
                        self.warn(format!("`{}` needs a handler", attribute.full_name()), span);
                        continue;
                    };
                    let mut modifiers = EventModifiers::empty();
                    for name in attribute.modifiers() {
                        match EventModifiers::from_modifier(name) {
                            Some(flag) => modifiers |= flag,
                            None => self.warn(format!("Unknown event modifier `{}`", name), span),
                        }
                    }
                    self.component.push_spot(
                        reference,
                        SpotKind::Event {
                            name: attribute.name.clone(),
                            handler: handler.clone(),
                            modifiers,
                        },
                    );
                }
                AttributeKind::Bind => match attribute.single_expression() {
                    Some(target) => self.component.push_spot(
                        reference,
                        SpotKind::Bind {
                            property: attribute.name.clone(),
                            target: target.clone(),
                        },
                    ),
                    None => self.warn(format!("`{}` needs a target", attribute.full_name()), span),
                },
                AttributeKind::Ref => match attribute.single_expression() {
                    Some(target) => self.component.push_spot(
                        reference,
                        SpotKind::Ref {
                            target: target.clone(),
                        },
                    ),
                    None => self.warn(format!("`{}` needs a target", attribute.full_name()), span),
                },
                AttributeKind::Action => self.component.push_spot(
                    reference,
                    SpotKind::Action {
                        name: attribute.name.clone(),
                        params: attribute.single_expression().cloned(),
                    },
                ),
            }
        }

        if !class_value.is_empty() || !class_toggles.is_empty() {
            self.component.push_spot(
                reference,
                SpotKind::Class {
                    value: class_value,
                    toggles: class_toggles,
                },
            );
        }
        if !style_value.is_empty() || !style_properties.is_empty() {
            self.component.push_spot(
                reference,
                SpotKind::Style {
                    value: style_value,
                    properties: style_properties,
                },
            );
        }
    }

    fn push_static_attribute(&mut self, attribute: &Attribute) {
        let html = match &attribute.value {
            AttributeValue::Empty => format!(" {}", attribute.name),
            AttributeValue::Text { text, .. } => {
                format!(" {}=\"{}\"", attribute.name, escape_attribute(text))
            }
            AttributeValue::Parts { parts, .. } => {
                self.component.push_html(&format!(" {}=\"", attribute.name));
                for part in parts {
                    match part {
                        InterpolationPart::Literal(text) => {
                            self.component.push_html(&escape_attribute(text))
                        }
                        InterpolationPart::Expression(interpolation) => self
                            .component
                            .push_constant(&interpolation.expression.code, false),
                    }
                }
                "\"".to_string()
            }
        };
        self.component.push_html(&html);
    }

    fn visit_text(&mut self, id: NodeId) {
        let Some(text) = self.doc().node(id).as_text() else {
            return;
        };
        match &text.content {
            TextContent::Raw(raw) => self.component.push_html(raw),
            TextContent::Parts(parts) => {
                for part in parts {
                    match part {
                        InterpolationPart::Literal(literal) => self.component.push_html(literal),
                        InterpolationPart::Expression(interpolation)
                            if interpolation.expression.is_static =>
                        {
                            self.component
                                .push_constant(&interpolation.expression.code, interpolation.html)
                        }
                        InterpolationPart::Expression(interpolation) => {
                            let reference = self.anchor();
                            self.component.push_spot(
                                Some(reference),
                                SpotKind::Text {
                                    expression: interpolation.expression.clone(),
                                    html: interpolation.html,
                                },
                            );
                        }
                    }
                }
            }
        }
    }

    fn visit_script(&mut self, id: NodeId) {
        let node = self.doc().node(id);
        if !targets(node.params.generate, self.options.generate) {
            return;
        }
        let Some(script) = &node.params.script else {
            return;
        };
        for import in &script.imports {
            self.imports.add(import, script.typescript);
        }
        self.component.exports.extend(script.exports.iter().cloned());
        self.component.add_script(script.statements.clone());
    }

    fn visit_if_chain(&mut self, chain: &[NodeId]) {
        let reference = self.anchor();
        let mut branches = Vec::with_capacity(chain.len());
        for &id in chain {
            let condition = match &self.doc().node(id).params.block {
                Some(BlockParams::Condition(condition)) => Some(condition.clone()),
                _ => None,
            };
            branches.push(Branch {
                condition,
                body: self.collect_frame(id),
            });
        }
        self.component
            .push_spot(Some(reference), SpotKind::Conditional { branches });
    }

    fn visit_for(&mut self, id: NodeId) {
        let Some(BlockParams::Loop(header)) = &self.doc().node(id).params.block else {
            return;
        };
        let reference = self.anchor();
        let body = self.collect_frame(id);
        self.component.push_spot(
            Some(reference),
            SpotKind::Each {
                header: header.clone(),
                body,
            },
        );
    }

    fn visit_slot(&mut self, id: NodeId) {
        let name = match &self.doc().node(id).params.block {
            Some(BlockParams::Slot(name)) => name.clone(),
            _ => DEFAULT_SLOT.to_string(),
        };
        let reference = self.anchor();
        let body = self.collect_frame(id);
        let fallback = (!body.is_empty()).then_some(body);
        self.component
            .push_spot(Some(reference), SpotKind::Slot { name, fallback });
    }

    /// `<Card title="x">...</Card>`: props from attributes, slot functions
    /// from `<content>` blocks and the remaining children.
    fn visit_invocation(&mut self, id: NodeId) {
        let node = self.doc().node(id);
        let Some(element) = node.as_element() else {
            return;
        };
        let reference = self.anchor();

        let mut props = Vec::new();
        for attribute in &element.attributes {
            let span = attribute_span(attribute);
            match (attribute.kind, attribute.single_expression()) {
                (AttributeKind::Attribute, _) => props.push(Prop::Value {
                    name: attribute.name.clone(),
                    value: attribute.parts().to_vec(),
                }),
                (AttributeKind::Event, Some(handler)) => props.push(Prop::Event {
                    name: attribute.name.clone(),
                    handler: handler.clone(),
                }),
                (AttributeKind::Bind, Some(target)) => props.push(Prop::Bind {
                    name: attribute.name.clone(),
                    target: target.clone(),
                }),
                (AttributeKind::Ref, Some(target)) => self.component.push_spot(
                    Some(reference),
                    SpotKind::Ref {
                        target: target.clone(),
                    },
                ),
                _ => self.warn(
                    format!(
                        "`{}` is not supported on component <{}>",
                        attribute.full_name(),
                        element.name
                    ),
                    span,
                ),
            }
        }

        let mut slots = Vec::new();
        self.component.push_frame();
        for &child in self.doc().children(id) {
            let child_node = self.doc().node(child);
            if child_node.ty != NodeType::Block(BlockKind::SlotContent) {
                self.visit(child);
                continue;
            }
            let name = match &child_node.params.block {
                Some(BlockParams::Slot(name)) => name.clone(),
                _ => DEFAULT_SLOT.to_string(),
            };
            let frame = self.collect_frame(child);
            slots.push((name, frame));
        }
        let default = self.component.pop_frame();
        if !default.is_empty() {
            slots.insert(
                0,
                (
                    DEFAULT_SLOT.to_string(),
                    default,
                ),
            );
        }

        self.component.push_spot(
            Some(reference),
            SpotKind::Invoke {
                component: element.name.clone(),
                props,
                slots,
            },
        );
    }

    /// Compiles the children of `id` into a fresh frame.
    fn collect_frame(&mut self, id: NodeId) -> Frame {
        self.component.push_frame();
        self.visit_children(id);
        self.component.pop_frame()
    }

    /// Allocates a reference and emits its comment marker.
    fn anchor(&mut self) -> u32 {
        let reference = self.component.allocate_reference();
        self.component
            .push_html(&format!("<!--ref:{}-->", reference));
        reference
    }

    fn node_span(&self, id: NodeId) -> Option<ParseSourceSpan> {
        self.doc().node(id).position.and_then(|p| p.loc)
    }

    fn warn(&mut self, msg: String, span: Option<ParseSourceSpan>) {
        self.diagnostics.add_warning(msg, span);
    }
}

fn attribute_span(attribute: &Attribute) -> Option<ParseSourceSpan> {
    attribute.position.and_then(|p| p.loc)
}
