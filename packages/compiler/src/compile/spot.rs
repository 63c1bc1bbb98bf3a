//! Spots
//!
//! A spot is a deferred runtime binding: "at reference N, install binding B
//! for expression E". The visitor records spots while it walks the markup;
//! they are rendered to code only when the component is generated, once the
//! set of reactive identifiers is known.

use bitflags::bitflags;
use indexmap::IndexSet;

use super::emitter::{escape_template_literal, property_key, quote_string, EmitterContext};
use crate::config::Generate;
use crate::expression_parser::Expression;
use crate::ml_parser::{ForLoop, InterpolationPart};

bitflags! {
    /// `@event.modifier` flags, passed to the runtime as one integer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EventModifiers: u8 {
        const PREVENT = 1;
        const STOP = 1 << 1;
        const ONCE = 1 << 2;
        const CAPTURE = 1 << 3;
        const PASSIVE = 1 << 4;
        const SELF = 1 << 5;
    }
}

impl EventModifiers {
    /// Flag for a lowercase `@event.modifier` name.
    pub fn from_modifier(name: &str) -> Option<Self> {
        match name {
            "prevent" => Some(Self::PREVENT),
            "stop" => Some(Self::STOP),
            "once" => Some(Self::ONCE),
            "capture" => Some(Self::CAPTURE),
            "passive" => Some(Self::PASSIVE),
            "self" => Some(Self::SELF),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spot {
    /// Reference slot the binding is installed on.
    pub reference: Option<u32>,
    /// Index of the static block this spot precedes.
    pub position: usize,
    pub kind: SpotKind,
}

#[derive(Debug, Clone)]
pub enum SpotKind {
    Text {
        expression: Expression,
        html: bool,
    },
    Script {
        statements: Vec<String>,
    },
    Class {
        value: Vec<InterpolationPart>,
        toggles: Vec<(String, Expression)>,
    },
    Style {
        value: Vec<InterpolationPart>,
        properties: Vec<(String, Expression)>,
    },
    Attribute {
        name: String,
        value: Vec<InterpolationPart>,
    },
    Event {
        name: String,
        handler: Expression,
        modifiers: EventModifiers,
    },
    Bind {
        property: String,
        target: Expression,
    },
    Ref {
        target: Expression,
    },
    Action {
        name: String,
        params: Option<Expression>,
    },
    Conditional {
        branches: Vec<Branch>,
    },
    Each {
        header: ForLoop,
        body: Frame,
    },
    Slot {
        name: String,
        fallback: Option<Frame>,
    },
    Invoke {
        component: String,
        props: Vec<Prop>,
        slots: Vec<(String, Frame)>,
    },
}

/// One arm of an if/elseif/else chain. `None` is the `else` arm.
#[derive(Debug, Clone)]
pub struct Branch {
    pub condition: Option<Expression>,
    pub body: Frame,
}

/// A property passed to a component invocation.
#[derive(Debug, Clone)]
pub enum Prop {
    Value {
        name: String,
        value: Vec<InterpolationPart>,
    },
    Event {
        name: String,
        handler: Expression,
    },
    Bind {
        name: String,
        target: Expression,
    },
}

/// One piece of static markup. A constant is an expression without free
/// identifiers, evaluated where the markup string is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Html(String),
    /// Escaped unless `raw`.
    Constant { code: String, raw: bool },
}

/// Static markup between two spots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub pieces: Vec<Markup>,
}

impl Block {
    fn push(&mut self, piece: Markup) {
        if let (Some(Markup::Html(last)), Markup::Html(html)) = (self.pieces.last_mut(), &piece) {
            last.push_str(html);
            return;
        }
        self.pieces.push(piece);
    }

    fn is_blank(&self) -> bool {
        self.pieces
            .iter()
            .all(|p| matches!(p, Markup::Html(html) if html.trim().is_empty()))
    }

    /// JS string expression for the markup: a plain string literal, or a
    /// template literal when constants are evaluated in place.
    pub fn to_js(&self) -> String {
        if self.pieces.iter().all(|p| matches!(p, Markup::Html(_))) {
            let html: String = self
                .pieces
                .iter()
                .filter_map(|p| match p {
                    Markup::Html(html) => Some(html.as_str()),
                    Markup::Constant { .. } => None,
                })
                .collect();
            return quote_string(&html);
        }
        let mut out = String::from("`");
        for piece in &self.pieces {
            match piece {
                Markup::Html(html) => out.push_str(&escape_template_literal(html)),
                Markup::Constant { code, raw: true } => out.push_str(&format!("${{{}}}", code)),
                Markup::Constant { code, raw: false } => {
                    out.push_str(&format!("${{$.escape({})}}", code))
                }
            }
        }
        out.push('`');
        out
    }
}

/// Static markup and spots of one render scope: a component body, a branch,
/// a loop body or slot content.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub blocks: Vec<Block>,
    pub spots: Vec<Spot>,
    sealed: bool,
}

impl Frame {
    pub fn push_html(&mut self, html: &str) {
        if !html.is_empty() {
            self.push_markup(Markup::Html(html.to_string()));
        }
    }

    pub fn push_constant(&mut self, code: &str, raw: bool) {
        self.push_markup(Markup::Constant {
            code: code.to_string(),
            raw,
        });
    }

    fn push_markup(&mut self, piece: Markup) {
        match self.blocks.last_mut() {
            Some(last) if !self.sealed => last.push(piece),
            _ => {
                let mut block = Block::default();
                block.push(piece);
                self.blocks.push(block);
                self.sealed = false;
            }
        }
    }

    pub fn push_spot(&mut self, reference: Option<u32>, kind: SpotKind) {
        self.spots.push(Spot {
            reference,
            position: self.blocks.len(),
            kind,
        });
        self.sealed = true;
    }

    /// All blocks of the frame joined into one.
    pub fn markup(&self) -> Block {
        let mut merged = Block::default();
        for piece in self.blocks.iter().flat_map(|b| &b.pieces) {
            merged.push(piece.clone());
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty() && self.blocks.iter().all(Block::is_blank)
    }
}

/// Renders frames and spots for one target. `reactive` holds the identifiers
/// whose bindings must be re-evaluated.
pub struct SpotRenderer {
    generate: Generate,
    reactive: IndexSet<String>,
}

impl SpotRenderer {
    pub fn new(generate: Generate, reactive: IndexSet<String>) -> Self {
        SpotRenderer { generate, reactive }
    }

    pub fn is_reactive(&self, expression: &Expression) -> bool {
        expression
            .dependencies
            .iter()
            .any(|d| self.reactive.contains(d))
    }

    fn parts_reactive(&self, parts: &[InterpolationPart]) -> bool {
        parts.iter().any(|part| match part {
            InterpolationPart::Expression(interpolation) => {
                self.is_reactive(&interpolation.expression)
            }
            InterpolationPart::Literal(_) => false,
        })
    }

    /// Body statements of a component or nested render function.
    pub fn render_body(&mut self, frame: &Frame, ctx: &mut EmitterContext) {
        match self.generate {
            Generate::Csr => {
                ctx.println(&format!("const $node = $.template({});", frame.markup().to_js()));
                if frame.spots.iter().any(|s| s.reference.is_some()) {
                    ctx.println("const $refs = $.refs($node);");
                }
                for spot in &frame.spots {
                    self.render_spot(spot, ctx);
                }
                ctx.println("return $node;");
            }
            Generate::Ssr => {
                ctx.println("let $html = \"\";");
                self.render_statements(frame, ctx);
                ctx.println("return $html;");
            }
        }
    }

    /// String-building statements of a frame, spots interleaved with static
    /// blocks by position.
    fn render_statements(&mut self, frame: &Frame, ctx: &mut EmitterContext) {
        let mut spots = frame.spots.iter().peekable();
        for (index, block) in frame.blocks.iter().enumerate() {
            while let Some(spot) = spots.next_if(|s| s.position <= index) {
                self.render_spot(spot, ctx);
            }
            ctx.println(&format!("$html += {};", block.to_js()));
        }
        for spot in spots {
            self.render_spot(spot, ctx);
        }
    }

    fn render_spot(&mut self, spot: &Spot, ctx: &mut EmitterContext) {
        let target = spot
            .reference
            .map(|r| format!("$refs[{}]", r))
            .unwrap_or_else(|| "$node".to_string());
        match self.generate {
            Generate::Csr => self.render_csr(&target, &spot.kind, ctx),
            Generate::Ssr => self.render_ssr(&spot.kind, ctx),
        }
    }

    fn render_csr(&mut self, target: &str, kind: &SpotKind, ctx: &mut EmitterContext) {
        match kind {
            SpotKind::Text { expression, html } => {
                let call = runtime_call(if *html { "html" } else { "text" }, self.is_reactive(expression));
                ctx.println(&format!(
                    "$.{}({}, {});",
                    call,
                    target,
                    thunk(&expression.code, self.is_reactive(expression))
                ));
            }
            SpotKind::Script { statements } => {
                for statement in statements {
                    ctx.print_statement(statement);
                }
            }
            SpotKind::Class { value, toggles } => {
                let reactive = self.parts_reactive(value) || toggles.iter().any(|(_, e)| self.is_reactive(e));
                let list = combined_list(value, toggles);
                ctx.println(&format!(
                    "$.{}({}, {});",
                    runtime_call("class", reactive),
                    target,
                    thunk(&list, reactive)
                ));
            }
            SpotKind::Style { value, properties } => {
                let reactive =
                    self.parts_reactive(value) || properties.iter().any(|(_, e)| self.is_reactive(e));
                let list = combined_list(value, properties);
                ctx.println(&format!(
                    "$.{}({}, {});",
                    runtime_call("style", reactive),
                    target,
                    thunk(&list, reactive)
                ));
            }
            SpotKind::Attribute { name, value } => {
                let reactive = self.parts_reactive(value);
                ctx.println(&format!(
                    "$.{}({}, {}, {});",
                    runtime_call("attr", reactive),
                    target,
                    quote_string(name),
                    thunk(&parts_value(value), reactive)
                ));
            }
            SpotKind::Event {
                name,
                handler,
                modifiers,
            } => {
                let flags = if modifiers.is_empty() {
                    String::new()
                } else {
                    format!(", {}", modifiers.bits())
                };
                ctx.println(&format!(
                    "$.event({}, {}, {}{});",
                    target,
                    quote_string(name),
                    event_handler(handler),
                    flags
                ));
            }
            SpotKind::Bind { property, target: bound } => {
                ctx.println(&format!(
                    "$.bind({}, {}, () => {}, ($value) => {{ {} = $value; }});",
                    target,
                    quote_string(property),
                    bound.code,
                    bound.code
                ));
            }
            SpotKind::Ref { target: bound } => {
                ctx.println(&format!(
                    "$.ref({}, ($node) => {{ {} = $node; }});",
                    target, bound.code
                ));
            }
            SpotKind::Action { name, params } => match params {
                Some(params) => ctx.println(&format!(
                    "$.action({}, {}, () => {});",
                    target,
                    name,
                    wrap_object(&params.code)
                )),
                None => ctx.println(&format!("$.action({}, {});", target, name)),
            },
            SpotKind::Conditional { branches } => {
                let reactive = branches
                    .iter()
                    .filter_map(|b| b.condition.as_ref())
                    .any(|c| self.is_reactive(c));
                ctx.println(&format!("$.{}({}, [", runtime_call("conditional", reactive), target));
                ctx.inc_indent();
                for branch in branches {
                    let condition = branch
                        .condition
                        .as_ref()
                        .map(|c| thunk(&c.code, reactive))
                        .unwrap_or_else(|| "null".to_string());
                    ctx.println(&format!("[{}, () => {{", condition));
                    ctx.inc_indent();
                    self.render_body(&branch.body, ctx);
                    ctx.dec_indent();
                    ctx.println("}],");
                }
                ctx.dec_indent();
                ctx.println("]);");
            }
            SpotKind::Each { header, body } => {
                let reactive = self.is_reactive(&header.iterable);
                let params = loop_params(header);
                ctx.println(&format!(
                    "$.{}({}, {}, ({}) => {{",
                    runtime_call("each", reactive),
                    target,
                    thunk(&header.iterable.code, reactive),
                    params
                ));
                ctx.inc_indent();
                self.with_loop_scope(header, reactive, |renderer| renderer.render_body(body, ctx));
                ctx.dec_indent();

                let mut options = Vec::new();
                if let Some(key) = &header.key {
                    options.push(format!("key: ({}) => {}", params, wrap_object(&key.code)));
                }
                if let Some(guard) = &header.guard {
                    options.push(format!("filter: ({}) => {}", params, wrap_object(&guard.code)));
                }
                if options.is_empty() {
                    ctx.println("});");
                } else {
                    ctx.println(&format!("}}, {{ {} }});", options.join(", ")));
                }
            }
            SpotKind::Slot { name, fallback } => match fallback {
                Some(fallback) => {
                    ctx.println(&format!("$.slot({}, $props, {}, () => {{", target, quote_string(name)));
                    ctx.inc_indent();
                    self.render_body(fallback, ctx);
                    ctx.dec_indent();
                    ctx.println("});");
                }
                None => ctx.println(&format!("$.slot({}, $props, {}, null);", target, quote_string(name))),
            },
            SpotKind::Invoke {
                component,
                props,
                slots,
            } => {
                let props = self.props_object(props);
                if slots.is_empty() {
                    ctx.println(&format!("$.component({}, {}, {}, {{}});", target, component, props));
                    return;
                }
                ctx.println(&format!("$.component({}, {}, {}, {{", target, component, props));
                self.render_slot_functions(slots, ctx);
                ctx.println("});");
            }
        }
    }

    fn render_ssr(&mut self, kind: &SpotKind, ctx: &mut EmitterContext) {
        match kind {
            SpotKind::Text { expression, html } => {
                let call = if *html { "raw" } else { "escape" };
                ctx.println(&format!("$html += $.{}({});", call, expression.code));
            }
            SpotKind::Script { statements } => {
                for statement in statements {
                    ctx.print_statement(statement);
                }
            }
            SpotKind::Class { value, toggles } => {
                ctx.println(&format!("$html += $.class({});", combined_list(value, toggles)));
            }
            SpotKind::Style { value, properties } => {
                ctx.println(&format!("$html += $.style({});", combined_list(value, properties)));
            }
            SpotKind::Attribute { name, value } => {
                ctx.println(&format!(
                    "$html += $.attr({}, {});",
                    quote_string(name),
                    parts_value(value)
                ));
            }
            SpotKind::Bind { property, target } => {
                ctx.println(&format!(
                    "$html += $.attr({}, {});",
                    quote_string(property),
                    target.code
                ));
            }
            SpotKind::Event { .. } | SpotKind::Ref { .. } | SpotKind::Action { .. } => {}
            SpotKind::Conditional { branches } => {
                for (index, branch) in branches.iter().enumerate() {
                    let head = match (&branch.condition, index) {
                        (Some(condition), 0) => format!("if ({}) {{", condition.code),
                        (Some(condition), _) => format!("}} else if ({}) {{", condition.code),
                        (None, _) => "} else {".to_string(),
                    };
                    ctx.println(&head);
                    ctx.inc_indent();
                    self.render_statements(&branch.body, ctx);
                    ctx.dec_indent();
                }
                if !branches.is_empty() {
                    ctx.println("}");
                }
            }
            SpotKind::Each { header, body } => {
                let index = header.index.as_deref().unwrap_or("$index");
                ctx.println(&format!(
                    "for (const [{}, {}] of $.iterate({})) {{",
                    header.item, index, header.iterable.code
                ));
                ctx.inc_indent();
                if let Some(guard) = &header.guard {
                    ctx.println(&format!("if (!({})) continue;", guard.code));
                }
                let reactive = self.is_reactive(&header.iterable);
                self.with_loop_scope(header, reactive, |renderer| {
                    renderer.render_statements(body, ctx)
                });
                ctx.dec_indent();
                ctx.println("}");
            }
            SpotKind::Slot { name, fallback } => match fallback {
                Some(fallback) => {
                    ctx.println(&format!("$html += $.slot($props, {}, () => {{", quote_string(name)));
                    ctx.inc_indent();
                    self.render_body(fallback, ctx);
                    ctx.dec_indent();
                    ctx.println("});");
                }
                None => ctx.println(&format!("$html += $.slot($props, {}, null);", quote_string(name))),
            },
            SpotKind::Invoke {
                component,
                props,
                slots,
            } => {
                let mut entries = self.prop_entries(props);
                if slots.is_empty() {
                    ctx.println(&format!("$html += {}({});", component, object_literal(&entries)));
                    return;
                }
                entries.push("$slots: {".to_string());
                let head = format!("$html += {}({{ {}", component, entries.join(", "));
                ctx.println(&head);
                self.render_slot_functions(slots, ctx);
                ctx.println("} });");
            }
        }
    }

    fn render_slot_functions(&mut self, slots: &[(String, Frame)], ctx: &mut EmitterContext) {
        ctx.inc_indent();
        for (name, frame) in slots {
            ctx.println(&format!("{}: () => {{", property_key(name)));
            ctx.inc_indent();
            self.render_body(frame, ctx);
            ctx.dec_indent();
            ctx.println("},");
        }
        ctx.dec_indent();
    }

    /// Object literal of component props. Reactive values become getters so
    /// the child reads the current value.
    fn props_object(&self, props: &[Prop]) -> String {
        object_literal(&self.prop_entries(props))
    }

    fn prop_entries(&self, props: &[Prop]) -> Vec<String> {
        props
            .iter()
            .map(|prop| match prop {
                Prop::Value { name, value } if value.is_empty() => {
                    format!("{}: true", property_key(name))
                }
                Prop::Value { name, value } if self.parts_reactive(value) => {
                    format!("get {}() {{ return {}; }}", property_key(name), parts_value(value))
                }
                Prop::Value { name, value } => {
                    format!("{}: {}", property_key(name), parts_value(value))
                }
                Prop::Event { name, handler } => {
                    format!("{}: {}", property_key(&format!("on{}", name)), event_handler(handler))
                }
                Prop::Bind { name, target } => format!(
                    "get {0}() {{ return {1}; }}, set {0}($value) {{ {1} = $value; }}",
                    property_key(name),
                    target.code
                ),
            })
            .collect()
    }

    /// Runs `f` with the loop bindings marked reactive when the iterable is,
    /// and shadowed otherwise.
    fn with_loop_scope<F>(&mut self, header: &ForLoop, reactive: bool, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let saved = self.reactive.clone();
        for name in std::iter::once(&header.item).chain(header.index.as_ref()) {
            if reactive {
                self.reactive.insert(name.clone());
            } else {
                self.reactive.shift_remove(name);
            }
        }
        f(self);
        self.reactive = saved;
    }
}

fn object_literal(entries: &[String]) -> String {
    if entries.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", entries.join(", "))
    }
}

/// `text` for a resolved value, `Text` for a thunk.
fn runtime_call(name: &str, reactive: bool) -> String {
    if !reactive {
        return name.to_string();
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn thunk(code: &str, reactive: bool) -> String {
    if reactive {
        format!("() => {}", wrap_object(code))
    } else {
        code.to_string()
    }
}

/// Parenthesizes an object literal so it reads as an arrow-function result.
fn wrap_object(code: &str) -> String {
    if code.starts_with('{') {
        format!("({})", code)
    } else {
        code.to_string()
    }
}

fn loop_params(header: &ForLoop) -> String {
    match &header.index {
        Some(index) => format!("{}, {}", header.item, index),
        None => header.item.clone(),
    }
}

/// Identifiers, member paths and functions are handlers already. Anything
/// else runs as the body of one.
pub fn event_handler(handler: &Expression) -> String {
    if handler.is_callable_reference() {
        handler.code.clone()
    } else {
        format!("($event) => {{ {}; }}", handler.code)
    }
}

/// JS value of an attribute: a string for literal text, the expression for a
/// single expression, a template literal for a mix.
pub fn parts_value(parts: &[InterpolationPart]) -> String {
    match parts {
        [] => quote_string(""),
        [InterpolationPart::Expression(interpolation)] => interpolation.expression.code.clone(),
        _ if parts.iter().all(|p| matches!(p, InterpolationPart::Literal(_))) => {
            let text: String = parts
                .iter()
                .filter_map(|p| match p {
                    InterpolationPart::Literal(text) => Some(text.as_str()),
                    InterpolationPart::Expression(_) => None,
                })
                .collect();
            quote_string(&text)
        }
        _ => {
            let mut out = String::from("`");
            for part in parts {
                match part {
                    InterpolationPart::Literal(text) => out.push_str(&escape_template_literal(text)),
                    InterpolationPart::Expression(interpolation) => {
                        out.push_str("${");
                        out.push_str(&interpolation.expression.code);
                        out.push('}');
                    }
                }
            }
            out.push('`');
            out
        }
    }
}

/// `[base, { key: expr }]` as accepted by the class and style setters.
fn combined_list(value: &[InterpolationPart], entries: &[(String, Expression)]) -> String {
    let mut items = Vec::new();
    if !value.is_empty() {
        items.push(parts_value(value));
    }
    if !entries.is_empty() {
        let pairs: Vec<String> = entries
            .iter()
            .map(|(key, expression)| format!("{}: {}", quote_string(key), expression.code))
            .collect();
        items.push(format!("{{ {} }}", pairs.join(", ")));
    }
    format!("[{}]", items.join(", "))
}
