//! Template
//!
//! Aggregates the components of one source file into a single output unit.
//! Imports bubble up here and are emitted once; scoping hashes are assigned
//! here so no two different stylesheets share one.

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use serde::Serialize;

use super::component::Component;
use super::visitor::CompileVisitor;
use crate::config::{CompilerOptions, CssCompile};
use crate::expression_parser::generate_code;
use crate::ml_parser::{Document, NodeId, NodeType};
use crate::parse_util::Diagnostics;
use crate::style::content_hash;

/// Import statements deduplicated by their normalized code.
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    entries: IndexSet<String>,
}

impl ImportSet {
    pub fn add(&mut self, import: &str, typescript: bool) {
        let code = generate_code(import, typescript).unwrap_or_else(|_| import.trim().to_string());
        self.entries.insert(code);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateOutput {
    pub js: String,
    pub css: String,
}

#[derive(Debug, Clone)]
pub struct Template {
    options: CompilerOptions,
    imports: ImportSet,
    components: Vec<Component>,
    /// Scoping hash to the unscoped CSS it was derived from.
    styles: IndexMap<String, String>,
    output: Option<TemplateOutput>,
}

impl Template {
    pub fn new(options: CompilerOptions) -> Self {
        Template {
            options,
            imports: ImportSet::default(),
            components: Vec::new(),
            styles: IndexMap::new(),
            output: None,
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn imports(&self) -> &ImportSet {
        &self.imports
    }

    /// Registers the root component and one component per `@name` fragment,
    /// in document order.
    pub fn compile_document(&mut self, doc: &Document, diagnostics: &mut Diagnostics) {
        let name = self.options.name.clone();
        self.add_component(doc, NodeId::ROOT, name, true, diagnostics);

        for id in doc.walk() {
            let node = doc.node(id);
            if node.ty != NodeType::Fragment {
                continue;
            }
            let Some(name) = node.params.fragment.clone() else {
                continue;
            };
            if self.component(&name).is_some() {
                diagnostics.add_error(
                    format!("Duplicate component name \"{}\"", name),
                    node.position.and_then(|p| p.loc),
                );
                continue;
            }
            self.add_component(doc, id, name, false, diagnostics);
        }
    }

    pub fn add_component(
        &mut self,
        doc: &Document,
        root: NodeId,
        name: String,
        is_default: bool,
        diagnostics: &mut Diagnostics,
    ) {
        let mut component = Component::new(name, root);
        component.is_default = is_default;
        component.analyze(doc, self.options.generate);

        let css = component.style_text();
        if !css.is_empty() {
            let (hash, lengthened) = self.register_style(&css);
            if lengthened {
                component.changed_style_hashes.push(hash.clone());
            }
            component.style_hash = Some(hash);
        }

        CompileVisitor::new(
            doc,
            &self.options,
            &mut component,
            &mut self.imports,
            diagnostics,
        )
        .compile_component();
        self.components.push(component);
    }

    /// Shortest prefix of the content hash, within the configured bounds,
    /// not already taken by a different stylesheet. Returns the hash and
    /// whether it had to grow past the minimum length.
    pub fn register_style(&mut self, css: &str) -> (String, bool) {
        let full = content_hash(css);
        let min = self.options.css.hash.min.max(1);
        let max = self.options.css.hash.max.max(min);

        for len in min..=max {
            let hash = prefix(&full, len);
            match self.styles.get(&hash) {
                Some(existing) if existing != css => continue,
                Some(_) => return (hash, len > min),
                None => {
                    if len > min {
                        warn!("style hash lengthened to {} to avoid a collision", hash);
                    }
                    self.styles.insert(hash.clone(), css.to_string());
                    return (hash, len > min);
                }
            }
        }

        let hash = prefix(&full, max);
        warn!("style hash {} still collides at the maximum length", hash);
        (hash, true)
    }

    /// Builds `{ js, css }`. Runs once; later calls return the same output.
    pub fn generate(&mut self) -> &TemplateOutput {
        let output = match self.output.take() {
            Some(output) => output,
            None => {
                debug!("generating {} component(s)", self.components.len());
                self.render()
            }
        };
        self.output.insert(output)
    }

    fn render(&mut self) -> TemplateOutput {
        let generate = self.options.generate;
        let mut sections = vec![format!("import * as $ from \"{}\";", self.options.runtime)];
        sections.extend(self.imports.iter().map(str::to_string));
        let header = sections.join("\n");

        let mut bodies = Vec::with_capacity(self.components.len());
        let mut default_name = None;
        for component in &mut self.components {
            bodies.push(component.generate(generate).to_string());
            if component.is_default && default_name.is_none() {
                default_name = Some(component.name.clone());
            }
        }

        let mut js = header;
        for body in bodies {
            js.push_str("\n\n");
            js.push_str(&body);
        }
        if let Some(name) = default_name {
            js.push_str(&format!("\n\nexport default {};", name));
        }
        js.push('\n');

        let mut css = String::new();
        if self.options.css.compile == CssCompile::External {
            let mut seen = IndexSet::new();
            for component in &self.components {
                let Some(hash) = &component.style_hash else {
                    continue;
                };
                if seen.insert(hash.clone()) {
                    css.push_str(&component.scoped_style_text());
                }
            }
        }

        TemplateOutput { js, css }
    }
}

fn prefix(hash: &str, len: usize) -> String {
    hash.chars().take(len).collect()
}
