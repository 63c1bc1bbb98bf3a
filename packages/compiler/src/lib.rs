#![deny(clippy::all)]

/**
 * Tessera Template Compiler
 *
 * Compiles HTML-like component templates with embedded script, style,
 * control-flow blocks and curly-brace bindings into a JS module and a
 * scoped stylesheet.
 *
 * Pipeline: markup parser, transform passes (Types, Parsers, Blocks,
 * Attributes, Texts), compile visitor, template aggregator.
 */
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

pub mod chars;
pub mod compile;
pub mod config;
pub mod error;
pub mod expression_parser;
pub mod ml_parser;
pub mod parse_util;
pub mod style;
pub mod transform;
mod version;

pub use compile::{Component, Template, TemplateOutput};
pub use config::{CompilerOptions, CssCompile, Generate};
pub use error::{CompileError, Result};
pub use ml_parser::{Document, ParseOptions};
pub use parse_util::{Diagnostics, ParseError, ParseErrorLevel};
pub use version::VERSION;

/// Output of one compile unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileResult {
    pub js: String,
    pub css: String,
    /// Accumulated parse, typing and configuration diagnostics.
    pub errors: Vec<ParseError>,
}

impl CompileResult {
    pub fn has_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.level == ParseErrorLevel::Error)
    }
}

/// Parses and transforms `source` without generating code.
pub fn parse(source: &str, options: &CompilerOptions, diagnostics: &mut Diagnostics) -> Result<Document> {
    let mut doc = ml_parser::parse(source, &ParseOptions::from(options), diagnostics);
    transform::transform(&mut doc, diagnostics)?;
    Ok(doc)
}

/// Compiles one template into `{ js, css }` plus its diagnostics.
pub fn compile(source: &str, options: &CompilerOptions) -> Result<CompileResult> {
    options.validate()?;
    let mut diagnostics = Diagnostics::new();

    debug!("parsing {} ({} bytes)", options.name, source.len());
    let doc = parse(source, options, &mut diagnostics)?;

    debug!("generating {}", options.name);
    let mut template = Template::new(options.clone());
    template.compile_document(&doc, &mut diagnostics);
    let output = template.generate().clone();

    Ok(CompileResult {
        js: output.js,
        css: output.css,
        errors: diagnostics.into_vec(),
    })
}

/// Compiles independent templates in parallel. Each `(name, source)` pair
/// becomes its own unit, named after its root component.
pub fn compile_batch(
    sources: &[(String, String)],
    options: &CompilerOptions,
) -> Vec<(String, Result<CompileResult>)> {
    sources
        .par_iter()
        .map(|(name, source)| {
            let options = options.clone().with_name(name.clone());
            (name.clone(), compile(source, &options))
        })
        .collect()
}
