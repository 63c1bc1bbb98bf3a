//! Transform passes
//!
//! Rewrites the parsed markup tree in a fixed order:
//! Types, Parsers, Blocks, Attributes, Texts. Later passes rely on the
//! classification and extraction done by earlier ones. Every pass skips work
//! it already did, so running the sequence twice leaves the tree unchanged.

pub mod attributes;
pub mod blocks;
pub mod interpolation;
pub mod parsers;
pub mod texts;
pub mod types;

use log::debug;

use crate::error::Result;
use crate::expression_parser::ExpressionParser;
use crate::ml_parser::Document;
use crate::parse_util::Diagnostics;

pub use interpolation::{has_interpolation, parse_interpolation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Types,
    Parsers,
    Blocks,
    Attributes,
    Texts,
}

pub const PASSES: [Pass; 5] = [
    Pass::Types,
    Pass::Parsers,
    Pass::Blocks,
    Pass::Attributes,
    Pass::Texts,
];

/// Runs every pass in order.
pub fn transform(doc: &mut Document, diagnostics: &mut Diagnostics) -> Result<()> {
    let mut parser = ExpressionParser::new();
    for pass in PASSES {
        debug!("running {:?} pass", pass);
        match pass {
            Pass::Types => types::classify(doc, diagnostics),
            Pass::Parsers => {
                let typescript = parsers::extract(doc)?;
                parser = ExpressionParser::with_typescript(typescript);
            }
            Pass::Blocks => blocks::normalize(doc, &parser)?,
            Pass::Attributes => attributes::parse_attributes(doc, &parser, diagnostics)?,
            Pass::Texts => texts::parse_texts(doc, &parser)?,
        }
    }
    Ok(())
}
