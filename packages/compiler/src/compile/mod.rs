//! Compile Module
//!
//! Code generation from the transformed markup tree:
//!
//! - [`visitor`]: walks one component's markup into static blocks and spots
//! - [`spot`]: deferred runtime bindings and their rendering
//! - [`component`]: per-component state and output
//! - [`template`]: the file-level aggregate producing `{ js, css }`

pub mod component;
pub mod emitter;
pub mod spot;
pub mod template;
pub mod visitor;

pub use component::Component;
pub use spot::{Branch, EventModifiers, Frame, Prop, Spot, SpotKind};
pub use template::{ImportSet, Template, TemplateOutput};
pub use visitor::CompileVisitor;
