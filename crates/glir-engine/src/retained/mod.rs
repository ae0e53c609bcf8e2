//! Retained-mode object layer.
//!
//! This module is responsible for:
//! - lazily created GPU objects (`GlObject` lifecycle)
//! - buffers, attributes, uniforms and programs that own their data
//! - building and drawing a `Scene` from an exported scene description

mod attribute;
mod buffer;
mod export;
mod object;
mod program;
mod scene;
mod uniform;

pub use attribute::Attribute;
pub use buffer::Buffer;
pub use export::{ProgramExport, SceneExport, VariableExport};
pub use object::{GlObject, Lifecycle};
pub use program::Program;
pub use scene::Scene;
pub use uniform::Uniform;
