//! GLIR command interpreter.
//!
//! This module is responsible for:
//! - parsing GLIR commands from their JSON wire form
//! - owning the id → device resource table
//! - executing commands in order against a `GraphicsBackend`
//! - shader source preparation shared with the retained layer

mod command;
mod config;
mod guard;
mod interpreter;
mod resources;
pub mod shader;

pub use command::{Command, DrawSelection, ResourceKind};
pub use config::GlirConfig;
pub use guard::ActiveProgram;
pub use interpreter::Interpreter;
pub use resources::{BufferRecord, ProgramRecord, ResourceRecord, ResourceTable, UniformSlot};
