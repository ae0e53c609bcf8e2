//! GLIR engine crate.
//!
//! This crate owns the GL command interpreter and the retained-mode scene
//! layer. Device access goes through the `GraphicsBackend` trait.

pub mod backend;
pub mod data;
pub mod error;
pub mod glir;
pub mod logging;
pub mod retained;
pub mod types;

pub use error::{GlirError, Result};
