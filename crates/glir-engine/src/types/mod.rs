//! Type-metadata tables.
//!
//! Static mappings from symbolic GL type names to layout information and
//! uniform upload functions, plus draw topology and index width enums.

mod draw;
mod gl_type;
mod uniform_fn;

pub(crate) use draw::strip_gl_prefix;
pub use draw::{DrawMode, IndexType};
pub use gl_type::{AttributeTypeInfo, BaseKind, GlType};
pub use uniform_fn::UniformFn;
