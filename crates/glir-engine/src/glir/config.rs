use crate::backend::BufferUsage;

/// Interpreter configuration.
///
/// Defaults reproduce the reference protocol behavior. Change a field only
/// when a concrete client requirement exists.
#[derive(Debug, Clone)]
pub struct GlirConfig {
    /// Directive prepended to every shader source.
    ///
    /// GL ES fragment shaders have no default float precision; empty disables the prefix.
    pub precision_header: String,

    /// Replace literal `\n` escape sequences in shader sources with newlines.
    pub unescape_newlines: bool,

    /// Usage hint of the allocating upload performed by the first `data` write.
    pub buffer_usage: BufferUsage,

    /// Reallocate when an offset-0 `data` write is larger than the current allocation.
    ///
    /// Off by default: the protocol allocates on the first write only, and
    /// later writes are always sub-range updates even when they overflow.
    pub grow_on_overflow: bool,
}

impl Default for GlirConfig {
    fn default() -> Self {
        Self {
            precision_header: "precision mediump float;".to_string(),
            unescape_newlines: true,
            buffer_usage: BufferUsage::DynamicDraw,
            grow_on_overflow: false,
        }
    }
}
