use crate::backend::consts;
use crate::data::ElementType;
use crate::error::{GlirError, Result};

/// Primitive topology of a draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl DrawMode {
    const NAMES: [(&'static str, DrawMode); 7] = [
        ("POINTS", DrawMode::Points),
        ("LINES", DrawMode::Lines),
        ("LINE_LOOP", DrawMode::LineLoop),
        ("LINE_STRIP", DrawMode::LineStrip),
        ("TRIANGLES", DrawMode::Triangles),
        ("TRIANGLE_STRIP", DrawMode::TriangleStrip),
        ("TRIANGLE_FAN", DrawMode::TriangleFan),
    ];

    /// Parses `TRIANGLES`, `gl_triangles`, `triangle_strip`, ...
    pub fn parse(name: &str) -> Result<Self> {
        let bare = strip_gl_prefix(name);
        Self::NAMES
            .iter()
            .find(|(n, _)| bare.eq_ignore_ascii_case(n))
            .map(|&(_, m)| m)
            .ok_or_else(|| GlirError::BackendCallFailed(format!("unknown draw mode '{name}'")))
    }

    /// Maps a raw GL enum value.
    pub fn from_gl(value: u32) -> Result<Self> {
        Self::NAMES
            .iter()
            .map(|&(_, m)| m)
            .find(|m| m.gl_enum() == value)
            .ok_or_else(|| GlirError::BackendCallFailed(format!("unknown draw mode {value:#x}")))
    }

    pub fn gl_enum(self) -> u32 {
        match self {
            DrawMode::Points => consts::POINTS,
            DrawMode::Lines => consts::LINES,
            DrawMode::LineLoop => consts::LINE_LOOP,
            DrawMode::LineStrip => consts::LINE_STRIP,
            DrawMode::Triangles => consts::TRIANGLES,
            DrawMode::TriangleStrip => consts::TRIANGLE_STRIP,
            DrawMode::TriangleFan => consts::TRIANGLE_FAN,
        }
    }
}

/// Index width of an indexed draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum IndexType {
    UnsignedByte,
    UnsignedShort,
    UnsignedInt,
}

impl IndexType {
    /// Parses `UNSIGNED_SHORT` / `GL_UNSIGNED_SHORT` / `uint16` style names.
    pub fn parse(name: &str) -> Result<Self> {
        let bare = strip_gl_prefix(name);
        let ty = match bare.to_ascii_uppercase().as_str() {
            "UNSIGNED_BYTE" | "UINT8" => IndexType::UnsignedByte,
            "UNSIGNED_SHORT" | "UINT16" => IndexType::UnsignedShort,
            "UNSIGNED_INT" | "UINT32" => IndexType::UnsignedInt,
            _ => return Err(GlirError::UnknownElementType(name.to_string())),
        };
        Ok(ty)
    }

    pub fn from_element_type(ty: ElementType) -> Result<Self> {
        match ty {
            ElementType::U8 => Ok(IndexType::UnsignedByte),
            ElementType::U16 => Ok(IndexType::UnsignedShort),
            ElementType::U32 => Ok(IndexType::UnsignedInt),
            other => Err(GlirError::UnknownElementType(format!(
                "{other} is not an index type"
            ))),
        }
    }

    pub fn size(self) -> usize {
        match self {
            IndexType::UnsignedByte => 1,
            IndexType::UnsignedShort => 2,
            IndexType::UnsignedInt => 4,
        }
    }

    pub fn gl_enum(self) -> u32 {
        match self {
            IndexType::UnsignedByte => consts::UNSIGNED_BYTE,
            IndexType::UnsignedShort => consts::UNSIGNED_SHORT,
            IndexType::UnsignedInt => consts::UNSIGNED_INT,
        }
    }
}

/// Strips an optional `GL_` prefix (any case).
pub(crate) fn strip_gl_prefix(name: &str) -> &str {
    match name.get(..3) {
        Some(p) if p.eq_ignore_ascii_case("GL_") => &name[3..],
        _ => name,
    }
}
