use std::fmt;

use crate::backend::consts;
use crate::data::ElementType;
use crate::error::{GlirError, Result};

use super::uniform_fn::UniformFn;

/// Symbolic attribute/uniform type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GlType {
    Float,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    Int,
    IntVec2,
    IntVec3,
    IntVec4,
    Bool,
    BoolVec2,
    BoolVec3,
    BoolVec4,
    FloatMat2,
    FloatMat3,
    FloatMat4,
    Sampler2D,
}

/// Scalar kind underlying a [`GlType`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BaseKind {
    Float,
    Int,
    Bool,
}

/// Layout information derived from a [`GlType`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeTypeInfo {
    /// Total scalar components (1, 2, 3, 4, 9 or 16).
    pub components: usize,
    pub base_kind: BaseKind,
    /// Binary element type of the backing data.
    pub element_type: ElementType,
    /// GL data-type enum passed to the vertex pointer.
    pub gl_data_type: u32,
}

// (GL enum name, GLSL name, type)
const TABLE: &[(&str, &str, GlType)] = &[
    ("GL_FLOAT", "float", GlType::Float),
    ("GL_FLOAT_VEC2", "vec2", GlType::FloatVec2),
    ("GL_FLOAT_VEC3", "vec3", GlType::FloatVec3),
    ("GL_FLOAT_VEC4", "vec4", GlType::FloatVec4),
    ("GL_INT", "int", GlType::Int),
    ("GL_INT_VEC2", "ivec2", GlType::IntVec2),
    ("GL_INT_VEC3", "ivec3", GlType::IntVec3),
    ("GL_INT_VEC4", "ivec4", GlType::IntVec4),
    ("GL_BOOL", "bool", GlType::Bool),
    ("GL_BOOL_VEC2", "bvec2", GlType::BoolVec2),
    ("GL_BOOL_VEC3", "bvec3", GlType::BoolVec3),
    ("GL_BOOL_VEC4", "bvec4", GlType::BoolVec4),
    ("GL_FLOAT_MAT2", "mat2", GlType::FloatMat2),
    ("GL_FLOAT_MAT3", "mat3", GlType::FloatMat3),
    ("GL_FLOAT_MAT4", "mat4", GlType::FloatMat4),
    ("GL_SAMPLER_2D", "sampler2D", GlType::Sampler2D),
];

impl GlType {
    /// Resolves either the GL enum name (`GL_FLOAT_VEC3`) or the GLSL name
    /// (`vec3`), case-insensitively.
    pub fn parse(name: &str) -> Result<Self> {
        TABLE
            .iter()
            .find(|(gl, glsl, _)| name.eq_ignore_ascii_case(gl) || name.eq_ignore_ascii_case(glsl))
            .map(|&(_, _, ty)| ty)
            .ok_or_else(|| GlirError::UnknownGlType(name.to_string()))
    }

    /// GL enum name, e.g. `GL_FLOAT_VEC3`.
    pub fn gl_name(self) -> &'static str {
        TABLE
            .iter()
            .find(|&&(_, _, ty)| ty == self)
            .map_or("GL_UNKNOWN", |&(gl, _, _)| gl)
    }

    pub fn base_kind(self) -> BaseKind {
        use GlType::*;
        match self {
            Float | FloatVec2 | FloatVec3 | FloatVec4 | FloatMat2 | FloatMat3 | FloatMat4 => {
                BaseKind::Float
            }
            Int | IntVec2 | IntVec3 | IntVec4 | Sampler2D => BaseKind::Int,
            Bool | BoolVec2 | BoolVec3 | BoolVec4 => BaseKind::Bool,
        }
    }

    /// Scalar components per value (matrices count every cell).
    pub fn components(self) -> usize {
        use GlType::*;
        match self {
            Float | Int | Bool | Sampler2D => 1,
            FloatVec2 | IntVec2 | BoolVec2 => 2,
            FloatVec3 | IntVec3 | BoolVec3 => 3,
            FloatVec4 | IntVec4 | BoolVec4 | FloatMat2 => 4,
            FloatMat3 => 9,
            FloatMat4 => 16,
        }
    }

    /// Column dimension for matrix types.
    pub fn matrix_dim(self) -> Option<usize> {
        match self {
            GlType::FloatMat2 => Some(2),
            GlType::FloatMat3 => Some(3),
            GlType::FloatMat4 => Some(4),
            _ => None,
        }
    }

    pub fn info(self) -> AttributeTypeInfo {
        let (element_type, gl_data_type) = match (self, self.base_kind()) {
            (GlType::Sampler2D, _) => (ElementType::U32, consts::UNSIGNED_INT),
            (_, BaseKind::Float) => (ElementType::F32, consts::FLOAT),
            (_, BaseKind::Int) => (ElementType::I32, consts::INT),
            (_, BaseKind::Bool) => (ElementType::I32, consts::BOOL),
        };
        AttributeTypeInfo {
            components: self.components(),
            base_kind: self.base_kind(),
            element_type,
            gl_data_type,
        }
    }

    /// Upload function used for uniforms of this type.
    ///
    /// Matrices always go through the matrix variant; bools upload as ints.
    pub fn uniform_fn(self) -> UniformFn {
        if self == GlType::Sampler2D {
            return UniformFn::Sampler;
        }
        if let Some(dim) = self.matrix_dim() {
            return UniformFn::Matrix(dim as u8);
        }
        let n = self.components() as u8;
        match self.base_kind() {
            BaseKind::Float => UniformFn::Float(n),
            BaseKind::Int | BaseKind::Bool => UniformFn::Int(n),
        }
    }
}

impl fmt::Display for GlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.gl_name())
    }
}
