use std::fmt;

use crate::backend::consts;
use crate::error::{GlirError, Result};

/// Binary element kind of a [`TypedPayload`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementType {
    F32,
    I8,
    I16,
    I32,
    U8,
    U16,
    U32,
}

impl ElementType {
    pub const ALL: [ElementType; 7] = [
        ElementType::F32,
        ElementType::I8,
        ElementType::I16,
        ElementType::I32,
        ElementType::U8,
        ElementType::U16,
        ElementType::U32,
    ];

    /// Resolves a wire element-type tag (`float32`, `int16`, `uint8`, ...).
    pub fn parse(tag: &str) -> Result<Self> {
        let ty = match tag.to_ascii_lowercase().as_str() {
            "float32" => ElementType::F32,
            "int8" => ElementType::I8,
            "int16" => ElementType::I16,
            "int32" => ElementType::I32,
            "uint8" => ElementType::U8,
            "uint16" => ElementType::U16,
            "uint32" => ElementType::U32,
            _ => return Err(GlirError::UnknownElementType(tag.to_string())),
        };
        Ok(ty)
    }

    /// Wire tag of this element type.
    pub fn name(self) -> &'static str {
        match self {
            ElementType::F32 => "float32",
            ElementType::I8 => "int8",
            ElementType::I16 => "int16",
            ElementType::I32 => "int32",
            ElementType::U8 => "uint8",
            ElementType::U16 => "uint16",
            ElementType::U32 => "uint32",
        }
    }

    /// Size of one element in bytes.
    pub fn size(self) -> usize {
        match self {
            ElementType::I8 | ElementType::U8 => 1,
            ElementType::I16 | ElementType::U16 => 2,
            ElementType::F32 | ElementType::I32 | ElementType::U32 => 4,
        }
    }

    /// GL data-type enum (`FLOAT`, `SHORT`, ...).
    pub fn gl_enum(self) -> u32 {
        match self {
            ElementType::F32 => consts::FLOAT,
            ElementType::I8 => consts::BYTE,
            ElementType::I16 => consts::SHORT,
            ElementType::I32 => consts::INT,
            ElementType::U8 => consts::UNSIGNED_BYTE,
            ElementType::U16 => consts::UNSIGNED_SHORT,
            ElementType::U32 => consts::UNSIGNED_INT,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Device-ready binary data tagged with its element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedPayload {
    F32(Vec<f32>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

/// Integer store with typed-array semantics: truncate toward zero, wrap on overflow.
#[inline]
fn wrap_int(v: f64) -> i64 {
    if v.is_finite() { v.trunc() as i64 } else { 0 }
}

impl TypedPayload {
    /// Materializes `values` into the binary form of `ty`.
    pub fn from_values(ty: ElementType, values: &[f64]) -> Self {
        let it = values.iter().copied();
        match ty {
            ElementType::F32 => TypedPayload::F32(it.map(|v| v as f32).collect()),
            ElementType::I8 => TypedPayload::I8(it.map(|v| wrap_int(v) as i8).collect()),
            ElementType::I16 => TypedPayload::I16(it.map(|v| wrap_int(v) as i16).collect()),
            ElementType::I32 => TypedPayload::I32(it.map(|v| wrap_int(v) as i32).collect()),
            ElementType::U8 => TypedPayload::U8(it.map(|v| wrap_int(v) as u8).collect()),
            ElementType::U16 => TypedPayload::U16(it.map(|v| wrap_int(v) as u16).collect()),
            ElementType::U32 => TypedPayload::U32(it.map(|v| wrap_int(v) as u32).collect()),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            TypedPayload::F32(_) => ElementType::F32,
            TypedPayload::I8(_) => ElementType::I8,
            TypedPayload::I16(_) => ElementType::I16,
            TypedPayload::I32(_) => ElementType::I32,
            TypedPayload::U8(_) => ElementType::U8,
            TypedPayload::U16(_) => ElementType::U16,
            TypedPayload::U32(_) => ElementType::U32,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            TypedPayload::F32(v) => v.len(),
            TypedPayload::I8(v) => v.len(),
            TypedPayload::I16(v) => v.len(),
            TypedPayload::I32(v) => v.len(),
            TypedPayload::U8(v) => v.len(),
            TypedPayload::U16(v) => v.len(),
            TypedPayload::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length in bytes of [`as_bytes`](Self::as_bytes).
    pub fn byte_len(&self) -> usize {
        self.len() * self.element_type().size()
    }

    /// Native-endian byte view suitable for a buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            TypedPayload::F32(v) => bytemuck::cast_slice(v),
            TypedPayload::I8(v) => bytemuck::cast_slice(v),
            TypedPayload::I16(v) => bytemuck::cast_slice(v),
            TypedPayload::I32(v) => bytemuck::cast_slice(v),
            TypedPayload::U8(v) => v,
            TypedPayload::U16(v) => bytemuck::cast_slice(v),
            TypedPayload::U32(v) => bytemuck::cast_slice(v),
        }
    }

    /// Element `i` widened to `f64`.
    pub fn get(&self, i: usize) -> Option<f64> {
        match self {
            TypedPayload::F32(v) => v.get(i).map(|&x| f64::from(x)),
            TypedPayload::I8(v) => v.get(i).map(|&x| f64::from(x)),
            TypedPayload::I16(v) => v.get(i).map(|&x| f64::from(x)),
            TypedPayload::I32(v) => v.get(i).map(|&x| f64::from(x)),
            TypedPayload::U8(v) => v.get(i).map(|&x| f64::from(x)),
            TypedPayload::U16(v) => v.get(i).map(|&x| f64::from(x)),
            TypedPayload::U32(v) => v.get(i).map(|&x| f64::from(x)),
        }
    }

    /// Iterates elements widened to `f64`.
    pub fn iter_f64(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    /// Float view used by float and matrix uniform uploads.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match self {
            TypedPayload::F32(v) => v.clone(),
            _ => self.iter_f64().map(|x| x as f32).collect(),
        }
    }

    /// Integer view used by int, bool and sampler uniform uploads.
    pub fn to_i32_vec(&self) -> Vec<i32> {
        match self {
            TypedPayload::I32(v) => v.clone(),
            _ => self.iter_f64().map(|x| wrap_int(x) as i32).collect(),
        }
    }
}

impl From<Vec<f32>> for TypedPayload {
    fn from(v: Vec<f32>) -> Self {
        TypedPayload::F32(v)
    }
}

impl From<Vec<i32>> for TypedPayload {
    fn from(v: Vec<i32>) -> Self {
        TypedPayload::I32(v)
    }
}

impl From<Vec<u16>> for TypedPayload {
    fn from(v: Vec<u16>) -> Self {
        TypedPayload::U16(v)
    }
}

impl From<Vec<u32>> for TypedPayload {
    fn from(v: Vec<u32>) -> Self {
        TypedPayload::U32(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(ElementType::parse("Float32").unwrap(), ElementType::F32);
        assert_eq!(ElementType::parse("UINT16").unwrap(), ElementType::U16);
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        assert_eq!(
            ElementType::parse("float64"),
            Err(GlirError::UnknownElementType("float64".into()))
        );
    }

    #[test]
    fn byte_len_follows_element_size() {
        let p = TypedPayload::from_values(ElementType::I16, &[1.0, 2.0, 3.0]);
        assert_eq!(p.len(), 3);
        assert_eq!(p.byte_len(), 6);
        assert_eq!(p.as_bytes().len(), 6);
    }

    #[test]
    fn integer_stores_wrap_like_typed_arrays() {
        let p = TypedPayload::from_values(ElementType::I8, &[300.0, -129.0, 1.9]);
        assert_eq!(p, TypedPayload::I8(vec![44, 127, 1]));

        let p = TypedPayload::from_values(ElementType::U8, &[-1.0, f64::NAN]);
        assert_eq!(p, TypedPayload::U8(vec![255, 0]));
    }

    #[test]
    fn float_and_int_views() {
        let p = TypedPayload::I32(vec![1, -2, 3]);
        assert_eq!(p.to_f32_vec(), vec![1.0, -2.0, 3.0]);

        let p = TypedPayload::F32(vec![1.5, -2.5]);
        assert_eq!(p.to_i32_vec(), vec![1, -2]);
    }
}
