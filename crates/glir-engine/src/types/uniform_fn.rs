use std::fmt;

use crate::data::TypedPayload;
use crate::error::{GlirError, Result};

/// Uniform upload function variant (`uniformNfv`, `uniformNiv`,
/// `uniformMatrixNfv`, `uniform1i`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformFn {
    /// `uniform{N}fv`
    Float(u8),
    /// `uniform{N}iv`
    Int(u8),
    /// `uniformMatrix{N}fv`, transpose fixed to false.
    Matrix(u8),
    /// `uniform1i` (texture unit).
    Sampler,
}

impl UniformFn {
    /// Scalars consumed per uniform element.
    pub fn arity(self) -> usize {
        match self {
            UniformFn::Float(n) | UniformFn::Int(n) => usize::from(n),
            UniformFn::Matrix(n) => usize::from(n) * usize::from(n),
            UniformFn::Sampler => 1,
        }
    }

    pub fn is_matrix(self) -> bool {
        matches!(self, UniformFn::Matrix(_))
    }

    /// Converts `value` to the element kind this function uploads (f32 for
    /// float/matrix, i32 otherwise) and checks its length.
    pub fn coerce(self, value: &TypedPayload) -> Result<TypedPayload> {
        let arity = self.arity();
        if value.is_empty() || value.len() % arity != 0 {
            return Err(GlirError::MalformedPayload(format!(
                "{self} expects a multiple of {arity} values, got {}",
                value.len()
            )));
        }
        Ok(match self {
            UniformFn::Float(_) | UniformFn::Matrix(_) => TypedPayload::F32(value.to_f32_vec()),
            UniformFn::Int(_) | UniformFn::Sampler => TypedPayload::I32(value.to_i32_vec()),
        })
    }
}

impl fmt::Display for UniformFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformFn::Float(n) => write!(f, "uniform{n}fv"),
            UniformFn::Int(n) => write!(f, "uniform{n}iv"),
            UniformFn::Matrix(n) => write!(f, "uniformMatrix{n}fv"),
            UniformFn::Sampler => f.write_str("uniform1i"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(UniformFn::Float(3).to_string(), "uniform3fv");
        assert_eq!(UniformFn::Int(1).to_string(), "uniform1iv");
        assert_eq!(UniformFn::Matrix(4).to_string(), "uniformMatrix4fv");
        assert_eq!(UniformFn::Sampler.to_string(), "uniform1i");
    }

    #[test]
    fn coerce_converts_kind() {
        let v = TypedPayload::F32(vec![1.0, 0.0]);
        assert_eq!(UniformFn::Int(2).coerce(&v).unwrap(), TypedPayload::I32(vec![1, 0]));

        let v = TypedPayload::U16(vec![1, 2, 3]);
        assert_eq!(
            UniformFn::Float(3).coerce(&v).unwrap(),
            TypedPayload::F32(vec![1.0, 2.0, 3.0])
        );
    }

    #[test]
    fn coerce_checks_arity() {
        let v = TypedPayload::F32(vec![1.0; 9]);
        assert!(UniformFn::Matrix(3).coerce(&v).is_ok());
        assert!(matches!(
            UniformFn::Matrix(4).coerce(&v),
            Err(GlirError::MalformedPayload(_))
        ));
        assert!(UniformFn::Float(3).coerce(&TypedPayload::F32(vec![])).is_err());
    }
}
