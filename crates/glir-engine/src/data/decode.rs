use crate::error::{GlirError, Result};

use super::base64;
use super::descriptor::DataDescriptor;
use super::payload::{ElementType, TypedPayload};

/// Decodes a wire descriptor into a device-ready payload.
///
/// Pure function of its input. Inline and typed payloads keep their declared
/// element type; only the base64 path applies the symbolic-type widening rule
/// (see [`decode_base64`]).
pub fn decode(descriptor: &DataDescriptor) -> Result<TypedPayload> {
    match descriptor {
        DataDescriptor::Typed(payload) => Ok(payload.clone()),
        DataDescriptor::Inline {
            element_type,
            values,
        } => {
            let ty = ElementType::parse(element_type)?;
            Ok(TypedPayload::from_values(ty, values))
        }
        DataDescriptor::Base64 { gl_type, blob } => decode_base64(blob, gl_type),
    }
}

/// Decodes a base64 blob and reinterprets it per its symbolic GL type.
///
/// | type prefix   | result                                   |
/// |---------------|------------------------------------------|
/// | `GL_FLOAT`    | 32-bit floats                            |
/// | `GL_INT`      | 32-bit ints, widened to 32-bit floats    |
/// | `GL_UNSIGNED` | 16-bit unsigned ints                     |
///
/// Integer attributes are widened because the draw path assumes float
/// attributes on GL ES targets.
pub fn decode_base64(blob: &str, gl_type: &str) -> Result<TypedPayload> {
    let bytes = base64::decode(blob);
    let upper = gl_type.to_ascii_uppercase();

    if upper.starts_with("GL_FLOAT") {
        let words = words::<4>(&bytes, gl_type)?;
        Ok(TypedPayload::F32(words.map(f32::from_le_bytes).collect()))
    } else if upper.starts_with("GL_INT") {
        let words = words::<4>(&bytes, gl_type)?;
        Ok(TypedPayload::F32(
            words.map(|w| i32::from_le_bytes(w) as f32).collect(),
        ))
    } else if upper.starts_with("GL_UNSIGNED") {
        let words = words::<2>(&bytes, gl_type)?;
        Ok(TypedPayload::U16(words.map(u16::from_le_bytes).collect()))
    } else {
        Err(GlirError::UnknownElementType(gl_type.to_string()))
    }
}

fn words<'a, const N: usize>(
    bytes: &'a [u8],
    gl_type: &str,
) -> Result<impl Iterator<Item = [u8; N]> + 'a> {
    if bytes.len() % N != 0 {
        return Err(GlirError::MalformedPayload(format!(
            "{} bytes is not a multiple of {N} for {gl_type}",
            bytes.len()
        )));
    }
    Ok(bytes.chunks_exact(N).map(|c| {
        let mut w = [0u8; N];
        w.copy_from_slice(c);
        w
    }))
}
