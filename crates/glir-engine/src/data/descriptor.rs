use serde::Deserialize;
use serde_json::Value;

use crate::error::{GlirError, Result};

use super::payload::{ElementType, TypedPayload};

/// Wire-format description of a data buffer, prior to decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum DataDescriptor {
    /// Already device-ready; decoding returns it unchanged.
    Typed(TypedPayload),
    /// Inline numeric sequence plus element-type tag (`float32`, `uint16`, ...).
    Inline {
        element_type: String,
        values: Vec<f64>,
    },
    /// Base64 blob tagged with a symbolic GL type (`GL_FLOAT_VEC3`, ...).
    Base64 { gl_type: String, blob: String },
}

/// JSON scalar accepted inside inline sequences.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Bool(bool),
}

impl Scalar {
    fn value(self) -> f64 {
        match self {
            Scalar::Number(v) => v,
            Scalar::Bool(b) => f64::from(u8::from(b)),
        }
    }
}

/// Object form, tagged by `storage_type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "storage_type", rename_all = "snake_case")]
enum WireDescriptor {
    JavascriptArray {
        data_type: String,
        buffer: Vec<Scalar>,
    },
    JavascriptTypedArray {
        data_type: String,
        buffer: Vec<Scalar>,
    },
    Base64 {
        data_type: String,
        buffer: String,
    },
}

impl DataDescriptor {
    /// Inline `float32` sequence.
    pub fn floats(values: impl IntoIterator<Item = f64>) -> Self {
        DataDescriptor::Inline {
            element_type: ElementType::F32.name().to_string(),
            values: values.into_iter().collect(),
        }
    }

    /// Parses a descriptor from its JSON wire form.
    ///
    /// Accepted shapes:
    /// - `{"storage_type": "javascript_array" | "javascript_typed_array" | "base64", "data_type", "buffer"}`
    /// - a bare array of numbers/booleans or a bare number (inline `float32`)
    /// - `{"buffer": "<base64>"}` when `gl_type` supplies the symbolic type (scene exports)
    pub fn from_json(value: &Value, gl_type: Option<&str>) -> Result<Self> {
        match value {
            Value::Object(map) if map.contains_key("storage_type") => {
                let wire: WireDescriptor = serde_json::from_value(value.clone())
                    .map_err(|e| GlirError::MalformedPayload(e.to_string()))?;
                Self::from_wire(wire)
            }
            Value::Object(map) => match (gl_type, map.get("buffer")) {
                (Some(gl_type), Some(Value::String(blob))) => Ok(DataDescriptor::Base64 {
                    gl_type: gl_type.to_string(),
                    blob: blob.clone(),
                }),
                _ => Err(GlirError::MalformedPayload(
                    "object payload without storage_type".into(),
                )),
            },
            Value::Array(items) => {
                let values = items
                    .iter()
                    .map(scalar)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::floats(values))
            }
            Value::Number(_) | Value::Bool(_) => Ok(Self::floats([scalar(value)?])),
            other => Err(GlirError::MalformedPayload(format!(
                "unsupported payload shape: {other}"
            ))),
        }
    }

    fn from_wire(wire: WireDescriptor) -> Result<Self> {
        let descriptor = match wire {
            WireDescriptor::JavascriptArray { data_type, buffer } => DataDescriptor::Inline {
                element_type: data_type,
                values: buffer.into_iter().map(Scalar::value).collect(),
            },
            WireDescriptor::JavascriptTypedArray { data_type, buffer } => {
                let ty = ElementType::parse(&data_type)?;
                let values: Vec<f64> = buffer.into_iter().map(Scalar::value).collect();
                DataDescriptor::Typed(TypedPayload::from_values(ty, &values))
            }
            WireDescriptor::Base64 { data_type, buffer } => DataDescriptor::Base64 {
                gl_type: data_type,
                blob: buffer,
            },
        };
        Ok(descriptor)
    }
}

impl From<TypedPayload> for DataDescriptor {
    fn from(payload: TypedPayload) -> Self {
        DataDescriptor::Typed(payload)
    }
}

fn scalar(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| GlirError::MalformedPayload(format!("non-finite number {n}"))),
        Value::Bool(b) => Ok(f64::from(u8::from(*b))),
        other => Err(GlirError::MalformedPayload(format!(
            "expected a number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_inline_array() {
        let d = DataDescriptor::from_json(
            &json!({"storage_type": "javascript_array", "data_type": "uint16", "buffer": [0, 1, 2]}),
            None,
        )
        .unwrap();
        assert_eq!(
            d,
            DataDescriptor::Inline {
                element_type: "uint16".into(),
                values: vec![0.0, 1.0, 2.0]
            }
        );
    }

    #[test]
    fn tagged_typed_array_is_materialized() {
        let d = DataDescriptor::from_json(
            &json!({"storage_type": "javascript_typed_array", "data_type": "int32", "buffer": [4, 5]}),
            None,
        )
        .unwrap();
        assert_eq!(d, DataDescriptor::Typed(TypedPayload::I32(vec![4, 5])));
    }

    #[test]
    fn tagged_base64() {
        let d = DataDescriptor::from_json(
            &json!({"storage_type": "base64", "data_type": "GL_FLOAT", "buffer": "AACAPw=="}),
            None,
        )
        .unwrap();
        assert!(matches!(d, DataDescriptor::Base64 { ref gl_type, .. } if gl_type == "GL_FLOAT"));
    }

    #[test]
    fn bare_values_are_float32() {
        let d = DataDescriptor::from_json(&json!([1, 2.5, true]), None).unwrap();
        assert_eq!(d, DataDescriptor::floats([1.0, 2.5, 1.0]));

        let d = DataDescriptor::from_json(&json!(3), None).unwrap();
        assert_eq!(d, DataDescriptor::floats([3.0]));
    }

    #[test]
    fn scene_buffer_takes_enclosing_type() {
        let d = DataDescriptor::from_json(&json!({"buffer": "AAAA"}), Some("GL_INT")).unwrap();
        assert_eq!(
            d,
            DataDescriptor::Base64 {
                gl_type: "GL_INT".into(),
                blob: "AAAA".into()
            }
        );
    }

    #[test]
    fn rejects_unknown_storage_and_shapes() {
        assert!(matches!(
            DataDescriptor::from_json(&json!({"storage_type": "png", "buffer": ""}), None),
            Err(GlirError::MalformedPayload(_))
        ));
        assert!(matches!(
            DataDescriptor::from_json(&json!("text"), None),
            Err(GlirError::MalformedPayload(_))
        ));
        assert!(matches!(
            DataDescriptor::from_json(&json!([1, "x"]), None),
            Err(GlirError::MalformedPayload(_))
        ));
    }
}
