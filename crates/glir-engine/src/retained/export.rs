use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use anyhow::Context;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

use crate::data::{self, DataDescriptor, TypedPayload};
use crate::error::Result;

/// Exported scene: named programs in export order.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneExport {
    #[serde(deserialize_with = "ordered")]
    pub programs: Vec<(String, ProgramExport)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramExport {
    pub vertex_shader: String,
    pub fragment_shader: String,
    /// Draw mode name, any case (`triangles`, `TRIANGLE_STRIP`, ...).
    pub mode: String,
    #[serde(default, deserialize_with = "ordered")]
    pub attributes: Vec<(String, VariableExport)>,
    #[serde(default, deserialize_with = "ordered")]
    pub uniforms: Vec<(String, VariableExport)>,
    #[serde(default)]
    pub index_buffer: Option<VariableExport>,
}

/// One exported variable: symbolic GL type plus its data blob.
#[derive(Debug, Clone, Deserialize)]
pub struct VariableExport {
    pub gtype: String,
    pub data: Value,
}

impl VariableExport {
    /// Decodes `data`, using `gtype` as the symbolic type of bare base64 blobs.
    pub fn decode(&self) -> Result<TypedPayload> {
        let descriptor = DataDescriptor::from_json(&self.data, Some(&self.gtype))?;
        data::decode(&descriptor)
    }
}

impl SceneExport {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("parsing scene export")
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene export {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Deserializes a JSON object into its entries, keeping document order.
fn ordered<'de, D, T>(deserializer: D) -> std::result::Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct Entries<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for Entries<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(Entries(PhantomData))
}
