use std::collections::HashMap;
use std::fmt;

use crate::backend::{BufferTarget, GraphicsBackend};
use crate::error::{GlirError, Result};
use crate::types::UniformFn;

use super::ResourceKind;

/// Device buffer owned by a GLIR id.
pub struct BufferRecord<B: GraphicsBackend> {
    pub kind: ResourceKind,
    pub handle: B::Buffer,
    /// Bytes allocated by the first write; 0 until then.
    pub filled_size: usize,
}

impl<B: GraphicsBackend> BufferRecord<B> {
    pub fn new(kind: ResourceKind, handle: B::Buffer) -> Self {
        Self {
            kind,
            handle,
            filled_size: 0,
        }
    }

    pub fn target(&self) -> BufferTarget {
        match self.kind {
            ResourceKind::IndexBuffer => BufferTarget::ElementArray,
            _ => BufferTarget::Array,
        }
    }
}

/// Cached uniform resolution: location (absent when inactive) and upload function.
pub struct UniformSlot<B: GraphicsBackend> {
    pub location: Option<B::UniformLocation>,
    pub func: UniformFn,
}

/// Device program owned by a GLIR id.
///
/// Location caches are filled on first reference and never invalidated,
/// including across relinks.
pub struct ProgramRecord<B: GraphicsBackend> {
    pub handle: B::Program,
    pub attributes: HashMap<String, Option<u32>>,
    pub uniforms: HashMap<String, UniformSlot<B>>,
}

impl<B: GraphicsBackend> ProgramRecord<B> {
    pub fn new(handle: B::Program) -> Self {
        Self {
            handle,
            attributes: HashMap::new(),
            uniforms: HashMap::new(),
        }
    }
}

pub enum ResourceRecord<B: GraphicsBackend> {
    Buffer(BufferRecord<B>),
    Program(ProgramRecord<B>),
}

impl<B: GraphicsBackend> ResourceRecord<B> {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRecord::Buffer(b) => b.kind,
            ResourceRecord::Program(_) => ResourceKind::Program,
        }
    }

    /// Releases the device handle.
    pub fn release(self, gl: &mut B) {
        match self {
            ResourceRecord::Buffer(b) => gl.delete_buffer(b.handle),
            ResourceRecord::Program(p) => gl.delete_program(p.handle),
        }
    }
}

impl<B: GraphicsBackend> fmt::Debug for BufferRecord<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferRecord")
            .field("kind", &self.kind)
            .field("handle", &self.handle)
            .field("filled_size", &self.filled_size)
            .finish()
    }
}

impl<B: GraphicsBackend> fmt::Debug for ProgramRecord<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramRecord")
            .field("handle", &self.handle)
            .field("attributes", &self.attributes)
            .field("uniforms", &self.uniforms.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<B: GraphicsBackend> fmt::Debug for ResourceRecord<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRecord::Buffer(b) => b.fmt(f),
            ResourceRecord::Program(p) => p.fmt(f),
        }
    }
}

/// Mapping from client-chosen ids to live device resources.
pub struct ResourceTable<B: GraphicsBackend> {
    records: HashMap<String, ResourceRecord<B>>,
}

impl<B: GraphicsBackend> Default for ResourceTable<B> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl<B: GraphicsBackend> ResourceTable<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `record` under `id`, returning the displaced record if any.
    ///
    /// A displaced record is not released.
    pub fn insert(&mut self, id: String, record: ResourceRecord<B>) -> Option<ResourceRecord<B>> {
        self.records.insert(id, record)
    }

    pub fn get(&self, id: &str) -> Result<&ResourceRecord<B>> {
        self.records
            .get(id)
            .ok_or_else(|| GlirError::UnknownResource(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut ResourceRecord<B>> {
        self.records
            .get_mut(id)
            .ok_or_else(|| GlirError::UnknownResource(id.to_string()))
    }

    pub fn buffer(&self, id: &str) -> Result<&BufferRecord<B>> {
        match self.get(id)? {
            ResourceRecord::Buffer(b) => Ok(b),
            other => Err(wrong_kind(id, "buffer", other.kind())),
        }
    }

    pub fn buffer_mut(&mut self, id: &str) -> Result<&mut BufferRecord<B>> {
        match self.get_mut(id)? {
            ResourceRecord::Buffer(b) => Ok(b),
            other => Err(wrong_kind(id, "buffer", other.kind())),
        }
    }

    pub fn program(&self, id: &str) -> Result<&ProgramRecord<B>> {
        match self.get(id)? {
            ResourceRecord::Program(p) => Ok(p),
            other => Err(wrong_kind(id, "Program", other.kind())),
        }
    }

    pub fn program_mut(&mut self, id: &str) -> Result<&mut ProgramRecord<B>> {
        match self.get_mut(id)? {
            ResourceRecord::Program(p) => Ok(p),
            other => Err(wrong_kind(id, "Program", other.kind())),
        }
    }

    /// Releases the device handle of `id` and erases the entry.
    pub fn remove(&mut self, id: &str, gl: &mut B) -> Result<()> {
        let record = self
            .records
            .remove(id)
            .ok_or_else(|| GlirError::UnknownResource(id.to_string()))?;
        record.release(gl);
        Ok(())
    }

    /// Releases every live handle and empties the table.
    pub fn release_all(&mut self, gl: &mut B) {
        for (_, record) in self.records.drain() {
            record.release(gl);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl<B: GraphicsBackend> fmt::Debug for ResourceTable<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.records.iter()).finish()
    }
}

fn wrong_kind(id: &str, expected: &'static str, found: ResourceKind) -> GlirError {
    GlirError::WrongResourceKind {
        id: id.to_string(),
        expected,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;

    fn table_with_buffer(gl: &mut RecordingBackend) -> ResourceTable<RecordingBackend> {
        let mut table = ResourceTable::new();
        let handle = gl.create_buffer().unwrap();
        table.insert(
            "vb".into(),
            ResourceRecord::Buffer(BufferRecord::new(ResourceKind::VertexBuffer, handle)),
        );
        table
    }

    #[test]
    fn lookups_check_kind() {
        let mut gl = RecordingBackend::new();
        let table = table_with_buffer(&mut gl);

        assert_eq!(table.buffer("vb").unwrap().filled_size, 0);
        assert_eq!(table.buffer("vb").unwrap().target(), BufferTarget::Array);
        assert_eq!(
            table.program("vb").unwrap_err(),
            GlirError::WrongResourceKind {
                id: "vb".into(),
                expected: "Program",
                found: ResourceKind::VertexBuffer,
            }
        );
        assert_eq!(
            table.buffer("nope").unwrap_err(),
            GlirError::UnknownResource("nope".into())
        );
    }

    #[test]
    fn remove_releases_handle() {
        let mut gl = RecordingBackend::new();
        let mut table = table_with_buffer(&mut gl);
        assert_eq!(gl.live_buffers(), 1);

        table.remove("vb", &mut gl).unwrap();
        assert!(table.is_empty());
        assert_eq!(gl.live_buffers(), 0);
        assert_eq!(
            table.remove("vb", &mut gl),
            Err(GlirError::UnknownResource("vb".into()))
        );
    }

    #[test]
    fn insert_returns_displaced_record_without_releasing() {
        let mut gl = RecordingBackend::new();
        let mut table = table_with_buffer(&mut gl);
        let handle = gl.create_program().unwrap();

        let old = table.insert("vb".into(), ResourceRecord::Program(ProgramRecord::new(handle)));
        assert_eq!(old.map(|r| r.kind()), Some(ResourceKind::VertexBuffer));
        assert_eq!(gl.live_buffers(), 1);
        assert_eq!(table.len(), 1);

        table.release_all(&mut gl);
        assert_eq!(gl.live_programs(), 0);
        assert!(table.is_empty());
    }
}
