use crate::backend::{BufferTarget, BufferUsage, GraphicsBackend};
use crate::data::TypedPayload;
use crate::error::{GlirError, Result};

use super::{GlObject, Lifecycle};

/// Retained vertex or index buffer holding its CPU-side data.
///
/// Every update is a full `STATIC_DRAW` upload.
pub struct Buffer<B: GraphicsBackend> {
    lifecycle: Lifecycle,
    target: BufferTarget,
    data: TypedPayload,
    handle: Option<B::Buffer>,
    /// Byte stride between vertices; 0 means tightly packed.
    pub stride: i32,
    /// Byte offset of the first vertex.
    pub offset: i32,
}

impl<B: GraphicsBackend> Buffer<B> {
    pub fn new(target: BufferTarget, data: TypedPayload) -> Self {
        Self {
            lifecycle: Lifecycle::default(),
            target,
            data,
            handle: None,
            stride: 0,
            offset: 0,
        }
    }

    pub fn vertex(data: TypedPayload) -> Self {
        Self::new(BufferTarget::Array, data)
    }

    pub fn index(data: TypedPayload) -> Self {
        Self::new(BufferTarget::ElementArray, data)
    }

    /// Replaces the data; uploaded on the next activation.
    pub fn set_data(&mut self, data: TypedPayload) {
        self.data = data;
        self.lifecycle.needs_update = true;
    }

    pub fn data(&self) -> &TypedPayload {
        &self.data
    }

    /// Element count of the current data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn handle(&self) -> Option<B::Buffer> {
        self.handle
    }
}

impl<B: GraphicsBackend> GlObject<B> for Buffer<B> {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn create(&mut self, gl: &mut B) -> Result<()> {
        self.handle = Some(gl.create_buffer().map_err(GlirError::BackendCallFailed)?);
        Ok(())
    }

    fn bind(&mut self, gl: &mut B) -> Result<()> {
        gl.bind_buffer(self.target, self.handle);
        Ok(())
    }

    fn update(&mut self, gl: &mut B) -> Result<()> {
        gl.buffer_data(self.target, self.data.as_bytes(), BufferUsage::StaticDraw);
        Ok(())
    }

    fn release(&mut self, gl: &mut B) {
        if let Some(handle) = self.handle.take() {
            gl.delete_buffer(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, RecordingBackend};

    #[test]
    fn activation_creates_and_uploads_once() {
        let mut gl = RecordingBackend::new();
        let mut vbo = Buffer::vertex(TypedPayload::F32(vec![0.0; 6]));
        vbo.activate(&mut gl).unwrap();
        vbo.activate(&mut gl).unwrap();

        assert_eq!(gl.count(|c| matches!(c, BackendCall::CreateBuffer(_))), 1);
        assert_eq!(gl.count(|c| matches!(c, BackendCall::BindBuffer { .. })), 3);
        assert!(gl.calls().contains(&BackendCall::BufferData {
            target: BufferTarget::Array,
            size: 24,
            usage: BufferUsage::StaticDraw,
        }));
        assert_eq!(gl.count(|c| matches!(c, BackendCall::BufferData { .. })), 1);
    }

    #[test]
    fn set_data_rearms_upload() {
        let mut gl = RecordingBackend::new();
        let mut vbo = Buffer::vertex(TypedPayload::F32(vec![0.0; 3]));
        vbo.activate(&mut gl).unwrap();
        vbo.set_data(TypedPayload::F32(vec![0.0; 6]));
        vbo.activate(&mut gl).unwrap();

        assert_eq!(gl.count(|c| matches!(c, BackendCall::BufferData { .. })), 2);
        assert_eq!(vbo.len(), 6);
    }

    #[test]
    fn delete_releases_and_rearms_creation() {
        let mut gl = RecordingBackend::new();
        let mut ibo = Buffer::index(TypedPayload::U16(vec![0, 1, 2]));
        ibo.delete(&mut gl);
        assert!(gl.calls().is_empty());

        ibo.activate(&mut gl).unwrap();
        ibo.delete(&mut gl);
        assert_eq!(gl.live_buffers(), 0);
        assert!(ibo.handle().is_none());
        assert!(ibo.lifecycle().needs_create);
    }
}
