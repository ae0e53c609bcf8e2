use crate::backend::{self, GraphicsBackend};
use crate::data::TypedPayload;
use crate::error::Result;
use crate::types::GlType;

use super::{Buffer, GlObject, Lifecycle};

/// Vertex attribute of a retained program, backed by its own buffer.
pub struct Attribute<B: GraphicsBackend> {
    lifecycle: Lifecycle,
    name: String,
    ty: GlType,
    pub(super) program: Option<B::Program>,
    location: Option<u32>,
    buffer: Buffer<B>,
}

impl<B: GraphicsBackend> Attribute<B> {
    pub fn new(name: impl Into<String>, ty: GlType, buffer: Buffer<B>) -> Self {
        Self {
            lifecycle: Lifecycle::default(),
            name: name.into(),
            ty,
            program: None,
            location: None,
            buffer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gl_type(&self) -> GlType {
        self.ty
    }

    pub fn location(&self) -> Option<u32> {
        self.location
    }

    pub fn buffer(&self) -> &Buffer<B> {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer<B> {
        &mut self.buffer
    }

    pub fn set_data(&mut self, data: TypedPayload) {
        self.buffer.set_data(data);
    }

    /// Vertices in the backing buffer.
    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / self.ty.components()
    }
}

impl<B: GraphicsBackend> GlObject<B> for Attribute<B> {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn create(&mut self, gl: &mut B) -> Result<()> {
        self.location = self
            .program
            .and_then(|program| gl.attrib_location(program, &self.name));
        if self.location.is_none() {
            log::debug!("attribute '{}' is not active", self.name);
        }
        Ok(())
    }

    fn bind(&mut self, gl: &mut B) -> Result<()> {
        self.buffer.activate(gl)?;
        if let Some(location) = self.location {
            backend::configure_vertex_attribute(
                gl,
                location,
                self.ty,
                self.buffer.stride,
                self.buffer.offset,
            );
        }
        Ok(())
    }

    fn update(&mut self, _gl: &mut B) -> Result<()> {
        Ok(())
    }

    fn unbind(&mut self, gl: &mut B) {
        self.buffer.deactivate(gl);
    }

    fn release(&mut self, gl: &mut B) {
        self.buffer.delete(gl);
        self.location = None;
    }
}
