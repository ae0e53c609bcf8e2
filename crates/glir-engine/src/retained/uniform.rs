use crate::backend::GraphicsBackend;
use crate::data::TypedPayload;
use crate::error::Result;
use crate::types::{GlType, UniformFn};

use super::{GlObject, Lifecycle};

/// Uniform of a retained program.
pub struct Uniform<B: GraphicsBackend> {
    lifecycle: Lifecycle,
    name: String,
    ty: GlType,
    func: UniformFn,
    pub(super) program: Option<B::Program>,
    location: Option<B::UniformLocation>,
    value: Option<TypedPayload>,
}

impl<B: GraphicsBackend> Uniform<B> {
    pub fn new(name: impl Into<String>, ty: GlType) -> Self {
        Self {
            lifecycle: Lifecycle::default(),
            name: name.into(),
            ty,
            func: ty.uniform_fn(),
            program: None,
            location: None,
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gl_type(&self) -> GlType {
        self.ty
    }

    pub fn value(&self) -> Option<&TypedPayload> {
        self.value.as_ref()
    }

    /// Sets the value; uploaded on the next activation.
    pub fn set_data(&mut self, value: TypedPayload) {
        self.value = Some(value);
        self.lifecycle.needs_update = true;
    }
}

impl<B: GraphicsBackend> GlObject<B> for Uniform<B> {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn create(&mut self, gl: &mut B) -> Result<()> {
        self.location = self
            .program
            .and_then(|program| gl.uniform_location(program, &self.name));
        Ok(())
    }

    // Textures are not supported; nothing to bind.
    fn bind(&mut self, _gl: &mut B) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, gl: &mut B) -> Result<()> {
        let Some(value) = &self.value else {
            return Ok(());
        };
        let value = self.func.coerce(value)?;
        match &self.location {
            Some(location) => gl.set_uniform(location, self.func, &value),
            None => log::debug!("uniform '{}' is not active", self.name),
        }
        Ok(())
    }

    fn release(&mut self, _gl: &mut B) {
        self.location = None;
    }
}
