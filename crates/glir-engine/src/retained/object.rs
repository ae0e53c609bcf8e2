use crate::backend::GraphicsBackend;
use crate::error::Result;

/// Deferred-work flags of a retained object.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Lifecycle {
    pub needs_create: bool,
    pub needs_update: bool,
    pub needs_delete: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            needs_create: true,
            needs_update: true,
            needs_delete: false,
        }
    }
}

/// Retained GPU object with lazily performed create / update work.
///
/// Implementors provide the primitive steps; callers use the provided
/// `activate`, `deactivate` and `delete`.
pub trait GlObject<B: GraphicsBackend> {
    fn lifecycle(&self) -> &Lifecycle;
    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Acquires the device handle.
    fn create(&mut self, gl: &mut B) -> Result<()>;
    /// Makes the object current.
    fn bind(&mut self, gl: &mut B) -> Result<()>;
    /// Pushes pending state to the device.
    fn update(&mut self, gl: &mut B) -> Result<()>;
    fn unbind(&mut self, _gl: &mut B) {}
    /// Releases the device handle.
    fn release(&mut self, gl: &mut B);

    /// Create once, bind, then update once followed by a second bind.
    fn activate(&mut self, gl: &mut B) -> Result<()> {
        if self.lifecycle().needs_create {
            self.create(gl)?;
            let state = self.lifecycle_mut();
            state.needs_create = false;
            state.needs_delete = true;
        }
        self.bind(gl)?;
        if self.lifecycle().needs_update {
            self.update(gl)?;
            self.lifecycle_mut().needs_update = false;
            self.bind(gl)?;
        }
        Ok(())
    }

    fn deactivate(&mut self, gl: &mut B) {
        self.unbind(gl);
    }

    /// Releases the handle if one was created; the next activation recreates it.
    fn delete(&mut self, gl: &mut B) {
        if !self.lifecycle().needs_delete {
            return;
        }
        self.release(gl);
        *self.lifecycle_mut() = Lifecycle::default();
    }
}
