use std::ops::{Deref, DerefMut};

use crate::backend::GraphicsBackend;

/// Makes a program current for the guard's lifetime.
///
/// Dropping the guard unbinds the program, including on early `?` returns.
pub struct ActiveProgram<'a, B: GraphicsBackend + ?Sized> {
    gl: &'a mut B,
}

impl<'a, B: GraphicsBackend + ?Sized> ActiveProgram<'a, B> {
    pub fn new(gl: &'a mut B, program: B::Program) -> Self {
        gl.use_program(Some(program));
        Self { gl }
    }
}

impl<B: GraphicsBackend + ?Sized> Deref for ActiveProgram<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.gl
    }
}

impl<B: GraphicsBackend + ?Sized> DerefMut for ActiveProgram<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.gl
    }
}

impl<B: GraphicsBackend + ?Sized> Drop for ActiveProgram<'_, B> {
    fn drop(&mut self) {
        self.gl.use_program(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, RecordingBackend};
    use crate::types::DrawMode;

    #[test]
    fn binds_for_scope_only() {
        let mut gl = RecordingBackend::new();
        let program = gl.create_program().unwrap();
        {
            let mut active = ActiveProgram::new(&mut gl, program);
            active.draw_arrays(DrawMode::Points, 0, 1);
        }
        assert_eq!(&gl.calls()[1..], &[
            BackendCall::UseProgram(Some(program)),
            BackendCall::DrawArrays {
                mode: DrawMode::Points,
                first: 0,
                count: 1
            },
            BackendCall::UseProgram(None),
        ]);
    }
}
