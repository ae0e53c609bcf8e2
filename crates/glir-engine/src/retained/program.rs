use crate::backend::{GraphicsBackend, ShaderStage};
use crate::data::TypedPayload;
use crate::error::{GlirError, Result};
use crate::glir::{GlirConfig, shader};
use crate::types::{DrawMode, GlType, IndexType};

use super::{Attribute, Buffer, GlObject, Lifecycle, Uniform};

struct Stages<B: GraphicsBackend> {
    vertex: Option<B::Shader>,
    fragment: Option<B::Shader>,
}

/// Retained shader program with its attributes, uniforms and optional index buffer.
///
/// Stages are compiled at construction and linked on first activation.
/// Compile and link failures are logged and kept as diagnostics; the
/// program stays usable and draws whatever the device makes of it.
pub struct Program<B: GraphicsBackend> {
    lifecycle: Lifecycle,
    handle: Option<B::Program>,
    vertex_source: String,
    fragment_source: String,
    config: GlirConfig,
    stages: Option<Stages<B>>,
    mode: DrawMode,
    attributes: Vec<Attribute<B>>,
    uniforms: Vec<Uniform<B>>,
    index: Option<(Buffer<B>, IndexType)>,
    diagnostics: Vec<GlirError>,
}

impl<B: GraphicsBackend> Program<B> {
    pub fn new(
        gl: &mut B,
        vertex: &str,
        fragment: &str,
        mode: DrawMode,
        config: &GlirConfig,
    ) -> Self {
        let mut program = Self {
            lifecycle: Lifecycle::default(),
            handle: None,
            vertex_source: vertex.to_string(),
            fragment_source: fragment.to_string(),
            config: config.clone(),
            stages: None,
            mode,
            attributes: Vec::new(),
            uniforms: Vec::new(),
            index: None,
            diagnostics: Vec::new(),
        };
        program.stages = Some(program.compile(gl));
        program
    }

    fn compile(&mut self, gl: &mut B) -> Stages<B> {
        let mut compile_stage =
            |stage, source: &str| match shader::compile(gl, stage, source, &self.config) {
                Ok(s) => Some(s),
                Err(e) => {
                    self.diagnostics.push(e);
                    None
                }
            };
        Stages {
            vertex: compile_stage(ShaderStage::Vertex, &self.vertex_source),
            fragment: compile_stage(ShaderStage::Fragment, &self.fragment_source),
        }
    }

    /// Adds an attribute backed by `buffer`.
    ///
    /// Replacing an existing name releases the old attribute's buffer.
    pub fn add_attribute(&mut self, gl: &mut B, name: &str, gtype: &str, buffer: Buffer<B>) -> Result<()> {
        let mut attribute = Attribute::new(name, GlType::parse(gtype)?, buffer);
        attribute.program = self.handle;
        match self.attributes.iter_mut().find(|a| a.name() == name) {
            Some(slot) => {
                slot.delete(gl);
                *slot = attribute;
            }
            None => self.attributes.push(attribute),
        }
        Ok(())
    }

    /// Adds (or replaces) a uniform, optionally with an initial value.
    pub fn add_uniform(
        &mut self,
        gl: &mut B,
        name: &str,
        gtype: &str,
        value: Option<TypedPayload>,
    ) -> Result<()> {
        let mut uniform = Uniform::new(name, GlType::parse(gtype)?);
        uniform.program = self.handle;
        if let Some(value) = value {
            uniform.set_data(value);
        }
        match self.uniforms.iter_mut().find(|u| u.name() == name) {
            Some(slot) => {
                slot.delete(gl);
                *slot = uniform;
            }
            None => self.uniforms.push(uniform),
        }
        Ok(())
    }

    /// Attaches an index buffer; draws become indexed.
    pub fn set_index(&mut self, index_type: IndexType, data: TypedPayload) {
        self.index = Some((Buffer::index(data), index_type));
    }

    /// Routes `data` to the attribute or uniform named `name`.
    pub fn set_data(&mut self, name: &str, data: TypedPayload) -> Result<()> {
        if let Some(attribute) = self.attributes.iter_mut().find(|a| a.name() == name) {
            attribute.set_data(data);
            return Ok(());
        }
        if let Some(uniform) = self.uniforms.iter_mut().find(|u| u.name() == name) {
            uniform.set_data(data);
            return Ok(());
        }
        Err(GlirError::UnknownResource(name.to_string()))
    }

    /// Draws `count` vertices (or indices when indexed).
    ///
    /// `None` draws the first attribute's vertex count, or the whole index buffer.
    pub fn draw(&mut self, gl: &mut B, count: Option<i32>) -> Result<()> {
        self.activate(gl)?;
        match &mut self.index {
            None => {
                let count = count.unwrap_or_else(|| {
                    self.attributes
                        .first()
                        .map_or(0, |a| a.vertex_count() as i32)
                });
                gl.draw_arrays(self.mode, 0, count);
            }
            Some((index, index_type)) => {
                index.activate(gl)?;
                let count = count.unwrap_or(index.len() as i32);
                gl.draw_elements(self.mode, count, *index_type, 0);
                index.deactivate(gl);
            }
        }
        self.deactivate(gl);
        Ok(())
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DrawMode) {
        self.mode = mode;
    }

    pub fn handle(&self) -> Option<B::Program> {
        self.handle
    }

    pub fn attributes(&self) -> &[Attribute<B>] {
        &self.attributes
    }

    pub fn uniforms(&self) -> &[Uniform<B>] {
        &self.uniforms
    }

    pub fn diagnostics(&self) -> &[GlirError] {
        &self.diagnostics
    }
}

impl<B: GraphicsBackend> GlObject<B> for Program<B> {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn create(&mut self, gl: &mut B) -> Result<()> {
        let handle = gl.create_program().map_err(GlirError::BackendCallFailed)?;
        self.handle = Some(handle);
        for attribute in &mut self.attributes {
            attribute.program = Some(handle);
        }
        for uniform in &mut self.uniforms {
            uniform.program = Some(handle);
        }
        Ok(())
    }

    fn bind(&mut self, gl: &mut B) -> Result<()> {
        // Not linked yet.
        if self.lifecycle.needs_update {
            return Ok(());
        }
        gl.use_program(self.handle);
        for attribute in &mut self.attributes {
            attribute.activate(gl)?;
        }
        for uniform in &mut self.uniforms {
            uniform.activate(gl)?;
        }
        Ok(())
    }

    fn update(&mut self, gl: &mut B) -> Result<()> {
        let Some(handle) = self.handle else {
            return Ok(());
        };
        // Stages are consumed by the link; a recreated program compiles again.
        let stages = match self.stages.take() {
            Some(stages) => stages,
            None => self.compile(gl),
        };
        if let Err(e) = shader::link(gl, handle, stages.vertex, stages.fragment) {
            self.diagnostics.push(e);
        }
        Ok(())
    }

    fn unbind(&mut self, gl: &mut B) {
        for attribute in &mut self.attributes {
            attribute.deactivate(gl);
        }
        for uniform in &mut self.uniforms {
            uniform.deactivate(gl);
        }
        gl.use_program(None);
    }

    fn release(&mut self, gl: &mut B) {
        for attribute in &mut self.attributes {
            attribute.delete(gl);
        }
        for uniform in &mut self.uniforms {
            uniform.delete(gl);
        }
        if let Some((index, _)) = &mut self.index {
            index.delete(gl);
        }
        if let Some(handle) = self.handle.take() {
            gl.delete_program(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, RecordingBackend};
    use crate::types::UniformFn;

    const VS: &str = "attribute vec2 a_position; void main() {}";
    const FS: &str = "void main() {}";

    fn triangle(gl: &mut RecordingBackend) -> Program<RecordingBackend> {
        let mut program = Program::new(gl, VS, FS, DrawMode::Triangles, &GlirConfig::default());
        program
            .add_attribute(gl, "a_position", "GL_FLOAT_VEC2", Buffer::vertex(TypedPayload::F32(vec![0.0; 6])))
            .unwrap();
        program
            .add_uniform(gl, "u_color", "GL_FLOAT_VEC4", Some(TypedPayload::F32(vec![1.0; 4])))
            .unwrap();
        program
    }

    #[test]
    fn first_draw_links_then_binds_children() {
        let mut gl = RecordingBackend::new();
        let mut program = triangle(&mut gl);
        program.draw(&mut gl, None).unwrap();

        assert_eq!(gl.count(|c| matches!(c, BackendCall::LinkProgram { linked: true, .. })), 1);
        assert_eq!(gl.count(|c| matches!(c, BackendCall::AttribLocation { .. })), 1);
        assert_eq!(
            gl.count(|c| matches!(c, BackendCall::SetUniform { func: UniformFn::Float(4), .. })),
            1
        );
        assert!(gl.calls().contains(&BackendCall::DrawArrays {
            mode: DrawMode::Triangles,
            first: 0,
            count: 3
        }));
        assert_eq!(gl.calls().last(), Some(&BackendCall::UseProgram(None)));
        assert!(program.diagnostics().is_empty());
    }

    #[test]
    fn second_draw_reuses_everything() {
        let mut gl = RecordingBackend::new();
        let mut program = triangle(&mut gl);
        program.draw(&mut gl, None).unwrap();
        gl.take_calls();
        program.draw(&mut gl, Some(1)).unwrap();

        assert_eq!(gl.count(|c| matches!(c, BackendCall::LinkProgram { .. })), 0);
        assert_eq!(gl.count(|c| matches!(c, BackendCall::BufferData { .. })), 0);
        assert_eq!(gl.count(|c| matches!(c, BackendCall::SetUniform { .. })), 0);
        assert!(gl.calls().contains(&BackendCall::DrawArrays {
            mode: DrawMode::Triangles,
            first: 0,
            count: 1
        }));
    }

    #[test]
    fn indexed_draw_defaults_to_index_count() {
        let mut gl = RecordingBackend::new();
        let mut program = triangle(&mut gl);
        program.set_index(IndexType::UnsignedShort, TypedPayload::U16(vec![0, 1, 2, 2, 1, 0]));
        program.draw(&mut gl, None).unwrap();

        assert!(gl.calls().contains(&BackendCall::DrawElements {
            mode: DrawMode::Triangles,
            count: 6,
            index_type: IndexType::UnsignedShort,
            offset: 0
        }));
        assert_eq!(gl.count(|c| matches!(c, BackendCall::DrawArrays { .. })), 0);
    }

    #[test]
    fn compile_failure_is_kept_as_diagnostic() {
        let mut gl = RecordingBackend::new();
        let mut program = Program::new(&mut gl, "bogus", FS, DrawMode::Points, &GlirConfig::default());
        program.draw(&mut gl, Some(1)).unwrap();

        assert_eq!(program.diagnostics().len(), 2);
        assert_eq!(gl.count(|c| matches!(c, BackendCall::DrawArrays { .. })), 1);
    }

    #[test]
    fn set_data_routes_by_name() {
        let mut gl = RecordingBackend::new();
        let mut program = triangle(&mut gl);
        program.draw(&mut gl, None).unwrap();

        program.set_data("u_color", TypedPayload::F32(vec![0.5; 4])).unwrap();
        program.set_data("a_position", TypedPayload::F32(vec![0.0; 12])).unwrap();
        assert_eq!(
            program.set_data("u_missing", TypedPayload::F32(vec![0.0])),
            Err(GlirError::UnknownResource("u_missing".into()))
        );

        gl.take_calls();
        program.draw(&mut gl, None).unwrap();
        assert_eq!(gl.count(|c| matches!(c, BackendCall::SetUniform { .. })), 1);
        assert!(gl.calls().contains(&BackendCall::DrawArrays {
            mode: DrawMode::Triangles,
            first: 0,
            count: 6
        }));
    }

    #[test]
    fn delete_then_draw_recreates_and_relinks() {
        let mut gl = RecordingBackend::new();
        let mut program = triangle(&mut gl);
        program.draw(&mut gl, None).unwrap();
        program.delete(&mut gl);
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.live_buffers(), 0);

        program.draw(&mut gl, None).unwrap();
        assert_eq!(gl.count(|c| matches!(c, BackendCall::LinkProgram { linked: true, .. })), 2);
        assert_eq!(gl.live_programs(), 1);
    }

    #[test]
    fn replacing_an_attribute_releases_its_buffer() {
        let mut gl = RecordingBackend::new();
        let mut program = triangle(&mut gl);
        program.draw(&mut gl, None).unwrap();
        program
            .add_attribute(&mut gl, "a_position", "GL_FLOAT_VEC2", Buffer::vertex(TypedPayload::F32(vec![1.0; 6])))
            .unwrap();
        assert_eq!(gl.live_buffers(), 0);

        program.draw(&mut gl, None).unwrap();
        assert_eq!(program.attributes().len(), 1);
        assert_eq!(gl.live_buffers(), 1);
        program.delete(&mut gl);
        assert_eq!(gl.live_buffers(), 0);
    }
}
