//! OpenGL ES / WebGL backend on top of `glow`.

use glow::HasContext;

use crate::data::TypedPayload;
use crate::types::{DrawMode, IndexType, UniformFn};

use super::{BufferTarget, BufferUsage, GraphicsBackend, ShaderStage, VertexLayout};

/// Backend issuing real GL calls through a `glow::Context`.
///
/// # Safety
///
/// Every trait call issues raw GL commands. The wrapped context must stay
/// current on the calling thread for the whole lifetime of the backend; this
/// is the contract accepted by [`GlowBackend::new`].
pub struct GlowBackend {
    gl: glow::Context,
}

impl GlowBackend {
    /// Wraps a GL context.
    ///
    /// # Safety
    ///
    /// `gl` must be current on this thread whenever the backend is used.
    pub unsafe fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    pub fn into_inner(self) -> glow::Context {
        self.gl
    }
}

impl GraphicsBackend for GlowBackend {
    type Buffer = glow::Buffer;
    type Program = glow::Program;
    type Shader = glow::Shader;
    type UniformLocation = glow::UniformLocation;

    fn create_buffer(&mut self) -> Result<glow::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn delete_buffer(&mut self, buffer: glow::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn create_program(&mut self) -> Result<glow::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn delete_program(&mut self, program: glow::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<glow::Shader, String> {
        unsafe {
            let shader = self.gl.create_shader(stage.gl_enum())?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if self.gl.get_shader_compile_status(shader) {
                Ok(shader)
            } else {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                Err(log)
            }
        }
    }

    fn link_program(
        &mut self,
        program: glow::Program,
        vertex: Option<glow::Shader>,
        fragment: Option<glow::Shader>,
    ) -> Result<(), String> {
        unsafe {
            for shader in [vertex, fragment].into_iter().flatten() {
                self.gl.attach_shader(program, shader);
            }
            self.gl.link_program(program);
            let linked = self.gl.get_program_link_status(program);

            // Stages are no longer needed once the program is linked.
            for shader in [vertex, fragment].into_iter().flatten() {
                self.gl.detach_shader(program, shader);
                self.gl.delete_shader(shader);
            }

            if linked {
                Ok(())
            } else {
                Err(self.gl.get_program_info_log(program))
            }
        }
    }

    fn attrib_location(&mut self, program: glow::Program, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(
        &mut self,
        program: glow::Program,
        name: &str,
    ) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<glow::Buffer>) {
        unsafe { self.gl.bind_buffer(target.gl_enum(), buffer) }
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(target.gl_enum(), data, usage.gl_enum())
        }
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        let Ok(offset) = i32::try_from(offset) else {
            log::warn!("buffer_sub_data offset {offset} exceeds i32 range; skipped");
            return;
        };
        unsafe { self.gl.buffer_sub_data_u8_slice(target.gl_enum(), offset, data) }
    }

    fn enable_vertex_attrib(&mut self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) }
    }

    fn vertex_attrib_pointer(&mut self, location: u32, layout: VertexLayout) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                location,
                layout.size,
                layout.data_type,
                layout.normalized,
                layout.stride,
                layout.offset,
            )
        }
    }

    fn use_program(&mut self, program: Option<glow::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn set_uniform(
        &mut self,
        location: &glow::UniformLocation,
        func: UniformFn,
        value: &TypedPayload,
    ) {
        let loc = Some(location);
        unsafe {
            match (func, value) {
                (UniformFn::Float(1), TypedPayload::F32(v)) => self.gl.uniform_1_f32_slice(loc, v),
                (UniformFn::Float(2), TypedPayload::F32(v)) => self.gl.uniform_2_f32_slice(loc, v),
                (UniformFn::Float(3), TypedPayload::F32(v)) => self.gl.uniform_3_f32_slice(loc, v),
                (UniformFn::Float(4), TypedPayload::F32(v)) => self.gl.uniform_4_f32_slice(loc, v),
                (UniformFn::Int(1), TypedPayload::I32(v)) => self.gl.uniform_1_i32_slice(loc, v),
                (UniformFn::Int(2), TypedPayload::I32(v)) => self.gl.uniform_2_i32_slice(loc, v),
                (UniformFn::Int(3), TypedPayload::I32(v)) => self.gl.uniform_3_i32_slice(loc, v),
                (UniformFn::Int(4), TypedPayload::I32(v)) => self.gl.uniform_4_i32_slice(loc, v),
                (UniformFn::Matrix(2), TypedPayload::F32(v)) => {
                    self.gl.uniform_matrix_2_f32_slice(loc, false, v)
                }
                (UniformFn::Matrix(3), TypedPayload::F32(v)) => {
                    self.gl.uniform_matrix_3_f32_slice(loc, false, v)
                }
                (UniformFn::Matrix(4), TypedPayload::F32(v)) => {
                    self.gl.uniform_matrix_4_f32_slice(loc, false, v)
                }
                (UniformFn::Sampler, TypedPayload::I32(v)) if !v.is_empty() => {
                    self.gl.uniform_1_i32(loc, v[0])
                }
                _ => log::warn!(
                    "{func} cannot upload {} data; skipped",
                    value.element_type()
                ),
            }
        }
    }

    fn clear_color(&mut self, rgba: [f32; 4]) {
        unsafe { self.gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]) }
    }

    fn clear(&mut self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn draw_arrays(&mut self, mode: DrawMode, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode.gl_enum(), first, count) }
    }

    fn draw_elements(&mut self, mode: DrawMode, count: i32, index_type: IndexType, offset: i32) {
        unsafe {
            self.gl
                .draw_elements(mode.gl_enum(), count, index_type.gl_enum(), offset)
        }
    }

    fn enable(&mut self, cap: u32) {
        unsafe { self.gl.enable(cap) }
    }

    fn disable(&mut self, cap: u32) {
        unsafe { self.gl.disable(cap) }
    }

    fn blend_func(&mut self, src: u32, dst: u32) {
        unsafe { self.gl.blend_func(src, dst) }
    }

    fn blend_equation(&mut self, mode: u32) {
        unsafe { self.gl.blend_equation(mode) }
    }

    fn depth_func(&mut self, func: u32) {
        unsafe { self.gl.depth_func(func) }
    }

    fn depth_mask(&mut self, flag: bool) {
        unsafe { self.gl.depth_mask(flag) }
    }

    fn line_width(&mut self, width: f32) {
        unsafe { self.gl.line_width(width) }
    }

    fn cull_face(&mut self, mode: u32) {
        unsafe { self.gl.cull_face(mode) }
    }

    fn front_face(&mut self, mode: u32) {
        unsafe { self.gl.front_face(mode) }
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.scissor(x, y, width, height) }
    }

    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool) {
        unsafe { self.gl.color_mask(r, g, b, a) }
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        unsafe { self.gl.polygon_offset(factor, units) }
    }
}
