use std::collections::{HashMap, HashSet};

use crate::data::TypedPayload;
use crate::types::{DrawMode, IndexType, UniformFn};

use super::{BufferTarget, BufferUsage, GraphicsBackend, ShaderStage, VertexLayout};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateBuffer(u32),
    DeleteBuffer(u32),
    CreateProgram(u32),
    DeleteProgram(u32),
    CompileShader {
        stage: ShaderStage,
        shader: Option<u32>,
    },
    LinkProgram {
        program: u32,
        vertex: Option<u32>,
        fragment: Option<u32>,
        linked: bool,
    },
    AttribLocation {
        program: u32,
        name: String,
    },
    UniformLocation {
        program: u32,
        name: String,
    },
    BindBuffer {
        target: BufferTarget,
        buffer: Option<u32>,
    },
    BufferData {
        target: BufferTarget,
        size: usize,
        usage: BufferUsage,
    },
    BufferSubData {
        target: BufferTarget,
        offset: usize,
        size: usize,
    },
    EnableVertexAttrib(u32),
    VertexAttribPointer {
        location: u32,
        layout: VertexLayout,
    },
    UseProgram(Option<u32>),
    SetUniform {
        location: u32,
        func: UniformFn,
        value: TypedPayload,
    },
    ClearColor([f32; 4]),
    Clear(u32),
    Viewport {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    DrawArrays {
        mode: DrawMode,
        first: i32,
        count: i32,
    },
    DrawElements {
        mode: DrawMode,
        count: i32,
        index_type: IndexType,
        offset: i32,
    },
    Enable(u32),
    Disable(u32),
    BlendFunc {
        src: u32,
        dst: u32,
    },
    BlendEquation(u32),
    DepthFunc(u32),
    DepthMask(bool),
    LineWidth(f32),
    CullFace(u32),
    FrontFace(u32),
    Scissor {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    ColorMask([bool; 4]),
    PolygonOffset {
        factor: f32,
        units: f32,
    },
}

#[derive(Debug, Default)]
struct ProgramState {
    attributes: HashMap<String, u32>,
}

/// Headless backend that records every call.
///
/// Used by the replay tool to print call traces and by tests as a call-count
/// spy. Device behavior is simulated just enough to be observable:
/// - handles are unique, increasing integers starting at 1
/// - a shader compiles iff its source contains `void main`
/// - a program links iff both stages are present
/// - attribute locations are assigned per program in first-query order
/// - names passed to [`RecordingBackend::set_inactive`] have no location
/// - allocated buffer sizes are tracked per handle
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    next_handle: u32,

    buffers: HashMap<u32, usize>,
    bound: HashMap<BufferTarget, u32>,
    programs: HashMap<u32, ProgramState>,
    uniforms: HashMap<(u32, String), u32>,
    inactive: HashSet<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls in issue order.
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Drains the recorded calls, keeping simulated device state.
    pub fn take_calls(&mut self) -> Vec<BackendCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Allocated size of a live buffer; `Some(0)` before the first allocating upload.
    pub fn buffer_size(&self, buffer: u32) -> Option<usize> {
        self.buffers.get(&buffer).copied()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    /// Reports `name` as an inactive attribute or uniform in every program.
    pub fn set_inactive(&mut self, name: impl Into<String>) {
        self.inactive.insert(name.into());
    }

    fn alloc_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GraphicsBackend for RecordingBackend {
    type Buffer = u32;
    type Program = u32;
    type Shader = u32;
    type UniformLocation = u32;

    fn create_buffer(&mut self) -> Result<u32, String> {
        let handle = self.alloc_handle();
        self.buffers.insert(handle, 0);
        self.calls.push(BackendCall::CreateBuffer(handle));
        Ok(handle)
    }

    fn delete_buffer(&mut self, buffer: u32) {
        self.buffers.remove(&buffer);
        self.bound.retain(|_, b| *b != buffer);
        self.calls.push(BackendCall::DeleteBuffer(buffer));
    }

    fn create_program(&mut self) -> Result<u32, String> {
        let handle = self.alloc_handle();
        self.programs.insert(handle, ProgramState::default());
        self.calls.push(BackendCall::CreateProgram(handle));
        Ok(handle)
    }

    fn delete_program(&mut self, program: u32) {
        self.programs.remove(&program);
        self.uniforms.retain(|(p, _), _| *p != program);
        self.calls.push(BackendCall::DeleteProgram(program));
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<u32, String> {
        if !source.contains("void main") {
            self.calls.push(BackendCall::CompileShader {
                stage,
                shader: None,
            });
            return Err(format!("ERROR: 0:1: 'main' : no {stage} entry point defined"));
        }
        let handle = self.alloc_handle();
        self.calls.push(BackendCall::CompileShader {
            stage,
            shader: Some(handle),
        });
        Ok(handle)
    }

    fn link_program(
        &mut self,
        program: u32,
        vertex: Option<u32>,
        fragment: Option<u32>,
    ) -> Result<(), String> {
        let linked = vertex.is_some() && fragment.is_some() && self.programs.contains_key(&program);
        self.calls.push(BackendCall::LinkProgram {
            program,
            vertex,
            fragment,
            linked,
        });
        if linked {
            Ok(())
        } else {
            Err(format!("program {program}: missing or invalid shader stage"))
        }
    }

    fn attrib_location(&mut self, program: u32, name: &str) -> Option<u32> {
        self.calls.push(BackendCall::AttribLocation {
            program,
            name: name.to_string(),
        });
        if self.inactive.contains(name) {
            return None;
        }
        let state = self.programs.get_mut(&program)?;
        let next = state.attributes.len() as u32;
        Some(*state.attributes.entry(name.to_string()).or_insert(next))
    }

    fn uniform_location(&mut self, program: u32, name: &str) -> Option<u32> {
        self.calls.push(BackendCall::UniformLocation {
            program,
            name: name.to_string(),
        });
        if !self.programs.contains_key(&program) || self.inactive.contains(name) {
            return None;
        }
        let key = (program, name.to_string());
        if let Some(&loc) = self.uniforms.get(&key) {
            return Some(loc);
        }
        let loc = self.alloc_handle();
        self.uniforms.insert(key, loc);
        Some(loc)
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<u32>) {
        match buffer {
            Some(b) => self.bound.insert(target, b),
            None => self.bound.remove(&target),
        };
        self.calls.push(BackendCall::BindBuffer { target, buffer });
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        if let Some(size) = self.bound.get(&target).and_then(|b| self.buffers.get_mut(b)) {
            *size = data.len();
        }
        self.calls.push(BackendCall::BufferData {
            target,
            size: data.len(),
            usage,
        });
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        let allocated = self.bound.get(&target).and_then(|b| self.buffers.get(b)).copied();
        match allocated {
            Some(allocated) if offset + data.len() > allocated => log::warn!(
                "buffer_sub_data out of range: {} bytes at {offset} into {allocated}-byte buffer",
                data.len()
            ),
            _ => {}
        }
        self.calls.push(BackendCall::BufferSubData {
            target,
            offset,
            size: data.len(),
        });
    }

    fn enable_vertex_attrib(&mut self, location: u32) {
        self.calls.push(BackendCall::EnableVertexAttrib(location));
    }

    fn vertex_attrib_pointer(&mut self, location: u32, layout: VertexLayout) {
        self.calls
            .push(BackendCall::VertexAttribPointer { location, layout });
    }

    fn use_program(&mut self, program: Option<u32>) {
        self.calls.push(BackendCall::UseProgram(program));
    }

    fn set_uniform(&mut self, location: &u32, func: UniformFn, value: &TypedPayload) {
        self.calls.push(BackendCall::SetUniform {
            location: *location,
            func,
            value: value.clone(),
        });
    }

    fn clear_color(&mut self, rgba: [f32; 4]) {
        self.calls.push(BackendCall::ClearColor(rgba));
    }

    fn clear(&mut self, mask: u32) {
        self.calls.push(BackendCall::Clear(mask));
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.calls.push(BackendCall::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn draw_arrays(&mut self, mode: DrawMode, first: i32, count: i32) {
        self.calls
            .push(BackendCall::DrawArrays { mode, first, count });
    }

    fn draw_elements(&mut self, mode: DrawMode, count: i32, index_type: IndexType, offset: i32) {
        self.calls.push(BackendCall::DrawElements {
            mode,
            count,
            index_type,
            offset,
        });
    }

    fn enable(&mut self, cap: u32) {
        self.calls.push(BackendCall::Enable(cap));
    }

    fn disable(&mut self, cap: u32) {
        self.calls.push(BackendCall::Disable(cap));
    }

    fn blend_func(&mut self, src: u32, dst: u32) {
        self.calls.push(BackendCall::BlendFunc { src, dst });
    }

    fn blend_equation(&mut self, mode: u32) {
        self.calls.push(BackendCall::BlendEquation(mode));
    }

    fn depth_func(&mut self, func: u32) {
        self.calls.push(BackendCall::DepthFunc(func));
    }

    fn depth_mask(&mut self, flag: bool) {
        self.calls.push(BackendCall::DepthMask(flag));
    }

    fn line_width(&mut self, width: f32) {
        self.calls.push(BackendCall::LineWidth(width));
    }

    fn cull_face(&mut self, mode: u32) {
        self.calls.push(BackendCall::CullFace(mode));
    }

    fn front_face(&mut self, mode: u32) {
        self.calls.push(BackendCall::FrontFace(mode));
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.calls.push(BackendCall::Scissor {
            x,
            y,
            width,
            height,
        });
    }

    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool) {
        self.calls.push(BackendCall::ColorMask([r, g, b, a]));
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.calls.push(BackendCall::PolygonOffset { factor, units });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique() {
        let mut gl = RecordingBackend::new();
        let a = gl.create_buffer().unwrap();
        let b = gl.create_buffer().unwrap();
        let p = gl.create_program().unwrap();
        assert!(a != b && b != p);
        assert_eq!(gl.live_buffers(), 2);
        gl.delete_buffer(a);
        assert_eq!(gl.live_buffers(), 1);
        assert_eq!(gl.buffer_size(a), None);
    }

    #[test]
    fn tracks_allocated_size_of_bound_buffer() {
        let mut gl = RecordingBackend::new();
        let b = gl.create_buffer().unwrap();
        assert_eq!(gl.buffer_size(b), Some(0));
        gl.bind_buffer(BufferTarget::Array, Some(b));
        gl.buffer_data(BufferTarget::Array, &[0; 12], BufferUsage::StaticDraw);
        assert_eq!(gl.buffer_size(b), Some(12));
        gl.buffer_sub_data(BufferTarget::Array, 4, &[1; 4]);
        assert_eq!(gl.buffer_size(b), Some(12));
    }

    #[test]
    fn compile_and_link_rules() {
        let mut gl = RecordingBackend::new();
        let p = gl.create_program().unwrap();
        let vs = gl.compile_shader(ShaderStage::Vertex, "void main() {}").ok();
        let fs = gl.compile_shader(ShaderStage::Fragment, "garbage").ok();
        assert!(vs.is_some());
        assert!(fs.is_none());
        assert!(gl.link_program(p, vs, fs).is_err());
        let fs = gl.compile_shader(ShaderStage::Fragment, "void main() {}").ok();
        assert!(gl.link_program(p, vs, fs).is_ok());
    }

    #[test]
    fn attribute_locations_are_stable_per_program() {
        let mut gl = RecordingBackend::new();
        let p = gl.create_program().unwrap();
        assert_eq!(gl.attrib_location(p, "a_position"), Some(0));
        assert_eq!(gl.attrib_location(p, "a_color"), Some(1));
        assert_eq!(gl.attrib_location(p, "a_position"), Some(0));
        assert_eq!(gl.attrib_location(999, "a_position"), None);
    }
}
