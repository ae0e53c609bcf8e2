//! Graphics backend capability.
//!
//! This module is responsible for:
//! - the `GraphicsBackend` trait through which every device call goes
//! - symbolic GL constants and named entry-point invocation (`func` command)
//! - a headless `RecordingBackend` that records calls (replay tool, tests)
//! - an OpenGL / WebGL backend on top of `glow` (feature `glow`)

pub mod consts;
mod func;
mod recording;

#[cfg(feature = "glow")]
mod gles;

use std::fmt;

use crate::data::TypedPayload;
use crate::types::{DrawMode, GlType, IndexType, UniformFn};

pub use func::{FuncArg, invoke};
pub use recording::{BackendCall, RecordingBackend};

#[cfg(feature = "glow")]
pub use gles::GlowBackend;

/// Shader pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => consts::VERTEX_SHADER,
            ShaderStage::Fragment => consts::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Buffer binding point.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferTarget {
    /// `ARRAY_BUFFER` (vertex data).
    Array,
    /// `ELEMENT_ARRAY_BUFFER` (indices).
    ElementArray,
}

impl BufferTarget {
    pub fn gl_enum(self) -> u32 {
        match self {
            BufferTarget::Array => consts::ARRAY_BUFFER,
            BufferTarget::ElementArray => consts::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// Buffer usage hint for allocating uploads.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferUsage {
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

impl BufferUsage {
    pub fn gl_enum(self) -> u32 {
        match self {
            BufferUsage::StaticDraw => consts::STATIC_DRAW,
            BufferUsage::DynamicDraw => consts::DYNAMIC_DRAW,
            BufferUsage::StreamDraw => consts::STREAM_DRAW,
        }
    }
}

/// Arguments of a vertex attribute pointer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexLayout {
    /// Components per vertex (1..=4).
    pub size: i32,
    /// GL data type (`FLOAT`, `INT`, ...).
    pub data_type: u32,
    pub normalized: bool,
    /// Byte stride between consecutive vertices; 0 means tightly packed.
    pub stride: i32,
    /// Byte offset of the first component in the bound buffer.
    pub offset: i32,
}

/// Device capability consumed by the interpreter and the retained layer.
///
/// Mirrors the GL ES 2.0 call surface. Handles are backend-defined; the
/// caller never inspects them beyond equality and debug output.
/// Calls are synchronous; failures the device cannot report synchronously
/// (out-of-range writes, bad enums) are the backend's concern.
pub trait GraphicsBackend {
    type Buffer: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type Shader: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    fn create_buffer(&mut self) -> Result<Self::Buffer, String>;
    fn delete_buffer(&mut self, buffer: Self::Buffer);
    fn create_program(&mut self) -> Result<Self::Program, String>;
    fn delete_program(&mut self, program: Self::Program);

    /// Compiles one stage. `Err` carries the info log.
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String>;

    /// Attaches the given stages (a `None` stage is skipped) and links.
    /// `Err` carries the info log.
    fn link_program(
        &mut self,
        program: Self::Program,
        vertex: Option<Self::Shader>,
        fragment: Option<Self::Shader>,
    ) -> Result<(), String>;

    fn attrib_location(&mut self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(&mut self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<Self::Buffer>);
    /// Allocating upload into the buffer bound at `target`.
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage);
    /// Sub-range update of the buffer bound at `target`.
    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]);

    fn enable_vertex_attrib(&mut self, location: u32);
    fn vertex_attrib_pointer(&mut self, location: u32, layout: VertexLayout);

    fn use_program(&mut self, program: Option<Self::Program>);

    /// Uploads `value`, already coerced to the element kind `func` expects.
    fn set_uniform(&mut self, location: &Self::UniformLocation, func: UniformFn, value: &TypedPayload);

    fn clear_color(&mut self, rgba: [f32; 4]);
    fn clear(&mut self, mask: u32);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);

    fn draw_arrays(&mut self, mode: DrawMode, first: i32, count: i32);
    fn draw_elements(&mut self, mode: DrawMode, count: i32, index_type: IndexType, offset: i32);

    fn enable(&mut self, cap: u32);
    fn disable(&mut self, cap: u32);
    fn blend_func(&mut self, src: u32, dst: u32);
    fn blend_equation(&mut self, mode: u32);
    fn depth_func(&mut self, func: u32);
    fn depth_mask(&mut self, flag: bool);
    fn line_width(&mut self, width: f32);
    fn cull_face(&mut self, mode: u32);
    fn front_face(&mut self, mode: u32);
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn color_mask(&mut self, r: bool, g: bool, b: bool, a: bool);
    fn polygon_offset(&mut self, factor: f32, units: f32);

    /// Resolves a symbolic constant name to its enumerated value.
    fn constant(&self, name: &str) -> Option<u32> {
        consts::lookup(name)
    }
}

/// Enables and points vertex attribute `location` at the bound array buffer.
///
/// Matrix types occupy one location per column (`location + column`), each
/// pointing `dim` floats further into the vertex.
pub fn configure_vertex_attribute<B: GraphicsBackend + ?Sized>(
    gl: &mut B,
    location: u32,
    ty: GlType,
    stride: i32,
    offset: i32,
) {
    let info = ty.info();
    let Some(dim) = ty.matrix_dim() else {
        gl.enable_vertex_attrib(location);
        gl.vertex_attrib_pointer(
            location,
            VertexLayout {
                size: info.components as i32,
                data_type: info.gl_data_type,
                normalized: false,
                stride,
                offset,
            },
        );
        return;
    };

    let column_bytes = (dim * info.element_type.size()) as i32;
    // Columns of a tightly packed matrix are not tightly packed themselves.
    let stride = if stride == 0 {
        column_bytes * dim as i32
    } else {
        stride
    };
    for column in 0..dim {
        let loc = location + column as u32;
        gl.enable_vertex_attrib(loc);
        gl.vertex_attrib_pointer(
            loc,
            VertexLayout {
                size: dim as i32,
                data_type: info.gl_data_type,
                normalized: false,
                stride,
                offset: offset + column as i32 * column_bytes,
            },
        );
    }
}
