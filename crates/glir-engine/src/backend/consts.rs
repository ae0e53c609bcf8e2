//! GL ES 2.0 / WebGL 1 symbolic constants.

// Clear bits
pub const DEPTH_BUFFER_BIT: u32 = 0x0000_0100;
pub const STENCIL_BUFFER_BIT: u32 = 0x0000_0400;
pub const COLOR_BUFFER_BIT: u32 = 0x0000_4000;

// Primitive types
pub const POINTS: u32 = 0x0000;
pub const LINES: u32 = 0x0001;
pub const LINE_LOOP: u32 = 0x0002;
pub const LINE_STRIP: u32 = 0x0003;
pub const TRIANGLES: u32 = 0x0004;
pub const TRIANGLE_STRIP: u32 = 0x0005;
pub const TRIANGLE_FAN: u32 = 0x0006;

// Buffer targets and usage
pub const ARRAY_BUFFER: u32 = 0x8892;
pub const ELEMENT_ARRAY_BUFFER: u32 = 0x8893;
pub const STREAM_DRAW: u32 = 0x88E0;
pub const STATIC_DRAW: u32 = 0x88E4;
pub const DYNAMIC_DRAW: u32 = 0x88E8;

// Data types
pub const BYTE: u32 = 0x1400;
pub const UNSIGNED_BYTE: u32 = 0x1401;
pub const SHORT: u32 = 0x1402;
pub const UNSIGNED_SHORT: u32 = 0x1403;
pub const INT: u32 = 0x1404;
pub const UNSIGNED_INT: u32 = 0x1405;
pub const FLOAT: u32 = 0x1406;
pub const BOOL: u32 = 0x8B56;

// Shaders
pub const FRAGMENT_SHADER: u32 = 0x8B30;
pub const VERTEX_SHADER: u32 = 0x8B31;

// Blending
pub const ZERO: u32 = 0;
pub const ONE: u32 = 1;
pub const SRC_COLOR: u32 = 0x0300;
pub const ONE_MINUS_SRC_COLOR: u32 = 0x0301;
pub const SRC_ALPHA: u32 = 0x0302;
pub const ONE_MINUS_SRC_ALPHA: u32 = 0x0303;
pub const DST_ALPHA: u32 = 0x0304;
pub const ONE_MINUS_DST_ALPHA: u32 = 0x0305;
pub const DST_COLOR: u32 = 0x0306;
pub const ONE_MINUS_DST_COLOR: u32 = 0x0307;
pub const FUNC_ADD: u32 = 0x8006;
pub const FUNC_SUBTRACT: u32 = 0x800A;
pub const FUNC_REVERSE_SUBTRACT: u32 = 0x800B;

// Depth functions
pub const NEVER: u32 = 0x0200;
pub const LESS: u32 = 0x0201;
pub const EQUAL: u32 = 0x0202;
pub const LEQUAL: u32 = 0x0203;
pub const GREATER: u32 = 0x0204;
pub const NOTEQUAL: u32 = 0x0205;
pub const GEQUAL: u32 = 0x0206;
pub const ALWAYS: u32 = 0x0207;

// Capabilities
pub const CULL_FACE: u32 = 0x0B44;
pub const DEPTH_TEST: u32 = 0x0B71;
pub const STENCIL_TEST: u32 = 0x0B90;
pub const DITHER: u32 = 0x0BD0;
pub const BLEND: u32 = 0x0BE2;
pub const SCISSOR_TEST: u32 = 0x0C11;
pub const POLYGON_OFFSET_FILL: u32 = 0x8037;
pub const SAMPLE_ALPHA_TO_COVERAGE: u32 = 0x809E;
pub const SAMPLE_COVERAGE: u32 = 0x80A0;

// Faces
pub const FRONT: u32 = 0x0404;
pub const BACK: u32 = 0x0405;
pub const FRONT_AND_BACK: u32 = 0x0408;
pub const CW: u32 = 0x0900;
pub const CCW: u32 = 0x0901;

const TABLE: &[(&str, u32)] = &[
    ("DEPTH_BUFFER_BIT", DEPTH_BUFFER_BIT),
    ("STENCIL_BUFFER_BIT", STENCIL_BUFFER_BIT),
    ("COLOR_BUFFER_BIT", COLOR_BUFFER_BIT),
    ("POINTS", POINTS),
    ("LINES", LINES),
    ("LINE_LOOP", LINE_LOOP),
    ("LINE_STRIP", LINE_STRIP),
    ("TRIANGLES", TRIANGLES),
    ("TRIANGLE_STRIP", TRIANGLE_STRIP),
    ("TRIANGLE_FAN", TRIANGLE_FAN),
    ("ARRAY_BUFFER", ARRAY_BUFFER),
    ("ELEMENT_ARRAY_BUFFER", ELEMENT_ARRAY_BUFFER),
    ("STREAM_DRAW", STREAM_DRAW),
    ("STATIC_DRAW", STATIC_DRAW),
    ("DYNAMIC_DRAW", DYNAMIC_DRAW),
    ("BYTE", BYTE),
    ("UNSIGNED_BYTE", UNSIGNED_BYTE),
    ("SHORT", SHORT),
    ("UNSIGNED_SHORT", UNSIGNED_SHORT),
    ("INT", INT),
    ("UNSIGNED_INT", UNSIGNED_INT),
    ("FLOAT", FLOAT),
    ("BOOL", BOOL),
    ("FRAGMENT_SHADER", FRAGMENT_SHADER),
    ("VERTEX_SHADER", VERTEX_SHADER),
    ("ZERO", ZERO),
    ("ONE", ONE),
    ("SRC_COLOR", SRC_COLOR),
    ("ONE_MINUS_SRC_COLOR", ONE_MINUS_SRC_COLOR),
    ("SRC_ALPHA", SRC_ALPHA),
    ("ONE_MINUS_SRC_ALPHA", ONE_MINUS_SRC_ALPHA),
    ("DST_ALPHA", DST_ALPHA),
    ("ONE_MINUS_DST_ALPHA", ONE_MINUS_DST_ALPHA),
    ("DST_COLOR", DST_COLOR),
    ("ONE_MINUS_DST_COLOR", ONE_MINUS_DST_COLOR),
    ("FUNC_ADD", FUNC_ADD),
    ("FUNC_SUBTRACT", FUNC_SUBTRACT),
    ("FUNC_REVERSE_SUBTRACT", FUNC_REVERSE_SUBTRACT),
    ("NEVER", NEVER),
    ("LESS", LESS),
    ("EQUAL", EQUAL),
    ("LEQUAL", LEQUAL),
    ("GREATER", GREATER),
    ("NOTEQUAL", NOTEQUAL),
    ("GEQUAL", GEQUAL),
    ("ALWAYS", ALWAYS),
    ("CULL_FACE", CULL_FACE),
    ("DEPTH_TEST", DEPTH_TEST),
    ("STENCIL_TEST", STENCIL_TEST),
    ("DITHER", DITHER),
    ("BLEND", BLEND),
    ("SCISSOR_TEST", SCISSOR_TEST),
    ("POLYGON_OFFSET_FILL", POLYGON_OFFSET_FILL),
    ("SAMPLE_ALPHA_TO_COVERAGE", SAMPLE_ALPHA_TO_COVERAGE),
    ("SAMPLE_COVERAGE", SAMPLE_COVERAGE),
    ("FRONT", FRONT),
    ("BACK", BACK),
    ("FRONT_AND_BACK", FRONT_AND_BACK),
    ("CW", CW),
    ("CCW", CCW),
];

/// Looks up a constant by name. The `GL_` prefix is optional; matching is
/// case-insensitive.
pub fn lookup(name: &str) -> Option<u32> {
    let bare = crate::types::strip_gl_prefix(name);
    TABLE
        .iter()
        .find(|(n, _)| bare.eq_ignore_ascii_case(n))
        .map(|&(_, v)| v)
}
