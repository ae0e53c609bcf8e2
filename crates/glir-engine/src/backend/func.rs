use serde_json::Value;

use crate::error::{GlirError, Result};

use super::GraphicsBackend;

/// Positional argument of a named entry-point call.
///
/// Symbolic constants are resolved to `Number` before invocation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FuncArg {
    Number(f64),
    Bool(bool),
}

impl FuncArg {
    /// Converts a JSON argument, resolving constant names through `backend`.
    pub fn from_json<B: GraphicsBackend + ?Sized>(backend: &B, value: &Value) -> Result<Self> {
        match value {
            Value::String(name) => backend
                .constant(name)
                .map(|v| FuncArg::Number(f64::from(v)))
                .ok_or_else(|| GlirError::BackendCallFailed(format!("unknown constant '{name}'"))),
            Value::Number(n) => n
                .as_f64()
                .map(FuncArg::Number)
                .ok_or_else(|| GlirError::BackendCallFailed(format!("bad number {n}"))),
            Value::Bool(b) => Ok(FuncArg::Bool(*b)),
            other => Err(GlirError::BackendCallFailed(format!(
                "unsupported argument {other}"
            ))),
        }
    }
}

struct Args<'a> {
    name: &'a str,
    args: &'a [FuncArg],
}

impl Args<'_> {
    fn arity(&self, n: usize) -> Result<()> {
        if self.args.len() != n {
            return Err(GlirError::BackendCallFailed(format!(
                "{} expects {n} arguments, got {}",
                self.name,
                self.args.len()
            )));
        }
        Ok(())
    }

    fn number(&self, i: usize) -> Result<f64> {
        match self.args[i] {
            FuncArg::Number(v) => Ok(v),
            FuncArg::Bool(_) => Err(self.bad(i, "a number")),
        }
    }

    fn u32(&self, i: usize) -> Result<u32> {
        let v = self.number(i)?;
        if v < 0.0 || v.fract() != 0.0 || v > f64::from(u32::MAX) {
            return Err(self.bad(i, "an enum or unsigned integer"));
        }
        Ok(v as u32)
    }

    fn i32(&self, i: usize) -> Result<i32> {
        let v = self.number(i)?;
        if v.fract() != 0.0 || v < f64::from(i32::MIN) || v > f64::from(i32::MAX) {
            return Err(self.bad(i, "an integer"));
        }
        Ok(v as i32)
    }

    fn f32(&self, i: usize) -> Result<f32> {
        Ok(self.number(i)? as f32)
    }

    fn bool(&self, i: usize) -> bool {
        match self.args[i] {
            FuncArg::Bool(b) => b,
            FuncArg::Number(v) => v != 0.0,
        }
    }

    fn bad(&self, i: usize, expected: &str) -> GlirError {
        GlirError::BackendCallFailed(format!(
            "{} argument {i} must be {expected}, got {:?}",
            self.name, self.args[i]
        ))
    }
}

/// Invokes a GL entry point by name with positional arguments.
///
/// Names match the WebGL spelling (`clearColor`) or snake case
/// (`clear_color`), case-insensitively.
pub fn invoke<B: GraphicsBackend + ?Sized>(gl: &mut B, name: &str, args: &[FuncArg]) -> Result<()> {
    let a = Args { name, args };
    let key: String = name
        .chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    match key.as_str() {
        "viewport" => {
            a.arity(4)?;
            gl.viewport(a.i32(0)?, a.i32(1)?, a.i32(2)?, a.i32(3)?);
        }
        "scissor" => {
            a.arity(4)?;
            gl.scissor(a.i32(0)?, a.i32(1)?, a.i32(2)?, a.i32(3)?);
        }
        "clearcolor" => {
            a.arity(4)?;
            gl.clear_color([a.f32(0)?, a.f32(1)?, a.f32(2)?, a.f32(3)?]);
        }
        "clear" => {
            a.arity(1)?;
            gl.clear(a.u32(0)?);
        }
        "enable" => {
            a.arity(1)?;
            gl.enable(a.u32(0)?);
        }
        "disable" => {
            a.arity(1)?;
            gl.disable(a.u32(0)?);
        }
        "blendfunc" => {
            a.arity(2)?;
            gl.blend_func(a.u32(0)?, a.u32(1)?);
        }
        "blendequation" => {
            a.arity(1)?;
            gl.blend_equation(a.u32(0)?);
        }
        "depthfunc" => {
            a.arity(1)?;
            gl.depth_func(a.u32(0)?);
        }
        "depthmask" => {
            a.arity(1)?;
            gl.depth_mask(a.bool(0));
        }
        "linewidth" => {
            a.arity(1)?;
            gl.line_width(a.f32(0)?);
        }
        "cullface" => {
            a.arity(1)?;
            gl.cull_face(a.u32(0)?);
        }
        "frontface" => {
            a.arity(1)?;
            gl.front_face(a.u32(0)?);
        }
        "colormask" => {
            a.arity(4)?;
            gl.color_mask(a.bool(0), a.bool(1), a.bool(2), a.bool(3));
        }
        "polygonoffset" => {
            a.arity(2)?;
            gl.polygon_offset(a.f32(0)?, a.f32(1)?);
        }
        _ => {
            return Err(GlirError::BackendCallFailed(format!(
                "no entry point named '{name}'"
            )));
        }
    }
    Ok(())
}
