use std::fmt;

use serde_json::Value;

use crate::data::DataDescriptor;
use crate::error::{GlirError, Result};
use crate::types::{DrawMode, IndexType};

/// Kind of a GLIR resource.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    VertexBuffer,
    IndexBuffer,
    Program,
}

impl ResourceKind {
    /// Parses `VertexBuffer`, `IndexBuffer` or `Program` (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        [
            ResourceKind::VertexBuffer,
            ResourceKind::IndexBuffer,
            ResourceKind::Program,
        ]
        .into_iter()
        .find(|k| name.eq_ignore_ascii_case(k.name()))
    }

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::VertexBuffer => "VertexBuffer",
            ResourceKind::IndexBuffer => "IndexBuffer",
            ResourceKind::Program => "Program",
        }
    }

    pub fn is_buffer(self) -> bool {
        matches!(self, ResourceKind::VertexBuffer | ResourceKind::IndexBuffer)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Vertex range of a draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawSelection {
    /// Non-indexed draw over `[start, start + count)`.
    Arrays { start: i32, count: i32 },
    /// Indexed draw of `count` indices from `index_buffer`.
    Elements {
        index_buffer: String,
        index_type: IndexType,
        count: i32,
    },
}

/// One GLIR command.
///
/// Wire form: `[operation, ...args]` with a case-insensitive operation name.
/// Symbolic types stay strings until execution so a bad type fails the
/// command at the point it is used.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create {
        id: String,
        kind: ResourceKind,
    },
    Delete {
        id: String,
    },
    Shaders {
        program: String,
        vertex: String,
        fragment: String,
    },
    Data {
        buffer: String,
        offset: usize,
        payload: DataDescriptor,
    },
    Attribute {
        program: String,
        name: String,
        gtype: String,
        buffer: String,
        stride: i32,
        offset: i32,
    },
    Uniform {
        program: String,
        name: String,
        gtype: String,
        value: DataDescriptor,
    },
    Draw {
        program: String,
        mode: DrawMode,
        selection: DrawSelection,
    },
    Func {
        name: String,
        args: Vec<Value>,
    },
}

/// Positional argument reader for one command.
struct Args<'a> {
    op: &'static str,
    args: &'a [Value],
}

impl<'a> Args<'a> {
    fn at_least(&self, n: usize) -> Result<()> {
        if self.args.len() < n {
            return Err(GlirError::malformed(
                self.op,
                format!("expected {n} arguments, got {}", self.args.len()),
            ));
        }
        Ok(())
    }

    fn value(&self, i: usize) -> Result<&'a Value> {
        self.args
            .get(i)
            .ok_or_else(|| GlirError::malformed(self.op, format!("missing argument {i}")))
    }

    fn str(&self, i: usize) -> Result<&'a str> {
        self.value(i)?
            .as_str()
            .ok_or_else(|| GlirError::malformed(self.op, format!("argument {i} must be a string")))
    }

    fn string(&self, i: usize) -> Result<String> {
        self.str(i).map(str::to_string)
    }

    fn int(&self, i: usize) -> Result<i64> {
        let v = self.value(i)?;
        v.as_i64()
            .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| GlirError::malformed(self.op, format!("argument {i} must be an integer")))
    }

    fn i32(&self, i: usize) -> Result<i32> {
        i32::try_from(self.int(i)?)
            .map_err(|_| GlirError::malformed(self.op, format!("argument {i} out of range")))
    }

    fn usize(&self, i: usize) -> Result<usize> {
        usize::try_from(self.int(i)?)
            .map_err(|_| GlirError::malformed(self.op, format!("argument {i} must be non-negative")))
    }
}

impl Command {
    /// Canonical lower-case operation name.
    pub fn op(&self) -> &'static str {
        match self {
            Command::Create { .. } => "create",
            Command::Delete { .. } => "delete",
            Command::Shaders { .. } => "shaders",
            Command::Data { .. } => "data",
            Command::Attribute { .. } => "attribute",
            Command::Uniform { .. } => "uniform",
            Command::Draw { .. } => "draw",
            Command::Func { .. } => "func",
        }
    }

    /// Parses the JSON wire form `[operation, ...args]`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| GlirError::malformed("command", "expected an array"))?;
        let (op, rest) = items
            .split_first()
            .ok_or_else(|| GlirError::malformed("command", "empty command"))?;
        let op = op
            .as_str()
            .ok_or_else(|| GlirError::malformed("command", "operation must be a string"))?;

        match op.to_ascii_lowercase().as_str() {
            "create" => {
                let a = Args { op: "create", args: rest };
                a.at_least(2)?;
                let kind_name = a.str(1)?;
                let kind = ResourceKind::parse(kind_name).ok_or_else(|| {
                    GlirError::malformed("create", format!("unknown resource kind '{kind_name}'"))
                })?;
                Ok(Command::Create {
                    id: a.string(0)?,
                    kind,
                })
            }
            "delete" => {
                let a = Args { op: "delete", args: rest };
                a.at_least(1)?;
                Ok(Command::Delete { id: a.string(0)? })
            }
            "shaders" => {
                let a = Args { op: "shaders", args: rest };
                a.at_least(3)?;
                Ok(Command::Shaders {
                    program: a.string(0)?,
                    vertex: a.string(1)?,
                    fragment: a.string(2)?,
                })
            }
            "data" => {
                let a = Args { op: "data", args: rest };
                a.at_least(3)?;
                Ok(Command::Data {
                    buffer: a.string(0)?,
                    offset: a.usize(1)?,
                    payload: DataDescriptor::from_json(a.value(2)?, None)?,
                })
            }
            "attribute" => {
                let a = Args { op: "attribute", args: rest };
                a.at_least(4)?;
                let stride = if rest.len() > 4 { a.i32(4)? } else { 0 };
                let offset = if rest.len() > 5 { a.i32(5)? } else { 0 };
                Ok(Command::Attribute {
                    program: a.string(0)?,
                    name: a.string(1)?,
                    gtype: a.string(2)?,
                    buffer: a.string(3)?,
                    stride,
                    offset,
                })
            }
            "uniform" => {
                let a = Args { op: "uniform", args: rest };
                a.at_least(4)?;
                Ok(Command::Uniform {
                    program: a.string(0)?,
                    name: a.string(1)?,
                    gtype: a.string(2)?,
                    value: DataDescriptor::from_json(a.value(3)?, None)?,
                })
            }
            "draw" => {
                let a = Args { op: "draw", args: rest };
                a.at_least(3)?;
                let mode = match a.value(1)? {
                    Value::String(name) => DrawMode::parse(name)?,
                    _ => DrawMode::from_gl(u32::try_from(a.int(1)?).map_err(|_| {
                        GlirError::malformed("draw", "mode out of range")
                    })?)?,
                };
                Ok(Command::Draw {
                    program: a.string(0)?,
                    mode,
                    selection: parse_selection(a.value(2)?)?,
                })
            }
            "func" => {
                let a = Args { op: "func", args: rest };
                a.at_least(1)?;
                Ok(Command::Func {
                    name: a.string(0)?,
                    args: rest[1..].to_vec(),
                })
            }
            _ => Err(GlirError::UnknownOperation(op.to_string())),
        }
    }
}

fn parse_selection(value: &Value) -> Result<DrawSelection> {
    let items = value
        .as_array()
        .ok_or_else(|| GlirError::malformed("draw", "selection must be an array"))?;
    let a = Args {
        op: "draw",
        args: items,
    };
    match items.len() {
        2 => Ok(DrawSelection::Arrays {
            start: a.i32(0)?,
            count: a.i32(1)?,
        }),
        3 => Ok(DrawSelection::Elements {
            index_buffer: a.string(0)?,
            index_type: IndexType::parse(a.str(1)?)?,
            count: a.i32(2)?,
        }),
        n => Err(GlirError::malformed(
            "draw",
            format!("selection must have 2 or 3 items, got {n}"),
        )),
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Create { id, kind } => write!(f, "create '{id}' {kind}"),
            Command::Delete { id } => write!(f, "delete '{id}'"),
            Command::Shaders { program, .. } => write!(f, "shaders '{program}'"),
            Command::Data { buffer, offset, .. } => write!(f, "data '{buffer}' @{offset}"),
            Command::Attribute { program, name, .. } => write!(f, "attribute '{program}'.{name}"),
            Command::Uniform { program, name, .. } => write!(f, "uniform '{program}'.{name}"),
            Command::Draw { program, mode, .. } => write!(f, "draw '{program}' {mode:?}"),
            Command::Func { name, .. } => write!(f, "func {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: Value) -> Result<Command> {
        Command::from_json(&v)
    }

    #[test]
    fn operation_names_are_case_insensitive() {
        let cmd = parse(json!(["CREATE", "vb", "VertexBuffer"])).unwrap();
        assert_eq!(
            cmd,
            Command::Create {
                id: "vb".into(),
                kind: ResourceKind::VertexBuffer
            }
        );
        assert_eq!(parse(json!(["Delete", "vb"])).unwrap().op(), "delete");
    }

    #[test]
    fn unknown_operation() {
        assert_eq!(
            parse(json!(["texture", "t"])),
            Err(GlirError::UnknownOperation("texture".into()))
        );
    }

    #[test]
    fn create_rejects_unknown_kind() {
        assert!(matches!(
            parse(json!(["create", "t", "Texture2D"])),
            Err(GlirError::MalformedCommand { op: "create", .. })
        ));
    }

    #[test]
    fn data_with_inline_payload() {
        let cmd = parse(json!(["data", "vb", 16, [1.0, 2.0]])).unwrap();
        assert_eq!(
            cmd,
            Command::Data {
                buffer: "vb".into(),
                offset: 16,
                payload: DataDescriptor::floats([1.0, 2.0]),
            }
        );
        assert!(parse(json!(["data", "vb", -1, [1.0]])).is_err());
    }

    #[test]
    fn attribute_stride_and_offset_default_to_zero() {
        let cmd = parse(json!(["attribute", "p", "a_pos", "vec2", "vb"])).unwrap();
        assert!(matches!(cmd, Command::Attribute { stride: 0, offset: 0, .. }));
        let cmd = parse(json!(["attribute", "p", "a_pos", "vec2", "vb", 16, 8])).unwrap();
        assert!(matches!(cmd, Command::Attribute { stride: 16, offset: 8, .. }));
    }

    #[test]
    fn draw_selections() {
        let cmd = parse(json!(["draw", "p", "TRIANGLES", [0, 3]])).unwrap();
        assert_eq!(
            cmd,
            Command::Draw {
                program: "p".into(),
                mode: DrawMode::Triangles,
                selection: DrawSelection::Arrays { start: 0, count: 3 },
            }
        );

        let cmd = parse(json!(["draw", "p", 4, ["ib", "UNSIGNED_SHORT", 6]])).unwrap();
        assert_eq!(
            cmd,
            Command::Draw {
                program: "p".into(),
                mode: DrawMode::Triangles,
                selection: DrawSelection::Elements {
                    index_buffer: "ib".into(),
                    index_type: IndexType::UnsignedShort,
                    count: 6,
                },
            }
        );

        assert!(parse(json!(["draw", "p", "LINES", [0]])).is_err());
    }

    #[test]
    fn func_keeps_raw_arguments() {
        let cmd = parse(json!(["func", "clearColor", 0, 0, 0, 1])).unwrap();
        assert_eq!(
            cmd,
            Command::Func {
                name: "clearColor".into(),
                args: vec![json!(0), json!(0), json!(0), json!(1)],
            }
        );
    }

    #[test]
    fn malformed_shapes() {
        assert!(parse(json!({"op": "create"})).is_err());
        assert!(parse(json!([])).is_err());
        assert!(parse(json!([42])).is_err());
        assert!(matches!(
            parse(json!(["shaders", "p", "void main() {}"])),
            Err(GlirError::MalformedCommand { op: "shaders", .. })
        ));
    }
}
