use std::collections::hash_map::Entry;

use serde_json::Value;

use crate::backend::{self, BufferTarget, FuncArg, GraphicsBackend, ShaderStage};
use crate::data::{self, DataDescriptor};
use crate::error::{GlirError, Result};
use crate::types::{DrawMode, GlType};

use super::guard::ActiveProgram;
use super::resources::{BufferRecord, ProgramRecord, ResourceRecord, ResourceTable, UniformSlot};
use super::{Command, DrawSelection, GlirConfig, ResourceKind, shader};

/// Executes GLIR commands against a graphics backend.
///
/// Commands run synchronously, in order. A failing command leaves the resource
/// table as it was before that command; later commands still run. Shader
/// compile and link failures are not command failures: they are logged and
/// kept in [`Interpreter::diagnostics`].
pub struct Interpreter<B: GraphicsBackend> {
    backend: B,
    resources: ResourceTable<B>,
    config: GlirConfig,
    diagnostics: Vec<GlirError>,
}

impl<B: GraphicsBackend> Interpreter<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, GlirConfig::default())
    }

    pub fn with_config(backend: B, config: GlirConfig) -> Self {
        Self {
            backend,
            resources: ResourceTable::new(),
            config,
            diagnostics: Vec::new(),
        }
    }

    /// Parses and executes one command in its JSON wire form.
    pub fn execute_json(&mut self, value: &Value) -> Result<()> {
        let command = Command::from_json(value)?;
        self.execute(command)
    }

    /// Executes a batch, continuing past failures.
    ///
    /// Returns `(index, error)` for every command that failed.
    pub fn execute_all(
        &mut self,
        commands: impl IntoIterator<Item = Command>,
    ) -> Vec<(usize, GlirError)> {
        let mut failures = Vec::new();
        for (index, command) in commands.into_iter().enumerate() {
            if let Err(e) = self.execute(command) {
                log::warn!("command #{index} failed: {e}");
                failures.push((index, e));
            }
        }
        failures
    }

    /// Like [`Interpreter::execute_all`] for commands still in JSON form.
    pub fn execute_json_all<'v>(
        &mut self,
        values: impl IntoIterator<Item = &'v Value>,
    ) -> Vec<(usize, GlirError)> {
        let mut failures = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            if let Err(e) = self.execute_json(value) {
                log::warn!("command #{index} failed: {e}");
                failures.push((index, e));
            }
        }
        failures
    }

    pub fn execute(&mut self, command: Command) -> Result<()> {
        log::debug!("glir {command}");
        match command {
            Command::Create { id, kind } => self.create(id, kind),
            Command::Delete { id } => self.resources.remove(&id, &mut self.backend),
            Command::Shaders {
                program,
                vertex,
                fragment,
            } => self.shaders(&program, &vertex, &fragment),
            Command::Data {
                buffer,
                offset,
                payload,
            } => self.data(&buffer, offset, &payload),
            Command::Attribute {
                program,
                name,
                gtype,
                buffer,
                stride,
                offset,
            } => self.attribute(&program, &name, &gtype, &buffer, stride, offset),
            Command::Uniform {
                program,
                name,
                gtype,
                value,
            } => self.uniform(&program, name, &gtype, &value),
            Command::Draw {
                program,
                mode,
                selection,
            } => self.draw(&program, mode, &selection),
            Command::Func { name, args } => self.func(&name, &args),
        }
    }

    /// Sets the viewport to the full drawing surface.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.backend.viewport(0, 0, width, height);
    }

    /// Deletes every live resource, releasing its device handle.
    pub fn release_all(&mut self) {
        self.resources.release_all(&mut self.backend);
    }

    pub fn resources(&self) -> &ResourceTable<B> {
        &self.resources
    }

    pub fn config(&self) -> &GlirConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Compile and link failures seen so far.
    pub fn diagnostics(&self) -> &[GlirError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<GlirError> {
        std::mem::take(&mut self.diagnostics)
    }

    // ── handlers ──────────────────────────────────────────────────────────

    fn create(&mut self, id: String, kind: ResourceKind) -> Result<()> {
        let record = match kind {
            ResourceKind::VertexBuffer | ResourceKind::IndexBuffer => {
                let handle = self
                    .backend
                    .create_buffer()
                    .map_err(GlirError::BackendCallFailed)?;
                ResourceRecord::Buffer(BufferRecord::new(kind, handle))
            }
            ResourceKind::Program => {
                let handle = self
                    .backend
                    .create_program()
                    .map_err(GlirError::BackendCallFailed)?;
                ResourceRecord::Program(ProgramRecord::new(handle))
            }
        };
        if let Some(old) = self.resources.insert(id.clone(), record) {
            log::warn!("create '{id}': replaced a live {} without delete; its handle leaks", old.kind());
        }
        Ok(())
    }

    fn shaders(&mut self, id: &str, vertex: &str, fragment: &str) -> Result<()> {
        let handle = self.resources.program(id)?.handle;
        let vs = self.compile(ShaderStage::Vertex, vertex);
        let fs = self.compile(ShaderStage::Fragment, fragment);
        if let Err(e) = shader::link(&mut self.backend, handle, vs, fs) {
            self.diagnostics.push(e);
        }
        Ok(())
    }

    fn compile(&mut self, stage: ShaderStage, source: &str) -> Option<B::Shader> {
        match shader::compile(&mut self.backend, stage, source, &self.config) {
            Ok(s) => Some(s),
            Err(e) => {
                self.diagnostics.push(e);
                None
            }
        }
    }

    fn data(&mut self, id: &str, offset: usize, payload: &DataDescriptor) -> Result<()> {
        let record = self.resources.buffer_mut(id)?;
        let payload = data::decode(payload)?;
        let bytes = payload.as_bytes();
        let target = record.target();

        self.backend.bind_buffer(target, Some(record.handle));
        if record.filled_size == 0 {
            if offset != 0 {
                log::debug!("data '{id}': first write allocates, offset {offset} ignored");
            }
            self.backend.buffer_data(target, bytes, self.config.buffer_usage);
            record.filled_size = bytes.len();
        } else if self.config.grow_on_overflow && offset == 0 && bytes.len() > record.filled_size {
            log::debug!(
                "data '{id}': growing {} -> {} bytes",
                record.filled_size,
                bytes.len()
            );
            self.backend.buffer_data(target, bytes, self.config.buffer_usage);
            record.filled_size = bytes.len();
        } else {
            if offset + bytes.len() > record.filled_size {
                log::warn!(
                    "data '{id}': {} bytes at offset {offset} overflow the {}-byte allocation",
                    bytes.len(),
                    record.filled_size
                );
            }
            self.backend.buffer_sub_data(target, offset, bytes);
        }
        Ok(())
    }

    fn attribute(
        &mut self,
        program_id: &str,
        name: &str,
        gtype: &str,
        buffer_id: &str,
        stride: i32,
        offset: i32,
    ) -> Result<()> {
        let ty = GlType::parse(gtype)?;
        let vbo = self.resources.buffer(buffer_id)?;
        if vbo.kind != ResourceKind::VertexBuffer {
            return Err(GlirError::WrongResourceKind {
                id: buffer_id.to_string(),
                expected: "VertexBuffer",
                found: vbo.kind,
            });
        }
        let vbo = vbo.handle;

        let program = self.resources.program_mut(program_id)?;
        let handle = program.handle;
        self.backend.bind_buffer(BufferTarget::Array, Some(vbo));

        let location = match program.attributes.get(name) {
            Some(&cached) => cached,
            None => {
                let loc = self.backend.attrib_location(handle, name);
                program.attributes.insert(name.to_string(), loc);
                loc
            }
        };
        let Some(location) = location else {
            log::debug!("attribute '{name}' is not active in program '{program_id}'");
            return Ok(());
        };

        backend::configure_vertex_attribute(&mut self.backend, location, ty, stride, offset);
        Ok(())
    }

    fn uniform(
        &mut self,
        program_id: &str,
        name: String,
        gtype: &str,
        value: &DataDescriptor,
    ) -> Result<()> {
        let program = self.resources.program_mut(program_id)?;
        let mut gl = ActiveProgram::new(&mut self.backend, program.handle);

        // The upload function is fixed by the first successful reference.
        let (location, func) = match program.uniforms.get(&name) {
            Some(slot) => (slot.location.clone(), slot.func),
            None => {
                let func = GlType::parse(gtype)?.uniform_fn();
                (gl.uniform_location(program.handle, &name), func)
            }
        };

        let value = data::decode(value)?;
        let value = func.coerce(&value)?;
        match &location {
            Some(location) => gl.set_uniform(location, func, &value),
            None => log::debug!("uniform '{name}' is not active in program '{program_id}'"),
        }
        if let Entry::Vacant(e) = program.uniforms.entry(name) {
            e.insert(UniformSlot { location, func });
        }
        Ok(())
    }

    fn draw(&mut self, program_id: &str, mode: DrawMode, selection: &DrawSelection) -> Result<()> {
        let handle = self.resources.program(program_id)?.handle;
        match selection {
            DrawSelection::Arrays { start, count } => {
                let mut gl = ActiveProgram::new(&mut self.backend, handle);
                gl.draw_arrays(mode, *start, *count);
            }
            DrawSelection::Elements {
                index_buffer,
                index_type,
                count,
            } => {
                let ibo = self.resources.buffer(index_buffer)?;
                if ibo.kind != ResourceKind::IndexBuffer {
                    return Err(GlirError::WrongResourceKind {
                        id: index_buffer.clone(),
                        expected: "IndexBuffer",
                        found: ibo.kind,
                    });
                }
                let ibo = ibo.handle;
                let mut gl = ActiveProgram::new(&mut self.backend, handle);
                gl.bind_buffer(BufferTarget::ElementArray, Some(ibo));
                gl.draw_elements(mode, *count, *index_type, 0);
            }
        }
        Ok(())
    }

    fn func(&mut self, name: &str, args: &[Value]) -> Result<()> {
        let args = args
            .iter()
            .map(|v| FuncArg::from_json(&self.backend, v))
            .collect::<Result<Vec<_>>>()?;
        backend::invoke(&mut self.backend, name, &args)
    }
}
