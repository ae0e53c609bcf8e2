use crate::backend::{GraphicsBackend, consts};
use crate::data::TypedPayload;
use crate::error::{GlirError, Result};
use crate::glir::GlirConfig;
use crate::types::{DrawMode, IndexType};

use super::{Buffer, GlObject, Program, SceneExport};

/// Named retained programs drawn in export order.
pub struct Scene<B: GraphicsBackend> {
    programs: Vec<(String, Program<B>)>,
    pub clear_color: [f32; 4],
}

impl<B: GraphicsBackend> Scene<B> {
    /// Builds every program of `export`, compiling its shaders.
    ///
    /// Device objects other than shaders are created on the first draw.
    pub fn from_export(gl: &mut B, export: &SceneExport, config: &GlirConfig) -> Result<Self> {
        let mut programs = Vec::with_capacity(export.programs.len());
        for (name, exported) in &export.programs {
            let mode = DrawMode::parse(&exported.mode)?;
            let mut program = Program::new(gl, &exported.vertex_shader, &exported.fragment_shader, mode, config);

            for (attr, var) in &exported.attributes {
                program.add_attribute(gl, attr, &var.gtype, Buffer::vertex(var.decode()?))?;
            }
            for (uniform, var) in &exported.uniforms {
                program.add_uniform(gl, uniform, &var.gtype, Some(var.decode()?))?;
            }
            if let Some(index) = &exported.index_buffer {
                program.set_index(IndexType::parse(&index.gtype)?, index.decode()?);
            }

            log::debug!(
                "scene program '{name}': {} attributes, {} uniforms, indexed: {}",
                exported.attributes.len(),
                exported.uniforms.len(),
                exported.index_buffer.is_some()
            );
            programs.push((name.clone(), program));
        }

        Ok(Self {
            programs,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        })
    }

    /// Renders one frame: clear, then draw every program in order.
    pub fn draw(&mut self, gl: &mut B) -> Result<()> {
        gl.clear_color(self.clear_color);
        gl.clear(consts::COLOR_BUFFER_BIT);
        for (_, program) in &mut self.programs {
            program.draw(gl, None)?;
        }
        Ok(())
    }

    pub fn resize(&mut self, gl: &mut B, width: i32, height: i32) {
        gl.viewport(0, 0, width, height);
    }

    pub fn program(&self, name: &str) -> Option<&Program<B>> {
        self.programs.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    pub fn program_mut(&mut self, name: &str) -> Option<&mut Program<B>> {
        self.programs
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    pub fn program_names(&self) -> impl Iterator<Item = &str> {
        self.programs.iter().map(|(n, _)| n.as_str())
    }

    /// Updates one attribute or uniform of a named program.
    pub fn set_data(&mut self, program: &str, variable: &str, data: TypedPayload) -> Result<()> {
        self.program_mut(program)
            .ok_or_else(|| GlirError::UnknownResource(program.to_string()))?
            .set_data(variable, data)
    }

    /// Compile and link failures across all programs.
    pub fn diagnostics(&self) -> impl Iterator<Item = &GlirError> {
        self.programs.iter().flat_map(|(_, p)| p.diagnostics())
    }

    /// Releases every device object; a later draw recreates them.
    pub fn delete(&mut self, gl: &mut B) {
        for (_, program) in &mut self.programs {
            program.delete(gl);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, RecordingBackend};
    use serde_json::json;

    fn triangle_export() -> SceneExport {
        serde_json::from_value(json!({
            "programs": {
                "triangle": {
                    "vertex_shader": "attribute vec2 a_position;\\nvoid main() { gl_Position = vec4(a_position, 0.0, 1.0); }",
                    "fragment_shader": "void main() { gl_FragColor = vec4(1.0); }",
                    "mode": "triangles",
                    "attributes": {
                        "a_position": {
                            "gtype": "GL_FLOAT_VEC2",
                            "data": {"storage_type": "javascript_array", "data_type": "float32",
                                     "buffer": [-1.0, -1.0, 1.0, -1.0, 0.0, 1.0]}
                        }
                    },
                    "uniforms": {
                        "u_scale": {"gtype": "GL_FLOAT", "data": [0.5]}
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn one_triangle_scene_draws_once() {
        let mut gl = RecordingBackend::new();
        let mut scene = Scene::from_export(&mut gl, &triangle_export(), &GlirConfig::default()).unwrap();
        scene.draw(&mut gl).unwrap();

        assert_eq!(gl.count(|c| matches!(c, BackendCall::DrawArrays { .. })), 1);
        assert!(gl.calls().contains(&BackendCall::DrawArrays {
            mode: DrawMode::Triangles,
            first: 0,
            count: 3
        }));
        assert!(gl.calls().contains(&BackendCall::ClearColor([0.0, 0.0, 0.0, 1.0])));
        assert!(gl.calls().contains(&BackendCall::Clear(consts::COLOR_BUFFER_BIT)));
        assert_eq!(scene.diagnostics().count(), 0);
    }

    #[test]
    fn indexed_export_uses_stripped_gtype() {
        let mut export = triangle_export();
        export.programs[0].1.index_buffer = Some(
            serde_json::from_value(json!({
                "gtype": "GL_UNSIGNED_SHORT",
                // u16 [0, 1, 2]
                "data": {"buffer": "AAABAAIA"}
            }))
            .unwrap(),
        );
        let mut gl = RecordingBackend::new();
        let mut scene = Scene::from_export(&mut gl, &export, &GlirConfig::default()).unwrap();
        scene.draw(&mut gl).unwrap();

        assert!(gl.calls().contains(&BackendCall::DrawElements {
            mode: DrawMode::Triangles,
            count: 3,
            index_type: IndexType::UnsignedShort,
            offset: 0
        }));
    }

    #[test]
    fn live_updates_and_lookup() {
        let mut gl = RecordingBackend::new();
        let mut scene = Scene::from_export(&mut gl, &triangle_export(), &GlirConfig::default()).unwrap();
        scene.draw(&mut gl).unwrap();
        gl.take_calls();

        scene.set_data("triangle", "u_scale", TypedPayload::F32(vec![2.0])).unwrap();
        assert_eq!(
            scene.set_data("square", "u_scale", TypedPayload::F32(vec![2.0])),
            Err(GlirError::UnknownResource("square".into()))
        );
        scene.clear_color = [1.0, 1.0, 1.0, 1.0];
        scene.resize(&mut gl, 800, 600);
        scene.draw(&mut gl).unwrap();

        assert_eq!(gl.count(|c| matches!(c, BackendCall::SetUniform { .. })), 1);
        assert!(gl.calls().contains(&BackendCall::ClearColor([1.0; 4])));
        assert_eq!(scene.program_names().collect::<Vec<_>>(), ["triangle"]);
        assert_eq!(scene.program("triangle").map(|p| p.mode()), Some(DrawMode::Triangles));
    }

    #[test]
    fn delete_releases_everything() {
        let mut gl = RecordingBackend::new();
        let mut scene = Scene::from_export(&mut gl, &triangle_export(), &GlirConfig::default()).unwrap();
        scene.draw(&mut gl).unwrap();
        scene.delete(&mut gl);
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.live_buffers(), 0);
    }

    #[test]
    fn bad_mode_fails_to_build() {
        let mut export = triangle_export();
        export.programs[0].1.mode = "hexagons".into();
        let mut gl = RecordingBackend::new();
        assert!(Scene::from_export(&mut gl, &export, &GlirConfig::default()).is_err());
    }
}
