use crate::backend::{GraphicsBackend, ShaderStage};
use crate::error::{GlirError, Result};

use super::GlirConfig;

/// Applies the precision prefix and escape handling to a client shader source.
pub fn prepare_source(source: &str, config: &GlirConfig) -> String {
    let mut out = String::with_capacity(config.precision_header.len() + source.len() + 1);
    if !config.precision_header.is_empty() {
        out.push_str(&config.precision_header);
        out.push('\n');
    }
    out.push_str(source);
    if config.unescape_newlines {
        out = out.replace("\\n", "\n");
    }
    out
}

/// Prepares and compiles one stage; failures are logged and returned.
pub fn compile<B: GraphicsBackend + ?Sized>(
    gl: &mut B,
    stage: ShaderStage,
    source: &str,
    config: &GlirConfig,
) -> Result<B::Shader> {
    let source = prepare_source(source, config);
    gl.compile_shader(stage, &source).map_err(|log| {
        log::warn!("{stage} shader failed to compile: {log}");
        GlirError::ShaderCompileFailed { stage, log }
    })
}

/// Links whatever stages compiled; failures are logged and returned.
pub fn link<B: GraphicsBackend + ?Sized>(
    gl: &mut B,
    program: B::Program,
    vertex: Option<B::Shader>,
    fragment: Option<B::Shader>,
) -> Result<()> {
    gl.link_program(program, vertex, fragment).map_err(|log| {
        log::warn!("program {program:?} failed to link: {log}");
        GlirError::ProgramLinkFailed(log)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_precision_and_unescapes() {
        let config = GlirConfig::default();
        let src = prepare_source("void main() {\\n}", &config);
        assert_eq!(src, "precision mediump float;\nvoid main() {\n}");
    }

    #[test]
    fn empty_header_and_raw_escapes() {
        let config = GlirConfig {
            precision_header: String::new(),
            unescape_newlines: false,
            ..GlirConfig::default()
        };
        assert_eq!(prepare_source("a\\nb", &config), "a\\nb");
    }
}
