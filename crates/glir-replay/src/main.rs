use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde_json::Value;

use glir_engine::backend::{BackendCall, RecordingBackend};
use glir_engine::glir::{GlirConfig, Interpreter};
use glir_engine::logging::{LoggingConfig, init_logging};
use glir_engine::retained::{Scene, SceneExport};

#[derive(Parser, Debug)]
#[command(name = "glir-replay", version, about = "Replay GLIR input against a recording backend")]
struct Cli {
    #[command(subcommand)]
    mode: Mode,

    /// Log filter (env_logger syntax); overrides RUST_LOG.
    #[arg(long, global = true)]
    log: Option<String>,

    /// Log every executed command at debug level.
    #[arg(long, global = true, default_value_t = false)]
    trace: bool,

    /// Viewport size as WIDTHxHEIGHT.
    #[arg(long, global = true, default_value = "800x600", value_parser = parse_size)]
    size: (i32, i32),

    /// Reallocate buffers when an offset-0 write outgrows the first allocation.
    #[arg(long, global = true, default_value_t = false)]
    grow_on_overflow: bool,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Execute a GLIR command stream (JSON array of commands, or one command per line).
    Commands { input: PathBuf },
    /// Build a scene export and draw it.
    Scene {
        input: PathBuf,

        /// Frames to draw.
        #[arg(long, default_value_t = 1)]
        frames: u32,
    },
}

fn parse_size(s: &str) -> Result<(i32, i32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<i32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("bad dimension '{v}'"))
    };
    Ok((parse(w)?, parse(h)?))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        trace_commands: cli.trace,
        ..LoggingConfig::default()
    });

    let config = GlirConfig {
        grow_on_overflow: cli.grow_on_overflow,
        ..GlirConfig::default()
    };
    let (width, height) = cli.size;

    let calls = match &cli.mode {
        Mode::Commands { input } => replay_commands(input, config, width, height)?,
        Mode::Scene { input, frames } => replay_scene(input, &config, width, height, *frames)?,
    };

    let mut out = BufWriter::new(io::stdout().lock());
    for (i, call) in calls.iter().enumerate() {
        writeln!(out, "{i:>5}  {call:?}")?;
    }
    out.flush()?;
    Ok(())
}

fn replay_commands(path: &Path, config: GlirConfig, width: i32, height: i32) -> Result<Vec<BackendCall>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let commands = parse_command_stream(&text).with_context(|| format!("parsing {}", path.display()))?;
    info!("replaying {} commands from {}", commands.len(), path.display());

    let mut glir = Interpreter::with_config(RecordingBackend::new(), config);
    glir.resize(width, height);
    let failures = glir.execute_json_all(&commands);
    for (index, err) in &failures {
        warn!("command #{index}: {err}");
    }
    for diagnostic in glir.diagnostics() {
        warn!("{diagnostic}");
    }
    info!(
        "{} commands, {} failed, {} live resources",
        commands.len(),
        failures.len(),
        glir.resources().len()
    );
    Ok(glir.into_backend().take_calls())
}

/// Accepts a JSON array of commands, or newline-delimited commands.
fn parse_command_stream(text: &str) -> Result<Vec<Value>> {
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) {
        if items.iter().all(Value::is_array) {
            return Ok(items);
        }
    }
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| serde_json::from_str(line).with_context(|| format!("line {}", n + 1)))
        .collect()
}

fn replay_scene(
    path: &Path,
    config: &GlirConfig,
    width: i32,
    height: i32,
    frames: u32,
) -> Result<Vec<BackendCall>> {
    let export = SceneExport::from_path(path)?;
    let mut gl = RecordingBackend::new();
    let mut scene = Scene::from_export(&mut gl, &export, config).context("building scene")?;
    scene.resize(&mut gl, width, height);

    for frame in 0..frames {
        scene
            .draw(&mut gl)
            .with_context(|| format!("drawing frame {frame}"))?;
    }
    for diagnostic in scene.diagnostics() {
        warn!("{diagnostic}");
    }
    info!(
        "scene with {} programs drawn {frames} times",
        scene.program_names().count()
    );
    Ok(gl.take_calls())
}
