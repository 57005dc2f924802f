mod script;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use editor::config::{ConfigError, EditorConfig, parse_size};
use editor::{EditorError, EditorSession};

use crate::script::ScriptError;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script: {0}")]
    InvalidScript(serde_json::Error),
    #[error("invalid canvas size {0:?}; expected WIDTHxHEIGHT")]
    InvalidCanvasSize(String),
    #[error("output encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Script(#[from] ScriptError),
}

#[derive(Parser, Debug)]
#[command(name = "pixelcraft", about = "Replay editor scripts against the PixelCraft scene engine")]
struct Cli {
    /// Canvas size as WIDTHxHEIGHT; overrides PIXELCRAFT_CANVAS_SIZE.
    #[arg(long, global = true)]
    canvas: Option<String>,

    #[arg(long, global = true, env = "PIXELCRAFT_HISTORY_LIMIT")]
    history_limit: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a script and print the final scene as JSON.
    Replay {
        script: PathBuf,
        /// Write the scene here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Apply a script and print the layer list, front-most first.
    Layers { script: PathBuf },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    match cli.command {
        Command::Replay { script, out } => run_replay(&config, &script, out.as_deref()),
        Command::Layers { script } => run_layers(&config, &script),
    }
}

fn build_config(cli: &Cli) -> Result<EditorConfig, CliError> {
    let mut config = EditorConfig::from_env()?;
    if let Some(raw) = &cli.canvas {
        let (width, height) = parse_size(raw).ok_or_else(|| CliError::InvalidCanvasSize(raw.clone()))?;
        config.canvas_width = width;
        config.canvas_height = height;
    }
    if let Some(limit) = cli.history_limit {
        config.history_limit = limit.max(1);
    }
    Ok(config)
}

fn load_session(config: &EditorConfig, path: &Path) -> Result<EditorSession, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    let steps = script::parse(&text).map_err(CliError::InvalidScript)?;
    let mut session = EditorSession::new(config)?;
    let report = script::replay(&mut session, &steps)?;
    tracing::info!(
        script = %path.display(),
        steps = report.steps,
        commits = report.commits,
        restores = report.restores,
        skipped = report.skipped,
        history_len = session.history().len(),
        "replay complete"
    );
    Ok(session)
}

fn run_replay(config: &EditorConfig, script: &Path, out: Option<&Path>) -> Result<(), CliError> {
    let session = load_session(config, script)?;
    let json = serde_json::to_string_pretty(session.scene())?;
    match out {
        Some(path) => fs::write(path, json).map_err(|source| CliError::Write { path: path.to_path_buf(), source }),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn run_layers(config: &EditorConfig, script: &Path) -> Result<(), CliError> {
    let session = load_session(config, script)?;
    let selected = session.selection();
    for layer in session.layers() {
        let marker = if selected == Some(layer.id) { "*" } else { " " };
        let visible = if layer.visible { "visible" } else { "hidden" };
        let locked = if layer.locked { "locked" } else { "" };
        println!("{marker} {:<24} {:<8} {visible:<8} {locked}", layer.name, layer.kind.to_string());
    }
    Ok(())
}
