mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use canvas::{CanvasConfig, ConfigError, SnapshotError};
use clap::{Args, Parser, Subcommand};
use snapshot::CodecError;
use tracing_subscriber::EnvFilter;

use crate::commands::Format;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("cannot tell the format of {0}; pass --from/--to")]
    UnknownFormat(PathBuf),
    #[error("snapshot text is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("{code}: {0}", code = .0.error_code())]
    Snapshot(#[from] SnapshotError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to format listing")]
    Format(#[from] std::fmt::Error),
    #[error("rebuilt canvas differs from the snapshot")]
    NotIsomorphic,
}

#[derive(Parser, Debug)]
#[command(name = "flowcanvas", about = "Inspect, convert and check flow-diagram snapshots")]
struct Cli {
    #[command(flatten)]
    overrides: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

/// Overrides applied on top of `FLOWCANVAS_*` environment values.
#[derive(Args, Debug, Default)]
struct ConfigArgs {
    #[arg(long, global = true)]
    viewport_width: Option<f64>,

    #[arg(long, global = true)]
    viewport_height: Option<f64>,

    #[arg(long, global = true)]
    icon_base: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild a snapshot and list its items and connections.
    Inspect {
        file: PathBuf,
        #[arg(long)]
        from: Option<Format>,
        /// Print the listing as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Re-encode a snapshot, e.g. JSON to protobuf.
    Convert {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        from: Option<Format>,
        #[arg(long)]
        to: Option<Format>,
    },
    /// Rebuild and re-serialize; fail unless the result matches the input.
    Check {
        file: PathBuf,
        #[arg(long)]
        from: Option<Format>,
    },
}

fn config(overrides: ConfigArgs) -> Result<CanvasConfig, CliError> {
    commands::layered_config(overrides.viewport_width, overrides.viewport_height, overrides.icon_base, |key| {
        match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        }
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = config(cli.overrides)?;
    match cli.command {
        Command::Inspect { file, from, json } => {
            let format = commands::resolve_format(&file, from)?;
            let canvas = commands::rebuild(&commands::read(&file)?, format, config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&commands::listing(&canvas)?)?);
            } else {
                print!("{}", commands::describe(&canvas)?);
            }
            Ok(())
        }
        Command::Convert { input, output, from, to } => {
            let from = commands::resolve_format(&input, from)?;
            let to = commands::resolve_format(&output, to)?;
            let canvas = commands::rebuild(&commands::read(&input)?, from, config)?;
            let bytes = commands::encode(&canvas, to)?;
            std::fs::write(&output, &bytes).map_err(|source| CliError::Write { path: output.clone(), source })?;
            tracing::info!(input = %input.display(), output = %output.display(), ?from, ?to, "converted");
            Ok(())
        }
        Command::Check { file, from } => {
            let format = commands::resolve_format(&file, from)?;
            let items = commands::check(&commands::read(&file)?, format, config)?;
            tracing::info!(file = %file.display(), items, "snapshot round-trips");
            println!("ok");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    // .env first so RUST_LOG can come from it.
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "ignoring .env"),
    }

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "flowcanvas failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
