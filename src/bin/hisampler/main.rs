//! hisampler - terminal sample player
//!
//! Run with: cargo run -- path/to/sample.wav
//!
//! Logs go to the file given by `--log` or `HISAMPLER_LOG` (the terminal
//! belongs to the UI); filter with `RUST_LOG`.

mod app;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::{crate_version, Parser};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use app::Hisampler;

#[derive(Parser, Debug)]
#[clap(
    version = crate_version!(),
    about = "Plays a single sample polyphonically from the keyboard."
)]
struct Cli {
    /// Sample file to load on startup (wav, aif, aiff, mp3 or flac).
    sample: Option<PathBuf>,

    /// File that receives log output.
    #[clap(long, env = "HISAMPLER_LOG")]
    log: Option<PathBuf>,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.log.as_ref())?;

    Hisampler::new().sample(cli.sample).run()
}

fn init_logging(path: Option<&PathBuf>) -> EyreResult<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
