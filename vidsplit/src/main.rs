use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{Level, error, info, warn};

mod adapter;
mod backend;
mod cli;
mod config;
mod error;
mod lifecycle;
mod output;
mod pipeline;
mod select;

use crate::backend::FfmpegBackend;
use crate::cli::Cli;
use crate::error::SplitError;

/*
    Exit status is non-zero only for unusable arguments, which clap reports
    together with the usage text. A failed split is logged and still exits
    with status 0.
*/
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level())?;

    if !cli.extra.is_empty() {
        warn!("Ignoring {} extra arguments", cli.extra.len());
    }

    let config = cli.to_config();
    info!(
        "Splitting '{}' into '{}' and '{}'",
        config.input().display(),
        config.video_output().display(),
        config.audio_output().display()
    );

    match pipeline::run(&FfmpegBackend, &config) {
        Ok(summary) => {
            for err in summary.trailer_errors {
                report(err);
            }
        }
        Err(err) => report(err),
    }

    Ok(())
}

fn init_logging(level: Level) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!(e))
        .context("failed to initialize logging")
}

fn report(err: SplitError) {
    let stage = err.stage();
    error!(stage, "{:#}", anyhow::Error::new(err));
}
