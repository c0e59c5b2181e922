//! `wikilinks`: rewrites links between the Markdown pages of a wiki so they
//! no longer carry the `.md` extension.

mod cli;
mod config;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use link_logging::{link_error, link_info, LogDestination};
use thiserror::Error;
use wikilinks_core::LinkFilter;
use wikilinks_engine::{BatchRunner, ProbeSettings, ReqwestProber, RunError, RunOptions};

use crate::cli::Args;
use crate::config::{load_ignore_filter, ConfigError};

const EXIT_FILES_FAILED: u8 = 2;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
}

fn main() -> ExitCode {
    let args = Args::parse();
    let destination = match &args.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    link_logging::initialize(destination, args.log_level.into());

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            link_error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, AppError> {
    let root = args.root().ok_or(ConfigError::MissingPath)?;
    let filter = load_ignore_filter(args.ignore_filter.as_deref(), args.ignore_filter_file.as_deref())?;
    if !filter.is_empty() {
        link_info!("Loaded {} ignore rules", filter.len());
    }

    let mut options = RunOptions::new(root);
    options.extensions = args.extensions();
    options.dry_run = args.dry_run;
    options.probe_remote = args.check_remote;

    let settings = ProbeSettings {
        request_timeout: args.remote_timeout(),
        ..ProbeSettings::default()
    };
    let filter: Option<Arc<dyn LinkFilter>> = if filter.is_empty() {
        None
    } else {
        Some(Arc::new(filter))
    };
    let runner = BatchRunner::new(options, Arc::new(ReqwestProber::new(settings)), filter);

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let summary = runtime.block_on(runner.run())?;

    if args.fail_on_error && summary.failed > 0 {
        return Ok(ExitCode::from(EXIT_FILES_FAILED));
    }
    Ok(ExitCode::SUCCESS)
}
