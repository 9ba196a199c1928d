//! pixcut: batch image conversion.
//!
//! Exit codes: 0 on success, 1 when the batch fails, 2 for configuration
//! or usage errors (nothing was written).

mod args;
mod config;
mod inputs;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use pixcut_cli::output::{self, Status};
use pixcut_cli::{logging, progress};
use pixcut_image::{BatchEvent, BatchJob, BatchSummary, ImageError, default_output_dir};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Report<'a> {
    Completed {
        message: &'a str,
        output_dir: &'a Path,
        #[serde(flatten)]
        summary: BatchSummary,
    },
    Failed {
        error: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {e}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = format!("{err:#}");
            if cli.json {
                print_json(&Report::Failed { error: message });
            } else {
                Status::error(&message);
            }
            exit_code(&err)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let (mut settings, config_path) = config::load(cli.config.as_deref())?;
    if let Some(path) = &config_path {
        tracing::info!(path = %path.display(), "using settings file");
    }
    cli.apply(&mut settings)?;

    let inputs::Inputs { files, skipped } = inputs::collect(&cli.inputs)?;
    if !cli.json {
        for path in &skipped {
            Status::warning(&format!("skipping unsupported file {}", path.display()));
        }
    }
    let output_dir = match &cli.output {
        Some(dir) => std::path::absolute(dir)
            .with_context(|| format!("invalid output directory {}", dir.display()))?,
        None => default_output_dir(&files[0]),
    };
    let count = files.len();

    // Validates settings and loads the watermark font before touching disk.
    let job = BatchJob::new(files, &output_dir, settings)?;

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let pb = if cli.json {
        progress::hidden()
    } else {
        progress::batch_progress(count)
    };

    let handle = job.spawn();
    let mut completed = None;
    for event in handle.events() {
        match event {
            BatchEvent::Progress(percent) => progress::set_percent(&pb, percent),
            BatchEvent::Completed { message, summary } => {
                progress::finish_success(&pb, &message);
                completed = Some((message, summary));
            }
            BatchEvent::Failed(message) => progress::finish_error(&pb, &message),
        }
    }
    handle.join()?;

    let (message, summary) =
        completed.context("batch finished without reporting completion")?;
    if cli.json {
        print_json(&Report::Completed {
            message: &message,
            output_dir: &output_dir,
            summary,
        });
    } else {
        Status::success(&message);
        output::print_summary(&summary, &output_dir);
    }
    Ok(())
}

fn print_json(report: &Report<'_>) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(e) => Status::error(&format!("failed to serialize report: {e}")),
    }
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ImageError>() {
        Some(e) if e.is_config() => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

