// XPress CLI - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # xpress-prep
//!
//! Prepares a raw press-data export for analysis: resamples the process window
//! and the reference curve onto the 10ms grid, splices the reference into
//! every stroke and writes the cleansed table.
//!
//! ## Usage
//!
//! ```bash
//! # Parameters from the operator's parameter file
//! xpress-prep --config params.yaml --input raw.csv --output prepared.csv
//!
//! # Override the window on the command line
//! xpress-prep --input raw.csv --begin "01.03.2021 08:00:00" --end "01.03.2021 08:05:00" \
//!     --reference-curve 1001
//! ```

mod source;
mod summary;

use clap::Parser;
use source::CsvSource;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use summary::RunSummary;
use thiserror::Error;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;
use xpress::{PrepConfig, PrepError, Preparer, StatusSink};

/// XPress data preparation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML parameter file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raw sample file exported from the press data store
    #[arg(short, long)]
    input: PathBuf,

    /// Prepared dataset file
    #[arg(short, long, default_value = "prepared.csv")]
    output: PathBuf,

    /// Field delimiter of input and output files
    #[arg(short, long, default_value_t = ';')]
    delimiter: char,

    /// Window start (dd.mm.yyyy HH:MM:SS), overrides the parameter file
    #[arg(long)]
    begin: Option<String>,

    /// Window end (dd.mm.yyyy HH:MM:SS), overrides the parameter file
    #[arg(long)]
    end: Option<String>,

    /// Production order filter
    #[arg(long)]
    operation: Option<String>,

    /// Material filter
    #[arg(long)]
    material: Option<String>,

    /// Stroke counter of the reference curve
    #[arg(long)]
    reference_curve: Option<String>,

    /// Write a JSON run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Print preparation metrics when done
    #[arg(long)]
    metrics: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Prep(#[from] PrepError),

    #[error("Delimiter must be a single ASCII character, got '{0}'")]
    Delimiter(char),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Status lines as tracing events.
struct TracingStatus;

impl StatusSink for TracingStatus {
    fn status(&mut self, line: &str) {
        info!(target: "xpress::status", "{}", line);
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8, CliError> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(CliError::Delimiter(delimiter))
    }
}

fn apply_overrides(config: &mut PrepConfig, args: &Args) {
    let overrides = [
        (&mut config.begin, &args.begin),
        (&mut config.end, &args.end),
        (&mut config.operation, &args.operation),
        (&mut config.material, &args.material),
        (&mut config.reference_curve, &args.reference_curve),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            *field = value.clone();
        }
    }
}

fn run(args: &Args, sink: &mut dyn StatusSink) -> Result<RunSummary, CliError> {
    let delimiter = delimiter_byte(args.delimiter)?;

    let mut config = match &args.config {
        Some(path) => PrepConfig::from_path(path)?,
        None => PrepConfig::default(),
    };
    apply_overrides(&mut config, args);
    for line in config.summary() {
        info!("{}", line);
    }
    let request = config.to_request().map_err(PrepError::from)?;

    let source = CsvSource::open(&args.input, delimiter)?;
    info!(
        "{} raw rows in {}",
        source.len(),
        source.path().display()
    );

    let dataset = Preparer::new(&source).run(&request, sink)?;

    let file = File::create(&args.output)?;
    dataset.write_csv(BufWriter::new(file), delimiter)?;
    info!("Wrote {} rows to {}", dataset.len(), args.output.display());

    if args.metrics {
        println!("{}", dataset.metrics().report());
    }

    let summary = RunSummary::new(&args.input, &args.output, dataset.metrics());
    if let Some(path) = &args.summary {
        std::fs::write(path, summary.to_json()?)?;
    }
    Ok(summary)
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("XPress v{}", xpress::VERSION);

    match run(&args, &mut TracingStatus) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
