//! batchbuild: build every project directory with an external toolchain
//!
//! `batchbuild projects` builds each directory under `projects/` for a fixed
//! target and collects the binaries into `compiled_projects/`.
//! `batchbuild programs` builds each directory that carries a `Cargo.toml`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use batchbuild::domain::BatchReport;
use batchbuild::services::SystemRunner;
use batchbuild::{compile_programs, compile_projects, report, BatchConfig};

/// Batch driver that runs a build tool once per directory
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Config file to use instead of ./.batchbuild.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Stop at the first failed unit
    #[arg(long, global = true, default_value_t = false)]
    fail_fast: bool,
    /// Summary format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: ReportFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Build every project for the fixed target and collect the artifacts
    Projects {
        /// Directory containing one subdirectory per project
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Directory receiving the collected artifacts
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Compilation target passed to the build tool
        #[arg(long, value_name = "TRIPLE")]
        target: Option<String>,
    },
    /// Build every directory that contains a manifest
    Programs {
        /// Directory whose subdirectories are candidates
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Marker file identifying a buildable directory
        #[arg(long, value_name = "FILE")]
        manifest: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration
    fn apply(&self, config: &mut BatchConfig) {
        if self.fail_fast {
            config.batch.fail_fast = true;
        }
        match &self.command {
            Commands::Projects {
                root,
                output,
                target,
            } => {
                if let Some(root) = root {
                    config.projects.root = root.clone();
                }
                if let Some(output) = output {
                    config.projects.output_dir = output.clone();
                }
                if let Some(target) = target {
                    config.projects.target = target.clone();
                }
            }
            Commands::Programs { root, manifest } => {
                if let Some(root) = root {
                    config.programs.root = root.clone();
                }
                if let Some(manifest) = manifest {
                    config.programs.manifest = manifest.clone();
                }
            }
        }
    }
}

/// Initialize logging with RUST_LOG environment variable support
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Run the selected driver on a blocking thread
fn run_driver(command: Commands, config: BatchConfig) -> batchbuild::Result<BatchReport> {
    let runner = SystemRunner::new();
    match command {
        Commands::Projects { .. } => compile_projects(&config, &runner),
        Commands::Programs { .. } => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            compile_programs(&config, &runner, &mut out)
        }
    }
}

fn print_report(report: &BatchReport, format: ReportFormat) -> Result<()> {
    let rendered = match format {
        ReportFormat::Text => report::render_text(report),
        ReportFormat::Json => {
            let mut json = report::render_json(report)?;
            json.push('\n');
            json
        }
    };
    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

async fn run(args: Args) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;

    let mut config =
        BatchConfig::load(&cwd, args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate()?;
    config.resolve_paths(&cwd);

    tracing::info!("Starting batchbuild in {:?}", cwd);

    let command = args.command.clone();
    let batch = tokio::task::spawn_blocking(move || run_driver(command, config));

    let report = tokio::select! {
        res = batch => res.context("Build task panicked")??,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Received Ctrl+C, abandoning remaining units");
            // The blocking build thread cannot be joined; leave without waiting on it
            std::process::exit(130);
        }
    };

    print_report(&report, args.format)?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    init_logging();

    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
