//! failmap CLI - pair test failures with their error lines
//!
//! `run` drives the test command and writes the report; `extract` reads a
//! previously captured log.

mod logging;
mod output;
mod settings;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use failmap_core::application::{LogExtractService, PairedMarkerExtractor, RunReportService};
use failmap_core::port::{OutputObserver, SilentObserver};
use failmap_core::ScrapeConfig;
use failmap_infra_system::{FileReportStore, ShellCommandRunner, StdoutEcho};

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "failmap")]
#[command(about = "Map failing test cases to their error messages", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(long, global = true, env = "FAILMAP_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the test command, echo its output, and write the failure report
    Run(RunArgs),

    /// Extract failures from a captured log
    Extract(ExtractArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Shell command line to execute
    #[arg(short, long)]
    command: Option<String>,

    /// Report file (overwritten)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Kill the command after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Directory to run the command in
    #[arg(long)]
    working_dir: Option<PathBuf>,

    /// Do not echo the command's output
    #[arg(short, long)]
    quiet: bool,
}

impl RunArgs {
    /// Layer the flags over the loaded configuration, then validate the result
    fn apply(self, config: &mut ScrapeConfig) -> Result<()> {
        if let Some(command) = self.command {
            config.command = command;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if self.timeout_ms.is_some() {
            config.timeout_ms = self.timeout_ms;
        }
        if self.working_dir.is_some() {
            config.working_dir = self.working_dir;
        }
        if self.quiet {
            config.echo = false;
        }
        config.validate()?;
        Ok(())
    }
}

#[derive(Args)]
struct ExtractArgs {
    /// Log file to read
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Also write the rendered report
    #[arg(long)]
    write: bool,

    /// Report file used with --write
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl ExtractArgs {
    /// Layer the path flags over the loaded configuration
    ///
    /// The command is not used here, so only the markers are checked.
    fn apply(&self, config: &mut ScrapeConfig) -> Result<()> {
        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        config.markers()?;
        Ok(())
    }
}

fn extractor(config: &ScrapeConfig) -> Result<PairedMarkerExtractor> {
    Ok(PairedMarkerExtractor::new(config.markers()?)?)
}

async fn run(config: ScrapeConfig) -> Result<()> {
    let runner = ShellCommandRunner::new()
        .with_timeout(config.timeout())
        .with_working_dir(config.working_dir.clone());
    let service = RunReportService::new(
        Arc::new(runner),
        Arc::new(FileReportStore::new()),
        extractor(&config)?,
    );

    let observer: &dyn OutputObserver = if config.echo {
        &StdoutEcho
    } else {
        &SilentObserver
    };

    let result = service
        .run(&config.command, &config.output_path, observer)
        .await
        .with_context(|| {
            format!(
                "Failed to write report to {}",
                config.output_path.display()
            )
        })?;

    output::print_run_report(&result);
    Ok(())
}

async fn extract(config: ScrapeConfig, write: bool, format: OutputFormat) -> Result<()> {
    let service = LogExtractService::new(Arc::new(FileReportStore::new()), extractor(&config)?);

    let (extraction, written) = if write {
        let (extraction, report) = service
            .extract_and_write(&config.input_path, &config.output_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to extract {} into {}",
                    config.input_path.display(),
                    config.output_path.display()
                )
            })?;
        (extraction, Some(report))
    } else {
        let extraction = service
            .extract_file(&config.input_path)
            .await
            .with_context(|| format!("Failed to read {}", config.input_path.display()))?;
        (extraction, None)
    };

    output::print_extraction(&extraction, format)?;
    if let Some(report) = written {
        output::print_written_report(&report, &config.output_path, format);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let mut config = settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run(args) => {
            args.apply(&mut config)?;

            info!(version = failmap_core::VERSION, "failmap run");
            run(config).await
        }

        Commands::Extract(args) => {
            args.apply(&mut config)?;

            info!(version = failmap_core::VERSION, "failmap extract");
            extract(config, args.write, args.format).await
        }
    }
}
