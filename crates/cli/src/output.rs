//! Console rendering for extraction results

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use std::path::Path;
use tabled::{Table, Tabled};

use failmap_core::application::{Extraction, RunReport};
use failmap_core::domain::RenderedReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Tabled)]
struct PairRow {
    #[tabled(rename = "Test case")]
    test_case: String,
    #[tabled(rename = "Error")]
    error: String,
}

/// Blocks and error lines, each trimmed and followed by a blank line
fn artifact_listing(items: impl Iterator<Item = String>) -> String {
    items.map(|item| format!("{}\n\n", item)).collect()
}

pub fn print_extraction(extraction: &Extraction, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(extraction)?);
        }
        OutputFormat::Text => {
            println!("{}", "Extracted Lines:".cyan().bold());
            println!(
                "{}",
                artifact_listing(extraction.blocks.iter().map(|b| b.trimmed().to_string()))
            );
            println!(
                "{}",
                artifact_listing(extraction.error_lines.iter().map(|e| e.trimmed().to_string()))
            );

            println!("{}", "Extracted Dictionary:".cyan().bold());
            if extraction.mapping.is_empty() {
                println!("{}", "No failures found".yellow());
            } else {
                let rows = extraction.mapping.iter().map(|(test_case, error)| PairRow {
                    test_case: test_case.to_string(),
                    error: error.to_string(),
                });
                println!("{}", Table::new(rows));
            }

            if extraction.unpaired() > 0 {
                println!(
                    "{}",
                    format!(
                        "{} block(s) and {} error line(s) found; {} left unpaired",
                        extraction.blocks.len(),
                        extraction.error_lines.len(),
                        extraction.unpaired()
                    )
                    .yellow()
                );
            }
        }
    }

    Ok(())
}

fn written_report_heading(path: &Path) -> String {
    format!("Report written to {}:", path.display())
}

/// Echo the report `extract --write` just wrote; JSON output already carries
/// the mapping, so only the text format prints it
pub fn print_written_report(report: &RenderedReport, path: &Path, format: OutputFormat) {
    if format == OutputFormat::Json {
        return;
    }
    println!("{}", written_report_heading(path).cyan().bold());
    println!("{}", report);
}

pub fn print_run_report(result: &RunReport) {
    if let Some(cause) = result.outcome.cause() {
        eprintln!("{} {}", "✗ Test command failed:".red().bold(), cause);
    }

    println!("{}", result.report);
}
