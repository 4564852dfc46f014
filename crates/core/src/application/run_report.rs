// Run Report Use Case
// Runs the test command, extracts failures from its stdout, writes the report

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::extractor::{Extraction, PairedMarkerExtractor};
use crate::domain::RenderedReport;
use crate::error::Result;
use crate::port::{CommandRunner, OutputObserver, ReportStore, RunOutcome};

/// Outcome of one `run` invocation
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub extraction: Extraction,
    pub report: RenderedReport,
}

/// Run Report Service
pub struct RunReportService {
    runner: Arc<dyn CommandRunner>,
    store: Arc<dyn ReportStore>,
    extractor: PairedMarkerExtractor,
}

impl RunReportService {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        store: Arc<dyn ReportStore>,
        extractor: PairedMarkerExtractor,
    ) -> Self {
        Self {
            runner,
            store,
            extractor,
        }
    }

    /// Run `command`, extract from whatever stdout it produced, and
    /// overwrite `output` with the Rendered Report
    ///
    /// Runner faults degrade: they are logged and the partial output is still
    /// extracted and written.
    ///
    /// # Errors
    /// - AppError::Io if the report cannot be written
    pub async fn run(
        &self,
        command: &str,
        output: &Path,
        observer: &dyn OutputObserver,
    ) -> Result<RunReport> {
        info!(command = %command, "Running test command");

        let outcome = self.runner.run(command, observer).await;
        let captured = outcome.output();

        match outcome.cause() {
            Some(cause) => warn!(
                error = %cause,
                captured_bytes = captured.stdout.len(),
                "Test command failed, extracting from partial output"
            ),
            None => info!(
                exit_code = ?captured.exit_code,
                success = captured.exited_successfully(),
                duration_ms = captured.duration_ms,
                stdout_bytes = captured.stdout.len(),
                stderr_bytes = captured.stderr.len(),
                "Test command finished"
            ),
        }

        let extraction = self.extractor.extract(outcome.stdout());
        let report = extraction.mapping.render();

        self.store.write_report(output, &report).await?;
        info!(output = %output.display(), pairs = extraction.mapping.len(), "Report written");

        Ok(RunReport {
            outcome,
            extraction,
            report,
        })
    }
}
