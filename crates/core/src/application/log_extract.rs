// Log Extract Use Case
// Reads a previously captured log and pairs its failure markers

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::extractor::{Extraction, PairedMarkerExtractor};
use crate::domain::RenderedReport;
use crate::error::Result;
use crate::port::ReportStore;

/// Log Extract Service
pub struct LogExtractService {
    store: Arc<dyn ReportStore>,
    extractor: PairedMarkerExtractor,
}

impl LogExtractService {
    pub fn new(store: Arc<dyn ReportStore>, extractor: PairedMarkerExtractor) -> Self {
        Self { store, extractor }
    }

    /// Read `input` in full and extract the Result Mapping
    ///
    /// # Errors
    /// - AppError::Io if the log cannot be read (not recovered locally)
    pub async fn extract_file(&self, input: &Path) -> Result<Extraction> {
        let raw = self.store.read_raw(input).await?;
        let extraction = self.extractor.extract(&raw);

        info!(
            input = %input.display(),
            bytes = raw.len(),
            blocks = extraction.blocks.len(),
            error_lines = extraction.error_lines.len(),
            pairs = extraction.mapping.len(),
            "Log extracted"
        );

        Ok(extraction)
    }

    /// Extract `input`, then overwrite `output` with the Rendered Report
    ///
    /// `input` and `output` may be the same path; the log is fully read first.
    pub async fn extract_and_write(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<(Extraction, RenderedReport)> {
        let extraction = self.extract_file(input).await?;
        let report = extraction.mapping.render();

        self.store.write_report(output, &report).await?;
        info!(output = %output.display(), pairs = extraction.mapping.len(), "Report written");

        Ok((extraction, report))
    }
}
