// File-backed report store
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use failmap_core::domain::RenderedReport;
use failmap_core::port::ReportStore;
use failmap_core::Result;

/// Reads logs and writes reports as plain files
///
/// Writes create the file or truncate an existing one; there is no append,
/// locking or atomic rename.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileReportStore;

impl FileReportStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReportStore for FileReportStore {
    async fn read_raw(&self, path: &Path) -> Result<String> {
        let raw = tokio::fs::read_to_string(path).await?;
        debug!(path = %path.display(), bytes = raw.len(), "Log read");
        Ok(raw)
    }

    async fn write_report(&self, path: &Path, report: &RenderedReport) -> Result<()> {
        tokio::fs::write(path, report.as_str()).await?;
        debug!(path = %path.display(), bytes = report.as_str().len(), "Report written");
        Ok(())
    }
}
