// Report Store Port
// Reading raw logs and persisting rendered reports

use async_trait::async_trait;
use std::path::Path;

use crate::domain::RenderedReport;
use crate::error::Result;

/// Report Store trait
///
/// Implementations:
/// - FileReportStore: plain files on the local filesystem
/// - InMemoryReportStore: path-keyed strings (tests)
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Read a captured log in full
    ///
    /// # Errors
    /// - AppError::Io if the file is missing or unreadable
    async fn read_raw(&self, path: &Path) -> Result<String>;

    /// Replace the contents at `path` with the report (truncate, then write)
    ///
    /// # Errors
    /// - AppError::Io if the path cannot be created or written
    async fn write_report(&self, path: &Path, report: &RenderedReport) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use crate::error::AppError;

    /// In-memory store keyed by path
    #[derive(Default)]
    pub struct InMemoryReportStore {
        files: Mutex<HashMap<PathBuf, String>>,
        read_only: bool,
    }

    impl InMemoryReportStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Store whose writes always fail with PermissionDenied
        pub fn new_read_only() -> Self {
            Self {
                read_only: true,
                ..Default::default()
            }
        }

        pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
            self.files
                .lock()
                .unwrap()
                .insert(path.into(), contents.into());
            self
        }

        pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
            self.files.lock().unwrap().get(path.as_ref()).cloned()
        }
    }

    #[async_trait]
    impl ReportStore for InMemoryReportStore {
        async fn read_raw(&self, path: &Path) -> Result<String> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| {
                    AppError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("{} not found", path.display()),
                    ))
                })
        }

        async fn write_report(&self, path: &Path, report: &RenderedReport) -> Result<()> {
            if self.read_only {
                return Err(AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("{} is read-only", path.display()),
                )));
            }
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), report.as_str().to_string());
            Ok(())
        }
    }
}
