// Scrape configuration
// Defaults reproduce the original fixed literals; every field can be overridden

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{MarkerSet, DEFAULT_BLOCK_MARKER, DEFAULT_ERROR_MARKER};
use crate::error::{AppError, Result};

/// File the runner writes and the extractor reads by default
pub const DEFAULT_REPORT_PATH: &str = "output.txt";

/// Test command run when none is configured
pub const DEFAULT_COMMAND: &str = "ng test --include=C:\\Users\\Sky\\Desktop\\orleans\\ng-bootstrap\\src\\accordion\\gocodeo_tests\\test_accordion.directive_HappyPath.spec.ts -c coverage";

/// Recognized options for both entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Log read by `extract`
    pub input_path: PathBuf,
    /// Report written by `run` (and by `extract --write`)
    pub output_path: PathBuf,
    /// Shell command line executed verbatim by `run`
    pub command: String,
    pub block_marker: String,
    pub error_marker: String,
    /// No timeout when unset
    pub timeout_ms: Option<u64>,
    pub working_dir: Option<PathBuf>,
    /// Echo child stdout to the console as it arrives
    pub echo: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_REPORT_PATH),
            output_path: PathBuf::from(DEFAULT_REPORT_PATH),
            command: DEFAULT_COMMAND.to_string(),
            block_marker: DEFAULT_BLOCK_MARKER.to_string(),
            error_marker: DEFAULT_ERROR_MARKER.to_string(),
            timeout_ms: None,
            working_dir: None,
            echo: true,
        }
    }
}

impl ScrapeConfig {
    pub fn markers(&self) -> Result<MarkerSet> {
        Ok(MarkerSet::new(&self.block_marker, &self.error_marker)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Reject settings that would make `run` meaningless
    pub fn validate(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(AppError::Config("command must not be empty".to_string()));
        }
        if self.timeout_ms == Some(0) {
            return Err(AppError::Config(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        self.markers()?;
        Ok(())
    }
}
