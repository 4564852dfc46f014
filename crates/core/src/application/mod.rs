// Application Layer - Use Cases

pub mod extractor;
pub mod log_extract;
pub mod run_report;

// Re-exports
pub use extractor::{Extraction, PairedMarkerExtractor};
pub use log_extract::LogExtractService;
pub use run_report::{RunReport, RunReportService};
