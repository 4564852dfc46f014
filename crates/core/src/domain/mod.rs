// Domain Layer - Extraction entities and report model

pub mod error;
pub mod marker;
pub mod report;

// Re-exports
pub use error::DomainError;
pub use marker::{MarkerSet, DEFAULT_BLOCK_MARKER, DEFAULT_ERROR_MARKER};
pub use report::{ErrorLine, ExecutionBlock, RenderedReport, ResultMapping};
