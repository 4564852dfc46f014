// Marker definitions for paired extraction

use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};

/// Literal that opens an Execution Block
pub const DEFAULT_BLOCK_MARKER: &str = "Executed";

/// Literal that opens an Error Line (and terminates the preceding block)
pub const DEFAULT_ERROR_MARKER: &str = "Error:";

/// Pair of literal markers the extractor scans for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSet {
    block: String,
    error: String,
}

impl MarkerSet {
    /// Create a marker set, rejecting empty markers
    ///
    /// An empty block marker would match at every offset, so both sides
    /// must carry at least one character.
    pub fn new(block: impl Into<String>, error: impl Into<String>) -> Result<Self> {
        let block = block.into();
        let error = error.into();

        if block.is_empty() {
            return Err(DomainError::EmptyMarker("block"));
        }
        if error.is_empty() {
            return Err(DomainError::EmptyMarker("error"));
        }

        Ok(Self { block, error })
    }

    pub fn block(&self) -> &str {
        &self.block
    }

    pub fn error(&self) -> &str {
        &self.error
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            block: DEFAULT_BLOCK_MARKER.to_string(),
            error: DEFAULT_ERROR_MARKER.to_string(),
        }
    }
}
