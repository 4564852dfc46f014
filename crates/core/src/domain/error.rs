// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Marker must not be empty: {0}")]
    EmptyMarker(&'static str),

    #[error("Invalid marker pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, DomainError>;
