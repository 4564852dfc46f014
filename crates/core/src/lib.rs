// failmap Core - Extraction Logic & Ports
// NO infrastructure dependencies: processes and files live behind ports

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use config::ScrapeConfig;
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
