//! Logging setup
//!
//! Logs go to stderr so stdout carries only child output and reports.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (default: `failmap=info`)
//! - `FAILMAP_LOG_FORMAT`: `json` for structured output, anything else for pretty

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "failmap=info";

pub fn init_logging() {
    let log_format = std::env::var("FAILMAP_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
