//! Configuration loading
//!
//! Layers, lowest precedence first:
//!
//! 1. Built-in defaults (`ScrapeConfig::default()`)
//! 2. `failmap.toml` in the user config directory
//! 3. `./failmap.toml`, or the file given with `--config` (then required)
//! 4. `FAILMAP_*` environment variables (e.g. `FAILMAP_OUTPUT_PATH`)
//!
//! Command-line flags are applied on top by the caller.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use failmap_core::ScrapeConfig;

pub const CONFIG_FILE_NAME: &str = "failmap.toml";
pub const ENV_PREFIX: &str = "FAILMAP";

/// Config file candidates and whether each must exist
fn config_files(explicit: Option<&Path>) -> Vec<(PathBuf, bool)> {
    let mut files = Vec::new();

    if let Some(dirs) = ProjectDirs::from("", "", "failmap") {
        files.push((dirs.config_dir().join(CONFIG_FILE_NAME), false));
    }

    match explicit {
        Some(path) => files.push((path.to_path_buf(), true)),
        None => files.push((PathBuf::from(CONFIG_FILE_NAME), false)),
    }

    files
}

/// Load the layered configuration
pub fn load(explicit: Option<&Path>) -> Result<ScrapeConfig> {
    build(
        &config_files(explicit),
        Environment::with_prefix(ENV_PREFIX).try_parsing(true),
    )
}

fn build(files: &[(PathBuf, bool)], env: Environment) -> Result<ScrapeConfig> {
    let mut builder = Config::builder();
    for (path, required) in files {
        builder = builder.add_source(
            File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(*required),
        );
    }

    builder
        .add_source(env)
        .build()
        .context("Failed to load configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_no_sources_yields_defaults() {
        let config = build(&[], env(&[])).unwrap();
        assert_eq!(config, ScrapeConfig::default());
    }

    #[test]
    fn test_optional_missing_file_is_skipped() {
        let files = vec![(PathBuf::from("/nonexistent/failmap.toml"), false)];
        let config = build(&files, env(&[])).unwrap();
        assert_eq!(config, ScrapeConfig::default());
    }

    #[test]
    fn test_required_missing_file_fails() {
        let files = vec![(PathBuf::from("/nonexistent/failmap.toml"), true)];
        assert!(build(&files, env(&[])).is_err());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "command = \"npx ng test --watch=false\"\noutput_path = \"reports/failures.txt\"\ntimeout_ms = 60000\n",
        )
        .unwrap();

        let config = build(&[(path, true)], env(&[])).unwrap();

        assert_eq!(config.command, "npx ng test --watch=false");
        assert_eq!(config.output_path, PathBuf::from("reports/failures.txt"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.input_path, PathBuf::from("output.txt"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "echo = true\nblock_marker = \"Executed\"\n").unwrap();

        let config = build(
            &[(path, true)],
            env(&[("FAILMAP_ECHO", "false"), ("FAILMAP_INPUT_PATH", "karma.log")]),
        )
        .unwrap();

        assert!(!config.echo);
        assert_eq!(config.input_path, PathBuf::from("karma.log"));
    }

    #[test]
    fn test_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "timeout_ms = \"soon\"\n").unwrap();

        assert!(build(&[(path, true)], env(&[])).is_err());
    }
}
