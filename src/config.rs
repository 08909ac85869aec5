//! Configuration loader for relang.
//!
//! Two things are configurable: the limits the regex builder applies when a
//! grammar is compiled, and the tracing filter. Their defaults live in
//! `defaults/relang.default.toml`, which is compiled into the crate and read
//! before any user file.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/relang.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RelangConfig {
    pub compile: CompileOptions,
    pub log: LogConfig,
}

/// Limits handed to the regex builder for both derived patterns.
///
/// The defaults are the regex engine's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CompileOptions {
    pub size_limit: usize,
    pub dfa_size_limit: usize,
    pub nest_limit: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            size_limit: 10 * (1 << 20),
            dfa_size_limit: 2 * (1 << 20),
            nest_limit: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `warn` or `relang=debug`.
    pub filter: String,
}

/// Builds a [`RelangConfig`] from the embedded defaults, an optional
/// `--config` file and command-line overrides, in that order.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// The engine's regex limits and a `warn` log filter.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Read `[compile]` limits and `[log]` settings from a TOML file.
    ///
    /// The file has to exist; `build` reports it otherwise.
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Replace the tracing filter, whatever the files said.
    pub fn with_log_filter(self, filter: &str) -> Result<Self, ConfigError> {
        self.set_override("log.filter", filter)
    }

    /// Set one dotted key such as `compile.nest_limit`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<RelangConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<RelangConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_defaults_match_compile_options_default() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.compile, CompileOptions::default());
        assert_eq!(config.log.filter, "warn");
    }

    #[test]
    fn test_overrides_replace_single_keys() {
        let config = Loader::new()
            .set_override("compile.nest_limit", 32)
            .expect("override to apply")
            .with_log_filter("relang=debug")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.compile.nest_limit, 32);
        assert_eq!(config.compile.size_limit, 10 * (1 << 20));
        assert_eq!(config.log.filter, "relang=debug");
    }

    #[test]
    fn test_user_file_layers_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[compile]\nsize_limit = 4096").unwrap();

        let config = Loader::new().with_config_file(file.path()).build().unwrap();
        assert_eq!(config.compile.size_limit, 4096);
        assert_eq!(config.compile.dfa_size_limit, 2 * (1 << 20));
    }

    #[test]
    fn test_log_filter_wins_over_the_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[log]\nfilter = \"relang=trace\"").unwrap();

        let config = Loader::new()
            .with_config_file(file.path())
            .with_log_filter("warn")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.log.filter, "warn");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let missing = Path::new("/nonexistent/relang.toml");
        assert!(Loader::new().with_config_file(missing).build().is_err());
    }
}
