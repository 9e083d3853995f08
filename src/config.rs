//! Configuration loading for the zl toolchain.
//!
//! `defaults/zl.default.toml` is embedded into the crate so that documented and
//! runtime defaults stay in sync. Applications layer user files and overrides on
//! top of those defaults via [`Loader`] before deserializing into [`ZlConfig`].
//! The compiler itself only sees [`CompilerOptions`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::formats::DEFAULT_WIKI_BASE_URL;
use crate::lexer::indentation_transform::{DEFAULT_MAX_DEPTH, DEFAULT_TAB_WIDTH};

const DEFAULT_TOML: &str = include_str!("../defaults/zl.default.toml");

/// File picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "zl.toml";

/// Top-level configuration consumed by zl applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ZlConfig {
    pub lexer: LexerConfig,
    pub render: RenderConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexerConfig {
    /// Columns a tab expands to when measuring indentation
    pub tab_width: usize,
    /// Maximum number of open indentation levels
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub wiki_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Output mode name used when none is given explicitly
    pub default_mode: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<ZlConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ZlConfig, ConfigError> {
    Loader::new().build()
}

/// Settings the compiler pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    pub tab_width: usize,
    pub max_depth: usize,
    pub wiki_base_url: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            max_depth: DEFAULT_MAX_DEPTH,
            wiki_base_url: DEFAULT_WIKI_BASE_URL.to_string(),
        }
    }
}

impl From<&ZlConfig> for CompilerOptions {
    fn from(config: &ZlConfig) -> Self {
        Self {
            tab_width: config.lexer.tab_width,
            max_depth: config.lexer.max_depth,
            wiki_base_url: config.render.wiki_base_url.clone(),
        }
    }
}
