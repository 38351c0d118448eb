//! Generator configuration.
//!
//! Only the two directories are configurable. Rendering DPI, bit polarity,
//! packing layout and hex group width are compile-time constants.
//!
//! Resolution order, later wins:
//!
//! | Source                 | Paths relative to          |
//! |------------------------|----------------------------|
//! | built-in defaults      | current directory          |
//! | `icons.toml` (`-C`)    | directory of the file      |
//! | `--svg-dir` etc.       | current directory          |
//!
//! # Example
//!
//! ```toml
//! svg_dir = "assets/icons"
//! output_dir = "firmware/include/icons"
//! ```

mod error;

pub use error::ConfigError;

use crate::{cli::Cli, log};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file looked up in the current directory when `-C` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "icons.toml";

/// Default directory scanned for SVG files.
pub const DEFAULT_SVG_DIR: &str = "icons";

/// Default directory receiving generated headers.
pub const DEFAULT_OUTPUT_DIR: &str = "include/icons";

/// Source and output directories of one generator run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IconsConfig {
    /// Directory scanned recursively for `*.svg`.
    pub svg_dir: PathBuf,
    /// Root directory for generated headers and `icons.h`.
    pub output_dir: PathBuf,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            svg_dir: PathBuf::from(DEFAULT_SVG_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl IconsConfig {
    pub fn new(svg_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            svg_dir: svg_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Load configuration from CLI arguments.
    ///
    /// An explicit `--config` must exist; the implicit `icons.toml` is optional.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_path(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_path(path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_cli(cli);
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        Ok(Self::parse_with_ignored(content)?.0)
    }

    /// Load a config file, resolving its relative paths against its directory.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)
            .map_err(|err| ConfigError::Toml(path.to_path_buf(), err))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        if let Some(base) = path.parent() {
            config.resolve_against(base);
        }
        Ok(config)
    }

    /// Parse and collect the dotted paths of unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Prefix relative paths with `base`.
    fn resolve_against(&mut self, base: &Path) {
        if self.svg_dir.is_relative() {
            self.svg_dir = base.join(&self.svg_dir);
        }
        if self.output_dir.is_relative() {
            self.output_dir = base.join(&self.output_dir);
        }
    }

    /// Command-line directories take precedence over the file.
    fn apply_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.svg_dir, cli.svg_dir.as_ref());
        Self::update_option(&mut self.output_dir, cli.output_dir.as_ref());
    }

    #[inline]
    fn update_option(target: &mut PathBuf, value: Option<&PathBuf>) {
        if let Some(v) = value {
            target.clone_from(v);
        }
    }
}
