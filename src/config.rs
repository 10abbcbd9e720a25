use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Site layout. Relative paths are taken from the config file's directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown sources, mirrored into `output` as `.html` pages.
    pub content: PathBuf,
    /// Assets copied verbatim into `output`.
    #[serde(rename = "static")]
    pub static_dir: PathBuf,
    /// HTML template with `{{ Title }}` and `{{ Content }}` placeholders.
    pub template: PathBuf,
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            static_dir: PathBuf::from("static"),
            template: PathBuf::from("template.html"),
            output: PathBuf::from("public"),
        }
    }
}

impl Config {
    /// The configuration bundled with the binary.
    pub fn compiled_default() -> Self {
        // build.rs has already checked the syntax
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::compiled_default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Anchor relative paths at `base`; absolute paths are left alone.
    pub fn resolve(mut self, base: &Path) -> Self {
        for path in [
            &mut self.content,
            &mut self.static_dir,
            &mut self.template,
            &mut self.output,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}
