//! qabot configuration
//!
//! Config file: ~/.config/qabot/config.toml, or the path given with `--config`.
//!
//! ```toml
//! [knowledge]
//! path = "knowledge_base.json"
//!
//! [output]
//! color = "auto"
//! ```

use crate::store::DEFAULT_KB_PATH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the knowledge base path
pub const KB_PATH_ENV: &str = "QABOT_KB";

/// Color display mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when writing to a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn use_color(&self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Auto => is_terminal,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,
}

/// Knowledge base location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Relative paths resolve against the working directory
    #[serde(default = "default_kb_path")]
    pub path: PathBuf,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: default_kb_path(),
        }
    }
}

fn default_kb_path() -> PathBuf {
    PathBuf::from(DEFAULT_KB_PATH)
}

/// Main qabot configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QabotConfig {
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl QabotConfig {
    /// Default user config path: ~/.config/qabot/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("qabot").join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Otherwise the user config is used when
    /// present, and defaults when not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::user_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: QabotConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Knowledge base path. Priority: command line, then `$QABOT_KB`, then
    /// this config.
    pub fn resolve_kb_path(&self, cli: Option<&Path>, env: Option<&str>) -> PathBuf {
        if let Some(path) = cli {
            return path.to_path_buf();
        }
        match env.filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => self.knowledge.path.clone(),
        }
    }
}
