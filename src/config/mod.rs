//! Configuration for template loading.
//!
//! Only the two root paths the loader needs are modeled here:
//!
//! ```toml
//! [server]
//! templates_parent_dir = "/srv/blog"
//! pages_parent_dir = "/srv/blog"
//! ```
//!
//! Templates are then read from `<templates_parent_dir>/templates/` and pages
//! from `<pages_parent_dir>/pages/`. Both default to the empty path, i.e. the
//! current working directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{PAGES_DIR, TEMPLATES_DIR};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server section: where the template trees live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Parent of the `templates/` directory.
    #[serde(default)]
    pub templates_parent_dir: PathBuf,

    /// Parent of the `pages/` directory.
    #[serde(default)]
    pub pages_parent_dir: PathBuf,
}

impl Config {
    /// Configuration whose template and page trees both live under `root`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            server: ServerConfig {
                templates_parent_dir: root.clone(),
                pages_parent_dir: root,
            },
        }
    }

    /// Load configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load_with_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Directory holding the flat site templates.
    #[must_use]
    pub fn templates_path(&self) -> PathBuf {
        self.server.templates_parent_dir.join(TEMPLATES_DIR)
    }

    /// Directory holding the nested page tree.
    #[must_use]
    pub fn pages_path(&self) -> PathBuf {
        self.server.pages_parent_dir.join(PAGES_DIR)
    }
}
