//! `render`: render one key against a JSON data file.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{function_library, load_registry};
use crate::config::Config;
use crate::core::NamespaceKind;

/// Arguments of `freely-templates render`.
#[derive(Args)]
pub struct RenderCommand {
    /// Key to render, e.g. `about.tmpl`, `collection` or `articles.tmpl`
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Namespace the key belongs to (templates, pages, user)
    #[arg(short, long, default_value = "pages")]
    pub namespace: NamespaceKind,

    /// JSON object passed to the template [default: {}]
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Localized string tables (TOML)
    #[arg(long, value_name = "FILE")]
    pub strings: Option<PathBuf>,
}

impl RenderCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let library = function_library(self.strings.as_deref())?;
        let registry = load_registry(config, library)?;
        let data = match &self.data {
            Some(path) => read_data(path)?,
            None => Value::Object(Map::new()),
        };

        // Buffer so a failed render prints nothing.
        let mut out = Vec::new();
        registry.render(self.namespace, &mut out, &self.key, &data)?;

        let mut stdout = io::stdout().lock();
        stdout.write_all(&out).context("Failed to write rendered output")?;
        stdout.flush()?;
        Ok(())
    }
}

fn read_data(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON data from {}", path.display()))
}
