//! `unpack`: write the bundled template trees to disk.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::assets::unpack::unpack_templates;
use crate::config::Config;

/// Arguments of `freely-templates unpack`.
#[derive(Args)]
pub struct UnpackCommand {
    /// Directory to unpack into [default: the configured templates parent]
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

impl UnpackCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let root = self.dir.unwrap_or_else(|| config.server.templates_parent_dir.clone());
        let root = if root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            root
        };

        let report = unpack_templates(&root)
            .with_context(|| format!("Failed to unpack templates into {}", root.display()))?;

        println!(
            "{} Unpacked into {}: {} directories and {} files created, {} left as they were",
            "✓".green(),
            root.display(),
            report.created_dirs,
            report.created_files,
            report.left_existing
        );
        Ok(())
    }
}
