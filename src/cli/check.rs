//! `check`: load every template the way the server does at startup.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::{function_library, load_registry};
use crate::config::Config;

/// Arguments of `freely-templates check`.
#[derive(Args)]
pub struct CheckCommand {
    /// Localized string tables (TOML) to compile against
    #[arg(long, value_name = "FILE")]
    pub strings: Option<PathBuf>,
}

impl CheckCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let library = function_library(self.strings.as_deref())?;
        let registry = load_registry(config, library)?;

        println!(
            "{} {} templates, {} pages, {} user pages",
            "✓".green(),
            registry.templates().len(),
            registry.pages().len(),
            registry.user_pages().len()
        );
        Ok(())
    }
}
