//! Command-line interface for operators of a blog instance.
//!
//! The binary wraps the library so the template trees of an installation can
//! be prepared and inspected without starting the web server:
//!
//! - `unpack` - write the bundled `templates/`, `pages/` and `static/` trees
//! - `check` - load every template exactly as the server does at startup
//! - `list` - print the keys registered in a namespace
//! - `render` - render one key against a JSON data file to stdout
//!
//! # Examples
//!
//! ```bash
//! freely-templates unpack --dir /srv/blog
//! freely-templates --config /srv/blog/config.toml check
//! freely-templates list --namespace user
//! freely-templates render about.tmpl --data about.json
//! freely-templates render collection --namespace templates --data c.json --strings fr.toml
//! ```

mod check;
mod list;
mod render;
mod unpack;


use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::l10n::StringTables;
use crate::templating::{FunctionLibrary, TemplateRegistry};

/// Settings derived from the global flags, applied once before dispatch.
///
/// Kept separate from [`Cli`] so tests can drive commands with a known
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Filter for the log subscriber; `None` disables logging.
    ///
    /// `RUST_LOG`, when set, takes precedence over this value.
    pub log_level: Option<String>,

    /// Configuration file to load instead of the built-in defaults.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global `tracing` subscriber, writing to stderr.
    ///
    /// Does nothing when logging is disabled or a subscriber already exists.
    pub fn init_logging(&self) {
        let Some(level) = &self.log_level else {
            return;
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load the [`Config`] named by `config_path`, or the defaults.
    pub fn load(&self) -> Result<Config> {
        Config::load_with_optional(self.config_path.as_deref())
    }
}

/// Template tooling for WriteFreely-style blogs.
#[derive(Parser)]
#[command(
    name = "freely-templates",
    about = "Unpack, check and render blog templates",
    version,
    long_about = "Prepares and inspects the templates/ and pages/ trees a blog instance \
                  loads at startup."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log every unit as it is compiled
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "FREELY_TEMPLATES_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the bundled template trees, keeping existing files.
    Unpack(unpack::UnpackCommand),

    /// Load all templates and report what was registered.
    Check(check::CheckCommand),

    /// List the keys of one namespace.
    List(list::ListCommand),

    /// Render one template to stdout.
    Render(render::RenderCommand),
}

impl Cli {
    /// Execute the parsed command line.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Translate the global flags into a [`CliConfig`].
    ///
    /// `--verbose` selects `debug`, `--quiet` disables logging, otherwise
    /// `info` is used.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();
        let settings = config.load()?;

        match self.command {
            Commands::Unpack(cmd) => cmd.execute(&settings),
            Commands::Check(cmd) => cmd.execute(&settings),
            Commands::List(cmd) => cmd.execute(&settings),
            Commands::Render(cmd) => cmd.execute(&settings),
        }
    }
}

/// Function library backed by the string tables in `strings`, or by empty
/// tables when no file is given.
fn function_library(strings: Option<&Path>) -> Result<Arc<FunctionLibrary>> {
    let tables = match strings {
        Some(path) => StringTables::load_from(path)?,
        None => StringTables::new(),
    };
    Ok(Arc::new(FunctionLibrary::new(Arc::new(tables))))
}

/// Load the registry for `config`, adding the configured roots as context.
fn load_registry(config: &Config, library: Arc<FunctionLibrary>) -> Result<TemplateRegistry> {
    TemplateRegistry::init(config, library).with_context(|| {
        format!(
            "Failed to load templates from {} and {}",
            config.templates_path().display(),
            config.pages_path().display()
        )
    })
}
