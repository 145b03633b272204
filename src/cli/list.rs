//! `list`: print the keys registered in one or all namespaces.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::load_registry;
use crate::config::Config;
use crate::core::NamespaceKind;
use crate::templating::Namespace;

/// Arguments of `freely-templates list`.
#[derive(Args)]
pub struct ListCommand {
    /// Namespace to list (templates, pages, user); all when omitted
    #[arg(short, long)]
    pub namespace: Option<NamespaceKind>,

    /// Also print the source file of each key
    #[arg(long)]
    pub paths: bool,
}

impl ListCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let registry = load_registry(config, Default::default())?;

        match self.namespace {
            Some(kind) => self.print(registry.namespace(kind)),
            None => {
                for kind in NamespaceKind::ALL {
                    println!("{}", format!("{kind}:").bold());
                    self.print(registry.namespace(kind));
                }
            }
        }
        Ok(())
    }

    fn print(&self, namespace: &Namespace) {
        for key in namespace.keys() {
            match namespace.get(key) {
                Some(unit) if self.paths => println!("{key}\t{}", unit.source_path().display()),
                _ => println!("{key}"),
            }
        }
    }
}
