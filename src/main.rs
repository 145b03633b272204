//! `freely-templates` entry point.
//!
//! Parses the command line, runs the selected command and turns any error
//! into a colored message with a suggestion before exiting with status 1.

use anyhow::Result;
use clap::Parser;
use freely_templates::cli;
use freely_templates::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
