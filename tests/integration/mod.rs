//! Integration test suite for freely-templates
//!
//! End-to-end tests that unpack the bundled templates into a temporary
//! directory, load them the way a server does at startup and render them.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **bundle**: the embedded default bundle, unpacked, loaded and rendered
//! - **startup**: path-qualified startup failures
//! - **render**: render-time failures
//! - **cli**: the `freely-templates` binary

use freely_templates::assets::unpack::unpack_templates;
use freely_templates::config::Config;
use freely_templates::templating::{FunctionLibrary, TemplateRegistry};
use serde::Serialize;
use std::sync::Arc;
use tempfile::TempDir;

mod bundle;
mod cli;
mod render;
mod startup;

/// Unpack the bundled trees into a fresh temporary directory.
fn unpacked_bundle() -> TempDir {
    let dir = TempDir::new().unwrap();
    unpack_templates(dir.path()).unwrap();
    dir
}

/// Load the registry rooted at `dir` with `library`.
fn load(dir: &TempDir, library: FunctionLibrary) -> TemplateRegistry {
    TemplateRegistry::init(&Config::with_root(dir.path()), Arc::new(library)).unwrap()
}

fn render_page(registry: &TemplateRegistry, key: &str, data: &impl Serialize) -> String {
    let mut out = Vec::new();
    registry.render_page(&mut out, key, data).unwrap();
    String::from_utf8(out).unwrap()
}

fn render_template(registry: &TemplateRegistry, key: &str, data: &impl Serialize) -> String {
    let mut out = Vec::new();
    registry.render_template(&mut out, key, data).unwrap();
    String::from_utf8(out).unwrap()
}

fn render_user_page(registry: &TemplateRegistry, key: &str, data: &impl Serialize) -> String {
    let mut out = Vec::new();
    registry.render_user_page(&mut out, key, data).unwrap();
    String::from_utf8(out).unwrap()
}
