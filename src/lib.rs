//! Template composition, loading and rendering for WriteFreely-style blogs.
//!
//! A blog instance serves its HTML from three kinds of templates:
//!
//! - **site templates** in a flat `templates/` directory (collections,
//!   posts, the reader)
//! - **pages** in a nested `pages/` tree (about, login, landing, ...)
//! - **user pages** in a nested `templates/user/` tree (the signed-in
//!   author's dashboard)
//!
//! Each of them is composed at startup with the shared fragments it needs
//! (the base shell, branding, footers, post listings, ...), compiled once and
//! kept in a read-only [`templating::TemplateRegistry`]. Request handlers
//! then render by key.
//!
//! # Modules
//!
//! - [`assets`] - the embedded default bundle and first-run unpacking
//! - [`cli`] - the `freely-templates` command line
//! - [`config`] - where the template trees live
//! - [`constants`] - directory names, fragment names and brand strings
//! - [`core`] - error types and user-facing error formatting
//! - [`l10n`] - localized string tables for `localstr`/`localhtml`
//! - [`templating`] - function library, fragment plans, loader, registry,
//!   renderer
//!
//! # Startup
//!
//! ```rust,no_run
//! use freely_templates::assets::unpack::unpack_templates;
//! use freely_templates::config::Config;
//! use freely_templates::templating::{FunctionLibrary, TemplateRegistry};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! unpack_templates(Path::new("/srv/blog"))?;
//!
//! let config = Config::with_root("/srv/blog");
//! let registry = TemplateRegistry::init(&config, Arc::new(FunctionLibrary::default()))?;
//! println!("{} pages", registry.pages().len());
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod l10n;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
