//! Template composition, loading and rendering for the blog front end.
//!
//! Templates live in two on-disk roots: `templates/` (site templates, shared
//! fragments and `templates/user/`) and `pages/` (standalone pages). At
//! startup every source file is composed with the shared fragments it needs,
//! parsed into one [`CompiledTemplate`] and stored under a key in one of
//! three namespaces. After that the [`TemplateRegistry`] is read-only and can
//! be shared between request handlers.
//!
//! # Namespaces
//!
//! | Namespace    | Source                      | Key                                |
//! |--------------|-----------------------------|------------------------------------|
//! | `templates`  | files directly in `templates/` | file name up to the first `.`   |
//! | `pages`      | any file below `pages/`     | file name, extension included      |
//! | `user`       | any file below `templates/user/` | relative path, at most one parent |
//!
//! # Composition
//!
//! Each unit is a Tera instance holding one template per fragment. A
//! fragment is named by its path relative to `templates/` without the
//! `.tmpl` extension (`base`, `include/footer`, `user/include/nav`), and the
//! unit's own source file is named `page`. A unit built from a shared
//! fragment, such as the `base` site template, keeps the shared name
//! instead. Fragments reference each other with
//! `{% include "include/footer" %}`.
//!
//! Which fragments a unit gets is decided by [`fragments::FragmentPlan`]:
//!
//! - site templates and pages get the base shell spine
//! - user pages get the user chrome spine
//! - known identifiers additionally get category fragments (post listings,
//!   federated collections, post bodies, authentication forms)
//!
//! Pages are rendered from the `base` shell, which includes `page`. Site
//! templates and user pages are rendered from their own root directly.
//! Rendering the shell on its own fails, since it has no `page` to include.
//!
//! # Functions
//!
//! Every unit is compiled with the same [`FunctionLibrary`]:
//!
//! ```text
//! {{ largeNumFmt(n=views) }}
//! {{ pluralize(singular="post", plural="posts", n=count) }}
//! {% if isRTL(d=collection.direction) %}...{% endif %}
//! {{ localstr(term="Publish", lang=lang) }}
//! {{ localhtml(term="published with write.as", lang=lang) }}
//! {{ title(s="hello world") }}
//! {% set link = dict(pairs=["href", "/me", "label", username]) %}
//! ```
//!
//! # Rendering
//!
//! ```rust,no_run
//! use freely_templates::config::Config;
//! use freely_templates::templating::{FunctionLibrary, TemplateRegistry};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let registry = TemplateRegistry::init(&Config::default(), Arc::new(FunctionLibrary::default()))?;
//! let mut out = Vec::new();
//! registry.render_page(&mut out, "about.tmpl", &json!({ "title": "About" }))?;
//! # Ok(())
//! # }
//! ```
//!
//! All output is HTML-escaped unless it comes from `localhtml`.

pub mod fragments;
pub mod functions;
pub mod loader;
pub mod namespace;
mod registry;
mod renderer;

pub use fragments::{Category, FragmentPlan};
pub use functions::{FunctionLibrary, Helper};
pub use namespace::{CompiledTemplate, Namespace};
pub use registry::TemplateRegistry;
pub use renderer::missing_variable;
