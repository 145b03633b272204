//! Startup: discover, compose and compile every unit into its namespace.

use std::path::Path;
use std::sync::Arc;

use super::fragments::FragmentPlan;
use super::functions::FunctionLibrary;
use super::loader::{self, SourceFile};
use super::namespace::{CompiledTemplate, Namespace};
use crate::config::Config;
use crate::constants::{PAGES_DIR, TEMPLATES_DIR, USER_DIR};
use crate::core::{NamespaceKind, StartupError};

/// Owner of the three namespaces.
///
/// Built once by [`TemplateRegistry::init`]; afterwards it only hands out
/// shared references, so any number of threads may render concurrently.
#[derive(Debug)]
pub struct TemplateRegistry {
    templates: Namespace,
    pages: Namespace,
    user_pages: Namespace,
    library: Arc<FunctionLibrary>,
}

impl TemplateRegistry {
    /// Load every template, page and user page below the configured roots.
    ///
    /// Fails with a path-qualified error when `templates/` or `pages/` is
    /// missing, and on the first fragment that cannot be read or parsed.
    pub fn init(config: &Config, library: Arc<FunctionLibrary>) -> Result<Self, StartupError> {
        let templates_dir = config.templates_path();
        ensure_root(&templates_dir, TEMPLATES_DIR)?;

        tracing::info!("Loading templates...");
        let mut templates = Namespace::new(NamespaceKind::Templates);
        for source in loader::discover_templates(&templates_dir)? {
            load_unit(&mut templates, source, &templates_dir, &library)?;
        }

        let pages_dir = config.pages_path();
        ensure_root(&pages_dir, PAGES_DIR)?;

        tracing::info!("Loading pages...");
        let mut pages = Namespace::new(NamespaceKind::Pages);
        for source in loader::discover_pages(&pages_dir)? {
            load_unit(&mut pages, source, &templates_dir, &library)?;
        }

        tracing::info!("Loading user pages...");
        let mut user_pages = Namespace::new(NamespaceKind::UserPages);
        for source in loader::discover_user_pages(&templates_dir.join(USER_DIR))? {
            load_unit(&mut user_pages, source, &templates_dir, &library)?;
        }

        tracing::info!(
            "Loaded {} templates, {} pages, {} user pages",
            templates.len(),
            pages.len(),
            user_pages.len()
        );

        Ok(Self {
            templates,
            pages,
            user_pages,
            library,
        })
    }

    #[must_use]
    pub const fn templates(&self) -> &Namespace {
        &self.templates
    }

    #[must_use]
    pub const fn pages(&self) -> &Namespace {
        &self.pages
    }

    #[must_use]
    pub const fn user_pages(&self) -> &Namespace {
        &self.user_pages
    }

    #[must_use]
    pub const fn namespace(&self, kind: NamespaceKind) -> &Namespace {
        match kind {
            NamespaceKind::Templates => &self.templates,
            NamespaceKind::Pages => &self.pages,
            NamespaceKind::UserPages => &self.user_pages,
        }
    }

    /// The function library every unit was compiled with.
    #[must_use]
    pub fn library(&self) -> &FunctionLibrary {
        &self.library
    }
}

fn ensure_root(path: &Path, kind: &'static str) -> Result<(), StartupError> {
    match path.try_exists() {
        Ok(true) => Ok(()),
        Ok(false) => Err(StartupError::MissingDirectory {
            kind,
            path: std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
        }),
        Err(source) => Err(StartupError::Walk {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn load_unit(
    namespace: &mut Namespace,
    source: SourceFile,
    templates_dir: &Path,
    library: &FunctionLibrary,
) -> Result<(), StartupError> {
    tracing::debug!("  [{}] {}", source.key, source.path.display());

    let plan = FragmentPlan::build(namespace.kind(), &source.key, &source.path, templates_dir);
    let unit = CompiledTemplate::compile(&plan, library)?;

    if let Some(previous) = namespace.insert(unit) {
        tracing::warn!(
            "{} key '{}' defined more than once: {} replaces {}",
            namespace.kind(),
            source.key,
            source.path.display(),
            previous.source_path().display()
        );
    }
    Ok(())
}
