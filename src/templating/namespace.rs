//! Compiled templates and the namespaces holding them.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tera::{Context as TeraContext, Tera};

use super::fragments::FragmentPlan;
use super::functions::FunctionLibrary;
use crate::core::{NamespaceKind, StartupError, format_tera_error};

/// One parsed and linked unit built from every fragment of a
/// [`FragmentPlan`]. Immutable once built.
#[derive(Debug)]
pub struct CompiledTemplate {
    key: String,
    kind: NamespaceKind,
    source: PathBuf,
    root: String,
    fragments: Vec<String>,
    tera: Tera,
}

impl CompiledTemplate {
    /// Read and parse every fragment of `plan`.
    ///
    /// Fragments are added in plan order, so a later fragment registered
    /// under an existing name replaces the earlier one.
    pub fn compile(plan: &FragmentPlan, library: &FunctionLibrary) -> Result<Self, StartupError> {
        let mut sources = Vec::with_capacity(plan.fragments.len());
        for fragment in &plan.fragments {
            let content =
                fs::read_to_string(&fragment.path).map_err(|source| StartupError::ReadFragment {
                    key: plan.key.clone(),
                    path: fragment.path.clone(),
                    source,
                })?;
            sources.push((fragment.name.as_str(), content));
        }

        let mut tera = Tera::default();
        tera.autoescape_on(vec![""]);
        library.install(&mut tera);
        tera.add_raw_templates(sources).map_err(|source| StartupError::Compile {
            key: plan.key.clone(),
            message: format_tera_error(&source),
            source,
        })?;

        Ok(Self {
            key: plan.key.clone(),
            kind: plan.kind,
            source: plan.primary().path.clone(),
            root: plan.root().to_string(),
            fragments: plan.names().map(str::to_string).collect(),
            tera,
        })
    }

    /// Key the unit is registered under in its namespace.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Namespace the unit was compiled for.
    #[must_use]
    pub const fn kind(&self) -> NamespaceKind {
        self.kind
    }

    /// Fragment name of the primary file, rendered by
    /// [`TemplateRegistry::render_template`](super::TemplateRegistry::render_template)
    /// and [`TemplateRegistry::render_user_page`](super::TemplateRegistry::render_user_page).
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Path of the unit's primary file.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source
    }

    /// Fragment names in the order they were added.
    #[must_use]
    pub fn fragment_names(&self) -> &[String] {
        &self.fragments
    }

    /// Whether a fragment called `name` was added.
    #[must_use]
    pub fn has_fragment(&self, name: &str) -> bool {
        self.fragments.iter().any(|f| f == name)
    }

    /// Execute the fragment `entrypoint`, streaming into `out`.
    pub(crate) fn render_to(
        &self,
        entrypoint: &str,
        context: &TeraContext,
        out: impl Write,
    ) -> tera::Result<()> {
        self.tera.render_to(entrypoint, context, out)
    }
}

/// Key to compiled template mapping for one namespace.
///
/// Filled once during startup; only read afterwards.
#[derive(Debug)]
pub struct Namespace {
    kind: NamespaceKind,
    units: HashMap<String, CompiledTemplate>,
}

impl Namespace {
    /// An empty namespace of the given kind.
    #[must_use]
    pub fn new(kind: NamespaceKind) -> Self {
        Self {
            kind,
            units: HashMap::new(),
        }
    }

    /// Store `unit` under its key, returning the unit it replaced.
    pub(crate) fn insert(&mut self, unit: CompiledTemplate) -> Option<CompiledTemplate> {
        self.units.insert(unit.key.clone(), unit)
    }

    /// Which of the three namespaces this is.
    #[must_use]
    pub const fn kind(&self) -> NamespaceKind {
        self.kind
    }

    /// The unit registered under `key`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use freely_templates::config::Config;
    /// # use freely_templates::templating::TemplateRegistry;
    /// # fn main() -> anyhow::Result<()> {
    /// let registry = TemplateRegistry::init(&Config::default(), Default::default())?;
    /// if let Some(unit) = registry.pages().get("about.tmpl") {
    ///     println!("{} from {}", unit.key(), unit.source_path().display());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CompiledTemplate> {
        self.units.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.units.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Registered keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.units.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
