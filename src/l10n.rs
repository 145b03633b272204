//! Localized string lookup.
//!
//! The string tables themselves are owned by the caller; templates only need
//! a way to ask for the table of a language. The table registered under the
//! empty language code is the default that lookups fall back to.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Language code of the default table.
pub const DEFAULT_LANGUAGE: &str = "";

/// A source of per-language term tables.
pub trait Localizer: Send + Sync {
    /// Table for `lang`, if one exists.
    fn strings(&self, lang: &str) -> Option<&HashMap<String, String>>;
}

/// In-memory string tables keyed by language code.
///
/// Deserializes from TOML where each table is a language:
///
/// ```toml
/// [""]
/// "publish" = "Publish"
///
/// [fr]
/// "publish" = "Publier"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StringTables {
    tables: HashMap<String, HashMap<String, String>>,
}

impl StringTables {
    /// Empty tables; every lookup falls back to an empty string.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one term for a language.
    #[must_use]
    pub fn with(mut self, lang: &str, term: &str, value: &str) -> Self {
        self.insert(lang, term, value);
        self
    }

    /// Add or replace `term` in the table for `lang`, creating the table when
    /// the language has none yet.
    pub fn insert(&mut self, lang: &str, term: &str, value: &str) {
        self.tables
            .entry(lang.to_string())
            .or_default()
            .insert(term.to_string(), value.to_string());
    }

    /// Parse tables from TOML text.
    ///
    /// # Examples
    ///
    /// ```
    /// use freely_templates::l10n::{Localizer, StringTables};
    ///
    /// let tables = StringTables::from_toml_str("[fr]\nPublish = \"Publier\"\n").unwrap();
    /// assert_eq!(tables.strings("fr").unwrap()["Publish"], "Publier");
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse string tables")
    }

    /// Load tables from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read string tables from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse string tables from {}", path.display()))
    }

    /// Language codes with a table, sorted.
    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }
}

impl Localizer for StringTables {
    fn strings(&self, lang: &str) -> Option<&HashMap<String, String>> {
        self.tables.get(lang)
    }
}
