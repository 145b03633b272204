//! Rendering a registered unit against caller data.
//!
//! Output is streamed straight into the caller's writer. When execution
//! fails part way the bytes already written stay written; callers that need
//! all-or-nothing output should render into a buffer first.

use regex::Regex;
use serde::Serialize;
use std::io::Write;
use std::sync::LazyLock;
use tera::Context as TeraContext;

use super::namespace::CompiledTemplate;
use super::registry::TemplateRegistry;
use crate::constants::SHELL_ENTRYPOINT;
use crate::core::{NamespaceKind, RenderError, format_tera_error};

impl TemplateRegistry {
    /// Render the standalone page `key` through the base shell.
    pub fn render_page<T>(&self, out: impl Write, key: &str, data: &T) -> Result<(), RenderError>
    where
        T: Serialize + ?Sized,
    {
        let unit = self.lookup(NamespaceKind::Pages, key)?;
        let context = context_for(key, data)?;
        execute(unit, SHELL_ENTRYPOINT, &context, out)
    }

    /// Render the user page `key` through its own root.
    ///
    /// Data that serializes to null is rejected before the engine runs.
    pub fn render_user_page<T>(
        &self,
        out: impl Write,
        key: &str,
        data: &T,
    ) -> Result<(), RenderError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(data).map_err(|e| invalid_data(key, e))?;
        if value.is_null() {
            tracing::error!("Error parsing user page '{}': data is nil", key);
            return Err(RenderError::NilData {
                key: key.to_string(),
            });
        }

        let unit = self.lookup(NamespaceKind::UserPages, key)?;
        let context = context_for(key, &value)?;
        execute(unit, unit.root(), &context, out)
    }

    /// Render the site template `key` through its own root.
    pub fn render_template<T>(
        &self,
        out: impl Write,
        key: &str,
        data: &T,
    ) -> Result<(), RenderError>
    where
        T: Serialize + ?Sized,
    {
        let unit = self.lookup(NamespaceKind::Templates, key)?;
        let context = context_for(key, data)?;
        execute(unit, unit.root(), &context, out)
    }

    /// Render `key` from the namespace `kind` using that namespace's root.
    pub fn render<T>(
        &self,
        kind: NamespaceKind,
        out: impl Write,
        key: &str,
        data: &T,
    ) -> Result<(), RenderError>
    where
        T: Serialize + ?Sized,
    {
        match kind {
            NamespaceKind::Templates => self.render_template(out, key, data),
            NamespaceKind::Pages => self.render_page(out, key, data),
            NamespaceKind::UserPages => self.render_user_page(out, key, data),
        }
    }

    fn lookup(&self, kind: NamespaceKind, key: &str) -> Result<&CompiledTemplate, RenderError> {
        self.namespace(kind).get(key).ok_or_else(|| {
            tracing::error!("No {} template registered for key '{}'", kind, key);
            RenderError::UnknownKey {
                namespace: kind,
                key: key.to_string(),
            }
        })
    }
}

fn invalid_data(key: &str, err: impl std::fmt::Display) -> RenderError {
    RenderError::InvalidData {
        key: key.to_string(),
        source: tera::Error::msg(err.to_string()),
    }
}

fn context_for<T>(key: &str, data: &T) -> Result<TeraContext, RenderError>
where
    T: Serialize + ?Sized,
{
    TeraContext::from_serialize(data).map_err(|source| {
        tracing::error!("Data for '{}' is not an object: {}", key, source);
        RenderError::InvalidData {
            key: key.to_string(),
            source,
        }
    })
}

fn execute(
    unit: &CompiledTemplate,
    entrypoint: &str,
    context: &TeraContext,
    out: impl Write,
) -> Result<(), RenderError> {
    unit.render_to(entrypoint, context, out).map_err(|source| {
        let message = format_tera_error(&source);
        match missing_variable(&message) {
            Some(variable) => tracing::error!(
                "Error parsing {}: variable `{}` missing from data ({})",
                unit.key(),
                variable,
                message
            ),
            None => tracing::error!("Error parsing {}: {}", unit.key(), message),
        }
        RenderError::Execution {
            key: unit.key().to_string(),
            message,
            source,
        }
    })
}

static MISSING_VARIABLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Variable `([^`]+)` not found").ok());

/// Name of the variable an engine error message complains about, if any.
#[must_use]
pub fn missing_variable(message: &str) -> Option<String> {
    let re = MISSING_VARIABLE.as_ref()?;
    re.captures(message).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
}
