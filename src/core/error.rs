//! Error handling for template loading, asset unpacking and rendering.
//!
//! Three failure families exist, each with its own type:
//! - [`StartupError`] - a template root is missing, a directory cannot be
//!   walked, or a fragment fails to read or compile. Always fatal.
//! - [`UnpackError`] - materializing the bundled assets failed. Failures of
//!   every asset tree are collected and reported together.
//! - [`RenderError`] - executing a compiled template against a data object
//!   failed. Logged with the key and returned to the caller.
//!
//! [`ErrorContext`] and [`user_friendly_error`] turn any of these (or any
//! other `anyhow` error) into a colored message with a suggestion for the
//! command line.

use colored::Colorize;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::NamespaceKind;

/// Errors raised while building the template registry.
#[derive(Error, Debug)]
pub enum StartupError {
    /// A template root directory does not exist.
    #[error("the directory for the '{kind}/' templates does not exist, should have been at {path:?}")]
    MissingDirectory {
        /// Name of the missing directory (`templates` or `pages`).
        kind: &'static str,
        /// Absolute path where the directory was expected.
        path: PathBuf,
    },

    /// A directory could not be read or walked.
    #[error("problem loading template from {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A fragment file listed in a unit's fragment path could not be read.
    #[error("failed to read fragment {path:?} while building '{key}': {source}")]
    ReadFragment {
        key: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// One of the fragments failed to parse.
    #[error("failed to compile '{key}': {message}")]
    Compile {
        key: String,
        /// Flattened cause chain reported by the engine.
        message: String,
        #[source]
        source: tera::Error,
    },
}

/// One failed entry while unpacking an asset tree.
#[derive(Error, Debug)]
#[error("[{tree}] {path}: {source}")]
pub struct UnpackFailure {
    /// Name of the asset tree (`templates`, `pages`, `static`).
    pub tree: String,
    /// Destination path that could not be created.
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Every failure collected while unpacking the bundled asset trees.
#[derive(Error, Debug)]
#[error("{}", format_unpack_failures(.failures))]
pub struct UnpackError {
    /// Failures in the order the trees were unpacked, at most one per tree.
    pub failures: Vec<UnpackFailure>,
}

fn format_unpack_failures(failures: &[UnpackFailure]) -> String {
    let mut message = format!("failed to unpack {} asset tree(s)", failures.len());
    for failure in failures {
        message.push_str("\n  ");
        message.push_str(&failure.to_string());
    }
    message
}

/// Errors raised while executing a compiled template.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The key was never registered. Route-to-key mappings are expected to be
    /// covered by tests, so this signals a programming defect.
    #[error("no template '{key}' in the {namespace} namespace")]
    UnknownKey { namespace: NamespaceKind, key: String },

    /// A user page was rendered without data.
    #[error("data for user page '{key}' is nil")]
    NilData { key: String },

    /// The data object could not be turned into a template context.
    #[error("data for '{key}' is not usable as a template context: {source}")]
    InvalidData {
        key: String,
        #[source]
        source: tera::Error,
    },

    /// Execution failed part way; output may already have been written.
    #[error("failed to render '{key}': {message}")]
    Execution {
        key: String,
        /// Flattened cause chain reported by the engine.
        message: String,
        #[source]
        source: tera::Error,
    },
}

impl RenderError {
    /// Key of the template this error refers to.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            RenderError::UnknownKey { key, .. }
            | RenderError::NilData { key }
            | RenderError::InvalidData { key, .. }
            | RenderError::Execution { key, .. } => key,
        }
    }
}

/// Flatten an engine error and its causes into one readable line.
pub fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = vec![error.to_string()];
    let mut current: Option<&dyn Error> = error.source();
    while let Some(err) = current {
        let msg = err.to_string();
        if !msg.trim().is_empty() {
            messages.push(msg);
        }
        current = err.source();
    }
    messages.join(" -> ")
}

/// An error paired with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: anyhow::Error,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap `error` with no suggestion or details.
    #[must_use]
    pub fn new(error: anyhow::Error) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a hint printed after the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add extra context printed after the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {:#}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Attach a suggestion to a well-known error found anywhere in the chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let mut suggestion = None;
    let mut details = None;

    for cause in error.chain() {
        if let Some(startup) = cause.downcast_ref::<StartupError>() {
            match startup {
                StartupError::MissingDirectory { .. } => {
                    suggestion = Some(
                        "Run `freely-templates unpack` to materialize the bundled templates, \
                         or point templates_parent_dir / pages_parent_dir at an existing tree"
                            .to_string(),
                    );
                }
                StartupError::Compile { .. } => {
                    suggestion = Some(
                        "Check the fragment for unclosed {{ }} or {% %} delimiters".to_string(),
                    );
                    details = Some(
                        "A fragment shared by many pages fails every page it is part of"
                            .to_string(),
                    );
                }
                StartupError::ReadFragment { .. } => {
                    suggestion = Some(
                        "A shared fragment is missing; re-run `freely-templates unpack` to restore it"
                            .to_string(),
                    );
                }
                StartupError::Walk { .. } => {}
            }
            break;
        }

        if cause.downcast_ref::<UnpackError>().is_some() {
            suggestion = Some("Check permissions on the destination directory".to_string());
            break;
        }

        if let Some(render) = cause.downcast_ref::<RenderError>() {
            if let RenderError::UnknownKey { namespace, .. } = render {
                suggestion = Some(format!(
                    "Run `freely-templates list --namespace {namespace}` to see the available keys"
                ));
            }
            break;
        }

        if cause.downcast_ref::<toml::de::Error>().is_some() {
            suggestion = Some(
                "Check the TOML syntax: verify quotes, brackets and table names".to_string(),
            );
            break;
        }

        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            if io_error.kind() == io::ErrorKind::PermissionDenied {
                suggestion = Some("Check file ownership and permissions".to_string());
                break;
            }
        }
    }

    let mut context = ErrorContext::new(error);
    context.suggestion = suggestion;
    context.details = details;
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_message_is_path_qualified() {
        let err = StartupError::MissingDirectory {
            kind: "pages",
            path: PathBuf::from("/srv/blog/pages"),
        };
        let msg = err.to_string();
        assert!(msg.contains("'pages/'"), "{msg}");
        assert!(msg.contains("/srv/blog/pages"), "{msg}");
    }

    #[test]
    fn test_unpack_error_lists_every_failure() {
        let err = UnpackError {
            failures: vec![
                UnpackFailure {
                    tree: "templates".into(),
                    path: PathBuf::from("templates/base.tmpl"),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                },
                UnpackFailure {
                    tree: "static".into(),
                    path: PathBuf::from("static/css"),
                    source: io::Error::other("disk full"),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to unpack 2 asset tree(s)"));
        assert!(msg.contains("[templates] templates/base.tmpl: denied"));
        assert!(msg.contains("[static] static/css: disk full"));

        let ctx = user_friendly_error(anyhow::Error::new(err).context("Failed to unpack"));
        assert!(ctx.suggestion.unwrap().contains("permissions"));
    }

    #[test]
    fn test_user_friendly_error_suggests_unpack_for_missing_root() {
        let err = anyhow::Error::new(StartupError::MissingDirectory {
            kind: "templates",
            path: PathBuf::from("/nowhere/templates"),
        })
        .context("Failed to load templates");
        let ctx = user_friendly_error(err);
        assert!(ctx.suggestion.unwrap().contains("unpack"));
    }

    #[test]
    fn test_user_friendly_error_without_known_cause_has_no_suggestion() {
        let ctx = user_friendly_error(anyhow::anyhow!("something else"));
        assert!(ctx.suggestion.is_none());
        assert_eq!(ctx.to_string(), "something else");
    }

    #[test]
    fn test_render_error_key() {
        let err = RenderError::NilData {
            key: "articles.tmpl".into(),
        };
        assert_eq!(err.key(), "articles.tmpl");
    }
}
