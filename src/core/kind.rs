//! The three independent template namespaces.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one of the three namespaces of compiled templates.
///
/// Keys are unique within a namespace only; the same key may appear in
/// several namespaces without conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamespaceKind {
    /// Flat site templates from `templates/`, keyed by base name.
    Templates,
    /// Standalone pages from the nested `pages/` tree, keyed by file name.
    Pages,
    /// Per-user pages from `templates/user/`.
    UserPages,
}

impl NamespaceKind {
    /// All namespaces, in initialization order.
    pub const ALL: [NamespaceKind; 3] =
        [NamespaceKind::Templates, NamespaceKind::Pages, NamespaceKind::UserPages];

    /// Short name used in logs and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NamespaceKind::Templates => "templates",
            NamespaceKind::Pages => "pages",
            NamespaceKind::UserPages => "user",
        }
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamespaceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "templates" | "template" => Ok(NamespaceKind::Templates),
            "pages" | "page" => Ok(NamespaceKind::Pages),
            "user" | "user-pages" => Ok(NamespaceKind::UserPages),
            other => Err(format!(
                "unknown namespace '{other}' (expected one of: templates, pages, user)"
            )),
        }
    }
}
