//! Which fragment files make up one compiled template.
//!
//! A unit always starts with its own primary file, followed by a fixed spine
//! of shared fragments that depends on the namespace. Site templates and
//! pages may then pull in optional fragment groups according to the
//! categories their page identifier belongs to; [`CATEGORY_TABLE`] is the
//! single place that maps identifiers to categories.
//!
//! Fragment names are paths relative to the `templates/` directory with the
//! `.tmpl` extension dropped, e.g. `include/footer`.

use std::path::{Path, PathBuf};

use crate::constants::{PRIMARY_FRAGMENT, SHELL_ENTRYPOINT, TEMPLATE_EXTENSION};
use crate::core::NamespaceKind;

/// Branding fragments shared by every unit.
pub const BRANDING: [&str; 6] = [
    "software-name",
    "software-url",
    "software-code-url",
    "software-community-url",
    "software-credit",
    "software-versioned",
];

/// Spine of units rendered through the shared document shell.
pub const SHELL_SPINE: [&str; 9] = [
    BRANDING[0],
    BRANDING[1],
    BRANDING[2],
    BRANDING[3],
    BRANDING[4],
    BRANDING[5],
    "include/footer",
    SHELL_ENTRYPOINT,
    "user/include/silenced",
];

/// Spine of self-contained per-user pages; no document shell.
pub const USER_SPINE: [&str; 10] = [
    BRANDING[0],
    BRANDING[1],
    BRANDING[2],
    BRANDING[3],
    BRANDING[4],
    BRANDING[5],
    "user/include/header",
    "user/include/footer",
    "user/include/silenced",
    "user/include/nav",
];

/// Optional fragment groups a page identifier can opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Lists the posts of a collection.
    PostListing,
    /// Federated collection views carrying the per-user navigation header.
    FederatedCollection,
    /// Renders individual post bodies.
    PostBody,
    /// Offers sign-in through OAuth providers.
    Authentication,
}

impl Category {
    /// Evaluation order; fragments are appended in this order.
    pub const ALL: [Category; 4] = [
        Category::PostListing,
        Category::FederatedCollection,
        Category::PostBody,
        Category::Authentication,
    ];

    /// Fragment names this category appends, in order.
    #[must_use]
    pub const fn fragments(self) -> &'static [&'static str] {
        match self {
            Category::PostListing => &["include/posts"],
            Category::FederatedCollection => &["user/include/header"],
            Category::PostBody => &["include/post-render"],
            Category::Authentication => &["include/oauth"],
        }
    }

    /// Namespace whose units honor this category.
    #[must_use]
    pub const fn namespace(self) -> NamespaceKind {
        match self {
            Category::PostListing | Category::FederatedCollection | Category::PostBody => {
                NamespaceKind::Templates
            }
            Category::Authentication => NamespaceKind::Pages,
        }
    }
}

use Category::{Authentication, FederatedCollection, PostBody, PostListing};

/// Page identifiers and the categories they belong to.
pub const CATEGORY_TABLE: &[(&str, &[Category])] = &[
    ("collection", &[PostListing, PostBody]),
    ("collection-tags", &[PostListing, PostBody]),
    ("chorus-collection", &[PostListing, FederatedCollection, PostBody]),
    ("chorus-collection-post", &[FederatedCollection, PostBody]),
    ("collection-post", &[PostBody]),
    ("post", &[PostBody]),
    ("read", &[PostListing]),
    ("login", &[Authentication]),
    ("landing", &[Authentication]),
    ("signup", &[Authentication]),
];

/// Categories of a page identifier; empty when it has none.
#[must_use]
pub fn categories(identifier: &str) -> &'static [Category] {
    CATEGORY_TABLE
        .iter()
        .find(|(id, _)| *id == identifier)
        .map(|(_, categories)| *categories)
        .unwrap_or(&[])
}

/// Identifier part of a key: everything before the first `.`.
#[must_use]
pub fn page_identifier(key: &str) -> &str {
    key.split('.').next().unwrap_or(key)
}

/// One fragment: the name it is registered under and where it is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Name used in `{% include %}` tags.
    pub name: String,
    /// Source file on disk.
    pub path: PathBuf,
}

/// Ordered fragment list for one unit. The first entry is the primary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentPlan {
    pub kind: NamespaceKind,
    pub key: String,
    pub fragments: Vec<Fragment>,
}

impl FragmentPlan {
    /// Assemble the fragment list for `key`, whose own source is `primary`.
    ///
    /// When `primary` is itself one of the shared fragments (the shell
    /// `base.tmpl` walked as a site template, say) it keeps that shared name
    /// and is not added a second time. Such a unit has no `page` fragment,
    /// so the shell's `{% include "page" %}` fails at render time instead of
    /// including the shell again.
    #[must_use]
    pub fn build(kind: NamespaceKind, key: &str, primary: &Path, templates_dir: &Path) -> Self {
        let spine: &[&str] = match kind {
            NamespaceKind::Templates | NamespaceKind::Pages => &SHELL_SPINE,
            NamespaceKind::UserPages => &USER_SPINE,
        };
        let optional = Category::ALL
            .into_iter()
            .filter(|category| category.namespace() == kind)
            .filter(|category| categories(page_identifier(key)).contains(category))
            .flat_map(|category| category.fragments().iter().copied());
        let shared: Vec<Fragment> = spine
            .iter()
            .copied()
            .chain(optional)
            .map(|name| shared_fragment(templates_dir, name))
            .collect();

        let root = shared
            .iter()
            .find(|fragment| fragment.path == primary)
            .map_or(PRIMARY_FRAGMENT, |fragment| fragment.name.as_str())
            .to_string();

        let mut fragments = Vec::with_capacity(shared.len() + 1);
        fragments.push(Fragment {
            name: root,
            path: primary.to_path_buf(),
        });
        fragments.extend(shared.into_iter().filter(|fragment| fragment.path != primary));

        Self {
            kind,
            key: key.to_string(),
            fragments,
        }
    }

    /// Name the primary file is registered under: `page`, or its shared
    /// fragment name when the unit is built from a shared fragment.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.primary().name
    }

    /// Fragment names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(|f| f.name.as_str())
    }

    /// How many times `name` appears in the plan.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.names().filter(|n| *n == name).count()
    }

    /// Whether `name` appears in the plan at all.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    /// The unit's own source file.
    #[must_use]
    pub fn primary(&self) -> &Fragment {
        &self.fragments[0]
    }
}

/// A shared fragment named relative to `templates_dir`.
fn shared_fragment(templates_dir: &Path, name: &str) -> Fragment {
    let mut path = templates_dir.to_path_buf();
    path.extend(name.split('/'));
    path.set_extension(TEMPLATE_EXTENSION);
    Fragment {
        name: name.to_string(),
        path,
    }
}
