//! Builder for on-disk template trees used by tests.
//!
//! [`TemplateTreeBuilder::minimal`] writes every shared fragment the loader
//! requires plus a handful of site templates, pages and user pages. Tests
//! then override or drop individual files to exercise one behavior.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::Config;
use crate::constants::{PAGES_DIR, TEMPLATES_DIR};

/// Shared fragments, relative to `templates/`.
pub const SHARED_FRAGMENTS: &[(&str, &str)] = &[
    (
        "base.tmpl",
        "<html><head><title>{{ title }} | {% include \"software-name\" %}</title></head>\
         <body>{% include \"user/include/silenced\" %}{% include \"page\" %}\
         {% include \"include/footer\" %}</body></html>",
    ),
    ("software-name.tmpl", "WriteFreely"),
    ("software-url.tmpl", "https://writefreely.org"),
    ("software-code-url.tmpl", "https://github.com/writefreely/writefreely"),
    ("software-community-url.tmpl", "https://discuss.write.as"),
    (
        "software-credit.tmpl",
        "powered by <a href=\"{% include \"software-url\" %}\">{% include \"software-name\" %}</a>",
    ),
    (
        "software-versioned.tmpl",
        "{% include \"software-name\" %}{% if version %} {{ version }}{% endif %}",
    ),
    ("include/footer.tmpl", "<footer>{% include \"software-credit\" %}</footer>"),
    (
        "include/posts.tmpl",
        "<ul>{% for post in posts %}<li>{{ post.title }}</li>{% endfor %}</ul>",
    ),
    ("include/post-render.tmpl", "<article>{{ post.body }}</article>"),
    ("include/oauth.tmpl", "<a class=\"oauth\" href=\"/oauth\">Sign in with a provider</a>"),
    (
        "user/include/silenced.tmpl",
        "{% if silenced %}<p class=\"silenced\">Your account is silenced.</p>{% endif %}",
    ),
    ("user/include/header.tmpl", "<header>{{ username }}</header>"),
    ("user/include/footer.tmpl", "<footer>{% include \"software-versioned\" %}</footer>"),
    ("user/include/nav.tmpl", "<nav><a href=\"/me\">{{ username }}</a></nav>"),
];

/// Site templates, relative to `templates/`.
pub const SITE_TEMPLATES: &[(&str, &str)] = &[
    (
        "collection.tmpl",
        "<h1>{{ collection.title }}</h1>{% include \"include/posts\" %}",
    ),
    ("post.tmpl", "{% include \"include/post-render\" %}"),
    ("read.tmpl", "<h1>Reader</h1>{% include \"include/posts\" %}"),
];

/// Standalone pages, relative to `pages/`.
pub const PAGES: &[(&str, &str)] = &[
    ("about.tmpl", "<h1>{{ title }}</h1>"),
    ("login.tmpl", "<form>{% include \"include/oauth\" %}</form>"),
];

/// Per-user pages, relative to `templates/`.
pub const USER_PAGES: &[(&str, &str)] = &[(
    "user/articles.tmpl",
    "{% include \"user/include/header\" %}{% include \"user/include/nav\" %}\
     <h1>{{ title }}</h1>{% include \"user/include/footer\" %}",
)];

/// Fluent builder writing a template tree into a temporary directory.
#[derive(Debug, Default)]
pub struct TemplateTreeBuilder {
    templates: BTreeMap<String, String>,
    pages: BTreeMap<String, String>,
}

impl TemplateTreeBuilder {
    /// An empty tree: no `templates/` or `pages/` directory at all.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every shared fragment plus a few units in each namespace.
    #[must_use]
    pub fn minimal() -> Self {
        let mut builder = Self::new();
        for (path, content) in SHARED_FRAGMENTS.iter().chain(SITE_TEMPLATES).chain(USER_PAGES) {
            builder = builder.file(path, content);
        }
        for (path, content) in PAGES {
            builder = builder.page(path, content);
        }
        builder
    }

    /// Add or replace a file under `templates/`.
    #[must_use]
    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.templates.insert(path.to_string(), content.to_string());
        self
    }

    /// Add or replace a file under `pages/`.
    #[must_use]
    pub fn page(mut self, path: &str, content: &str) -> Self {
        self.pages.insert(path.to_string(), content.to_string());
        self
    }

    /// Drop a file under `templates/`.
    #[must_use]
    pub fn without(mut self, path: &str) -> Self {
        self.templates.remove(path);
        self
    }

    /// Drop a file under `pages/`.
    #[must_use]
    pub fn without_page(mut self, path: &str) -> Self {
        self.pages.remove(path);
        self
    }

    /// Write the tree. Panics on I/O failure; meant for tests only.
    #[must_use]
    pub fn build(self) -> TemplateTree {
        let dir = TempDir::new().expect("create temp dir");
        write_all(&dir.path().join(TEMPLATES_DIR), &self.templates);
        write_all(&dir.path().join(PAGES_DIR), &self.pages);
        TemplateTree { dir }
    }
}

fn write_all(root: &Path, files: &BTreeMap<String, String>) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture directory");
        }
        fs::write(&path, content).expect("write fixture file");
    }
}

/// A written template tree; removed when dropped.
#[derive(Debug)]
pub struct TemplateTree {
    dir: TempDir,
}

impl TemplateTree {
    /// Root holding `templates/` and `pages/`.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.dir.path().join(TEMPLATES_DIR)
    }

    #[must_use]
    pub fn pages_dir(&self) -> PathBuf {
        self.dir.path().join(PAGES_DIR)
    }

    /// Configuration pointing both parents at the tree root.
    #[must_use]
    pub fn config(&self) -> Config {
        Config::with_root(self.dir.path())
    }
}
