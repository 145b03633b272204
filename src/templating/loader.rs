//! Discovery of unit sources and derivation of their lookup keys.
//!
//! - Flat `templates/` directory: each visible, non-directory entry is one
//!   site template keyed by its name up to the first `.`.
//! - Nested `pages/` tree: every visible file at any depth is keyed by its
//!   file name alone, so equal names in different subdirectories collide.
//! - Nested `templates/user/` tree: files directly under the root are keyed
//!   by file name, deeper files by `<parent-dir>/<file-name>`.
//!
//! Entries are visited in lexical order. Hidden files (leading `.`) are
//! skipped.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::core::StartupError;

/// One discovered unit source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub key: String,
    pub path: PathBuf,
}

/// Key of a flat site template: its file name up to the first `.`.
#[must_use]
pub fn template_key(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Key of a user page from its path relative to the user root.
///
/// Returns `None` for an empty path.
#[must_use]
pub fn user_page_key(relative: &Path) -> Option<String> {
    let parts: Vec<&OsStr> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    match parts.as_slice() {
        [] => None,
        [file] => Some(file.to_string_lossy().into_owned()),
        [.., parent, file] => {
            Some(format!("{}/{}", parent.to_string_lossy(), file.to_string_lossy()))
        }
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn walk_error(path: &Path, source: io::Error) -> StartupError {
    StartupError::Walk {
        path: path.to_path_buf(),
        source,
    }
}

/// List the flat site templates directly inside `dir`.
pub fn discover_templates(dir: &Path) -> Result<Vec<SourceFile>, StartupError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| walk_error(dir, e))?
        .collect::<io::Result<Vec<_>>>()
        .map_err(|e| walk_error(dir, e))?;
    entries.sort_by_key(fs::DirEntry::file_name);

    let mut found = Vec::new();
    for entry in entries {
        let file_type = entry.file_type().map_err(|e| walk_error(&entry.path(), e))?;
        let name = entry.file_name();
        if file_type.is_dir() || is_hidden(&name) {
            continue;
        }
        found.push(SourceFile {
            key: template_key(&name.to_string_lossy()).to_string(),
            path: entry.path(),
        });
    }
    Ok(found)
}

/// List every visible file below `dir`, keyed by file name.
pub fn discover_pages(dir: &Path) -> Result<Vec<SourceFile>, StartupError> {
    walk_files(dir, |_, name| Some(name.to_string_lossy().into_owned()))
}

/// List every visible file below the user-pages root `dir`.
pub fn discover_user_pages(dir: &Path) -> Result<Vec<SourceFile>, StartupError> {
    walk_files(dir, |relative, _| user_page_key(relative))
}

fn walk_files(
    dir: &Path,
    key_for: impl Fn(&Path, &OsStr) -> Option<String>,
) -> Result<Vec<SourceFile>, StartupError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            walk_error(&path, io::Error::from(e))
        })?;
        if entry.file_type().is_dir() || is_hidden(entry.file_name()) {
            continue;
        }
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        if let Some(key) = key_for(relative, entry.file_name()) {
            found.push(SourceFile {
                key,
                path: entry.path().to_path_buf(),
            });
        }
    }
    Ok(found)
}
