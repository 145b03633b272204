//! Bundled asset trees and the read-only source abstraction over them.
//!
//! The default `templates/`, `pages/` and `static/` trees are compiled into
//! the binary with `include_dir`. The [`AssetSource`] trait hides whether a
//! tree is embedded or read from disk so the materializer in [`unpack`] can
//! copy either onto a writable location.

pub mod unpack;

use include_dir::{Dir, DirEntry, include_dir};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::{PAGES_DIR, STATIC_DIR, TEMPLATES_DIR};

pub use unpack::{UnpackReport, unpack_templates, unpack_tree, unpack_trees};

/// Bundled site templates and shared fragments.
pub static TEMPLATES: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets/templates");

/// Bundled standalone pages.
pub static PAGES: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets/pages");

/// Bundled static files (stylesheets, scripts, images).
pub static STATIC: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets/static");

/// The three bundled trees, named by the directory they unpack into.
#[must_use]
pub fn bundled_trees() -> [(&'static str, &'static Dir<'static>); 3] {
    [(TEMPLATES_DIR, &TEMPLATES), (PAGES_DIR, &PAGES), (STATIC_DIR, &STATIC)]
}

/// Whether an entry is a directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Dir,
    File,
}

/// One entry of an asset tree, relative to the tree root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub path: PathBuf,
    pub kind: AssetKind,
}

impl AssetEntry {
    /// A directory entry.
    #[must_use]
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: AssetKind::Dir,
        }
    }

    /// A file entry.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: AssetKind::File,
        }
    }
}

/// A read-only tree of named byte blobs.
pub trait AssetSource {
    /// Every entry below the root, depth-first with each directory listed
    /// before its children and siblings in lexical order.
    fn walk(&self) -> io::Result<Vec<AssetEntry>>;

    /// Contents of the file at `path` (relative to the root).
    fn read(&self, path: &Path) -> io::Result<Cow<'_, [u8]>>;
}

impl AssetSource for Dir<'_> {
    fn walk(&self) -> io::Result<Vec<AssetEntry>> {
        let mut entries = Vec::new();
        collect_embedded(self, &mut entries);
        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<Cow<'_, [u8]>> {
        self.get_file(path).map(|file| Cow::Borrowed(file.contents())).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not in the embedded bundle", path.display()),
            )
        })
    }
}

fn collect_embedded(dir: &Dir<'_>, out: &mut Vec<AssetEntry>) {
    let mut children: Vec<&DirEntry<'_>> = dir.entries().iter().collect();
    children.sort_by(|a, b| a.path().cmp(b.path()));

    for child in children {
        match child {
            DirEntry::Dir(sub) => {
                out.push(AssetEntry::dir(sub.path()));
                collect_embedded(sub, out);
            }
            DirEntry::File(file) => out.push(AssetEntry::file(file.path())),
        }
    }
}

/// An asset tree read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// A source rooted at `root`; nothing is read until it is walked.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirSource {
    fn walk(&self) -> io::Result<Vec<AssetEntry>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(io::Error::other)?
                .to_path_buf();
            if entry.file_type().is_dir() {
                entries.push(AssetEntry::dir(relative));
            } else {
                entries.push(AssetEntry::file(relative));
            }
        }
        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<Cow<'_, [u8]>> {
        fs::read(self.root.join(path)).map(Cow::Owned)
    }
}
