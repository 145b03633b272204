//! First-run materialization of bundled assets.
//!
//! Every entry of a source tree is created under the destination root unless
//! something already exists at that path. Existing files are never
//! overwritten, whatever their content, so unpacking is safe on every boot
//! and operators can customize the unpacked copies.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use super::{AssetKind, AssetSource, bundled_trees};
use crate::core::{UnpackError, UnpackFailure};

/// Counts of what an unpack run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackReport {
    pub created_dirs: usize,
    pub created_files: usize,
    pub left_existing: usize,
}

impl UnpackReport {
    /// Number of filesystem writes performed.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.created_dirs + self.created_files
    }

    fn merge(&mut self, other: UnpackReport) {
        self.created_dirs += other.created_dirs;
        self.created_files += other.created_files;
        self.left_existing += other.left_existing;
    }
}

enum Outcome {
    CreatedDir,
    CreatedFile,
    LeftExisting,
}

/// Unpack the three bundled trees into `root/templates`, `root/pages` and
/// `root/static`.
pub fn unpack_templates(root: &Path) -> Result<UnpackReport, UnpackError> {
    let trees = bundled_trees();
    let sources: Vec<(&str, &dyn AssetSource)> =
        trees.iter().map(|(name, dir)| (*name, *dir as &dyn AssetSource)).collect();
    unpack_trees(&sources, root)
}

/// Unpack each named tree into `root/<name>`.
///
/// A failure stops only the tree it happened in; failures of all trees are
/// returned together.
pub fn unpack_trees(
    trees: &[(&str, &dyn AssetSource)],
    root: &Path,
) -> Result<UnpackReport, UnpackError> {
    let mut report = UnpackReport::default();
    let mut failures = Vec::new();

    for (name, source) in trees {
        match unpack_tree(name, *source, &root.join(name)) {
            Ok(tree_report) => report.merge(tree_report),
            Err(failure) => {
                tracing::error!("{}", failure);
                failures.push(failure);
            }
        }
    }

    if failures.is_empty() {
        Ok(report)
    } else {
        Err(UnpackError { failures })
    }
}

/// Copy one source tree onto `dest`, skipping paths that already exist.
pub fn unpack_tree(
    tree: &str,
    source: &dyn AssetSource,
    dest: &Path,
) -> Result<UnpackReport, UnpackFailure> {
    let fail = |path: &Path, source: io::Error| UnpackFailure {
        tree: tree.to_string(),
        path: path.to_path_buf(),
        source,
    };

    let mut report = UnpackReport::default();
    record(&mut report, materialize_dir(dest).map_err(|e| fail(dest, e))?);

    let entries = source.walk().map_err(|e| fail(dest, e))?;
    for entry in entries {
        let target = dest.join(&entry.path);
        let outcome = match entry.kind {
            AssetKind::Dir => materialize_dir(&target),
            AssetKind::File => materialize_file(source, &entry.path, &target),
        }
        .map_err(|e| fail(&target, e))?;
        record(&mut report, outcome);
    }

    Ok(report)
}

fn record(report: &mut UnpackReport, outcome: Outcome) {
    match outcome {
        Outcome::CreatedDir => report.created_dirs += 1,
        Outcome::CreatedFile => report.created_files += 1,
        Outcome::LeftExisting => report.left_existing += 1,
    }
}

/// `true` when nothing exists at `path`; other stat failures are errors.
fn is_vacant(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(_) => {
            tracing::info!("leaving existing   {}", path.display());
            Ok(false)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(e),
    }
}

fn materialize_dir(path: &Path) -> io::Result<Outcome> {
    if !is_vacant(path)? {
        return Ok(Outcome::LeftExisting);
    }

    tracing::info!("creating directory {}", path.display());
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(crate::constants::UNPACK_DIR_MODE);
    }
    builder.create(path)?;
    Ok(Outcome::CreatedDir)
}

fn materialize_file(source: &dyn AssetSource, relative: &Path, path: &Path) -> io::Result<Outcome> {
    if !is_vacant(path)? {
        return Ok(Outcome::LeftExisting);
    }

    let data = source.read(relative)?;
    tracing::info!("creating file      {}", path.display());

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(crate::constants::UNPACK_FILE_MODE);
    }
    let mut file = options.open(path)?;
    file.write_all(&data)?;
    Ok(Outcome::CreatedFile)
}
