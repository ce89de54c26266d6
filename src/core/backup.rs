//! Copy-on-first-touch backup tree.
//!
//! Mirrors source-relative paths under a backup root. A path is owned by the
//! store once a copy exists for it, whether made now or by an earlier run;
//! an owned path is never copied again, so the backup always holds the
//! content from before the first mutation attempt.

use anyhow::{Context, Result, bail};
use tracing::warn;
use std::{
    collections::HashSet,
    fs::{self, File},
    io,
    path::{Component, Path, PathBuf},
};

/// Whether `ensure_backup` made a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOutcome {
    Created,
    Existing,
}

/// Where a file's backup lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupLocation {
    pub path: PathBuf,
    pub outcome: BackupOutcome,
}

#[derive(Debug)]
pub struct BackupStore {
    root: PathBuf,
    owned: HashSet<PathBuf>, // source-relative paths known to be backed up
}

impl BackupStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            owned: HashSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Mirrored location for a source-relative path.
    pub fn location_for(&self, rel_path: &Path) -> Result<PathBuf> {
        Ok(self.root.join(validate_rel(rel_path)?))
    }

    /// Has `rel_path` ever been backed up under this root (this run or prior)?
    pub fn owns(&mut self, rel_path: &Path) -> Result<bool> {
        let rel = validate_rel(rel_path)?;
        if self.owned.contains(&rel) {
            return Ok(true);
        }

        let backup_path = self.root.join(&rel);
        match fs::symlink_metadata(&backup_path) {
            Ok(meta) if meta.is_file() => {
                self.owned.insert(rel);
                Ok(true)
            }
            Ok(_) => bail!("backup path is not a regular file: {}", backup_path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("stat backup: {}", backup_path.display()))),
        }
    }

    /// Copy `source` to its mirrored location unless a backup already exists.
    pub fn ensure_backup(&mut self, source: &Path, rel_path: &Path) -> Result<BackupLocation> {
        let rel = validate_rel(rel_path)?;
        let backup_path = self.root.join(&rel);

        if self.owns(&rel)? {
            return Ok(BackupLocation {
                path: backup_path,
                outcome: BackupOutcome::Existing,
            });
        }

        let parent = backup_path
            .parent()
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("create backup parent: {}", parent.display()))?;

        // Stage next to the destination, then publish without clobbering;
        // an interrupted copy never looks like a finished backup.
        let mut src = File::open(source)
            .with_context(|| format!("open source: {}", source.display()))?;
        let mut staged = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("create backup temp in {}", parent.display()))?;
        io::copy(&mut src, staged.as_file_mut())
            .with_context(|| format!("copy {} to backup", source.display()))?;
        if let Err(e) = staged.as_file().sync_all() {
            warn!(error = %e, backup = %backup_path.display(), "fsync of staged backup failed");
        }

        staged
            .persist_noclobber(&backup_path)
            .map_err(|e| e.error)
            .with_context(|| format!("publish backup: {}", backup_path.display()))?;

        self.owned.insert(rel);
        Ok(BackupLocation {
            path: backup_path,
            outcome: BackupOutcome::Created,
        })
    }
}

/// Validate that the given path is relative and non-escaping.
fn validate_rel(p: &Path) -> Result<PathBuf> {
    if p.is_absolute() {
        bail!("path must be relative to the source root: {}", p.display());
    }
    let mut out = PathBuf::new();
    for c in p.components() {
        match c {
            Component::ParentDir => bail!("path escapes source root: {}", p.display()),
            Component::CurDir => {}
            Component::Prefix(_) | Component::RootDir => {
                bail!("path must be relative to the source root: {}", p.display())
            }
            _ => out.push(c.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        bail!("empty path");
    }
    Ok(out)
}
