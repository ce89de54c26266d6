//! Filepath: src/infra/walk.rs
//! File walker over the source tree.
//! - Extra ignore globs (early prune + late filter)
//! - Optional .gitignore handling (off by default: every file is a candidate)
//! - Hidden file policy
//! - Excluded directories (root-relative), e.g. a live dir nested in the tree
//! - Deterministic ordering for stable prompts and tests
//!
//! Backed by ripgrep's `ignore` crate and `globset`. Unlike a lenient walk,
//! traversal errors are returned: a rename must not run against a partial
//! view of the tree.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};

/// Walker with optional extra ignore globs and filters.
pub struct FileWalker
{
    /// Compiled set of additional ignore patterns
    ignore_patterns: GlobSet,

    /// Include hidden (dot) files; default true
    include_hidden: bool,

    /// Respect .ignore/.gitignore/.git/info/exclude; default false
    git_ignore: bool,

    /// Root-relative directories never descended into
    excluded_dirs: Vec<PathBuf>,
}

impl FileWalker
{
    /// Build a walker with additional ignore patterns (e.g., "**/*.class",
    /// "build/**"). Patterns match on root-relative paths.
    pub fn new(additional_ignores: &[String]) -> Result<Self>
    {
        let mut builder = GlobSetBuilder::new();

        for pattern in additional_ignores
        {
            builder.add(
                Glob::new(pattern).with_context(|| format!("invalid ignore glob: {pattern}"))?,
            );
        }

        Ok(Self {
            ignore_patterns: builder.build()?,
            include_hidden: true,
            git_ignore: false,
            excluded_dirs: Vec::new(),
        })
    }

    /// (Optional) Include or exclude hidden files (dotfiles).
    pub fn with_include_hidden(
        mut self,
        include_hidden: bool,
    ) -> Self
    {
        self.include_hidden = include_hidden;
        self
    }

    /// (Optional) Honor ignore files found in the tree.
    pub fn with_git_ignore(
        mut self,
        yes: bool,
    ) -> Self
    {
        self.git_ignore = yes;
        self
    }

    /// (Optional) Skip a directory given relative to the walk root.
    pub fn with_excluded_dir(
        mut self,
        rel: impl Into<PathBuf>,
    ) -> Self
    {
        self.excluded_dirs
            .push(rel.into());
        self
    }

    /// Internal: construct a configured WalkBuilder for `root`.
    fn build_walk(
        &self,
        root: &Path,
    ) -> WalkBuilder
    {
        let mut b = WalkBuilder::new(root);

        // WalkBuilder::hidden(true) => *skip* dotfiles
        b.hidden(!self.include_hidden);

        b.ignore(self.git_ignore);
        b.git_ignore(self.git_ignore);
        b.git_global(self.git_ignore);
        b.git_exclude(self.git_ignore);
        b.parents(self.git_ignore);
        b.require_git(false);
        b.follow_links(false);

        // Early directory pruning: extra globs and excluded dirs
        let extra = self
            .ignore_patterns
            .clone();
        let excluded = self
            .excluded_dirs
            .clone();
        let root_owned = root.to_path_buf();
        b.filter_entry(move |ent: &DirEntry| {
            let is_dir = ent
                .file_type()
                .map(|ft| ft.is_dir())
                .unwrap_or(false);
            if !is_dir
            {
                return true;
            }

            let rel = ent
                .path()
                .strip_prefix(&root_owned)
                .unwrap_or(ent.path());
            !(extra.is_match(rel) || excluded.iter().any(|d| rel == d.as_path()))
        });

        b
    }

    /// Traverse regular files under `root`.
    /// Returns a **sorted** list of paths (each `root`-prefixed).
    pub fn walk_files<P: AsRef<Path>>(
        &self,
        root: P,
    ) -> Result<Vec<PathBuf>>
    {
        let root_path = root.as_ref();
        if !root_path.is_dir()
        {
            anyhow::bail!("not a directory: {}", root_path.display());
        }

        let mut out = Vec::new();
        for res in self
            .build_walk(root_path)
            .build()
        {
            let entry = res.with_context(|| format!("walk {}", root_path.display()))?;

            if !entry
                .file_type()
                .is_some_and(|ft| ft.is_file())
            {
                continue;
            }

            let path = entry.into_path();
            let rel = path
                .strip_prefix(root_path)
                .unwrap_or(&path);
            if self
                .ignore_patterns
                .is_match(rel)
            {
                continue;
            }
            out.push(path);
        }

        // Deterministic order (stable prompts & tests)
        out.sort();

        Ok(out)
    }
}
