//! Occurrence locator: which files under a root contain a literal name.
//!
//! Literal, case-sensitive search with ripgrep's searcher over raw bytes: no
//! BOM transcoding and no binary detection, so a file is located exactly when
//! line review will find the name in it. Files are scanned in parallel, but
//! the result keeps the walker's sorted order, so the review sequence is
//! deterministic.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use grep_searcher::{BinaryDetection, Searcher, SearcherBuilder, Sink, SinkMatch};
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::core::review::MatchMode;
use crate::infra::walk::FileWalker;

/// Stops the search at the first matching line.
#[derive(Default)]
struct FirstMatch
{
    found: bool,
}

impl Sink for FirstMatch
{
    type Error = std::io::Error;

    fn matched(
        &mut self,
        _searcher: &Searcher,
        _mat: &SinkMatch<'_>,
    ) -> Result<bool, Self::Error>
    {
        self.found = true;
        Ok(false)
    }
}

pub struct OccurrenceLocator
{
    walker: FileWalker,
    mode: MatchMode,
}

impl OccurrenceLocator
{
    pub fn new(
        walker: FileWalker,
        mode: MatchMode,
    ) -> Self
    {
        Self { walker, mode }
    }

    fn matcher(
        &self,
        needle: &str,
    ) -> Result<RegexMatcher>
    {
        RegexMatcherBuilder::new()
            .case_insensitive(false)
            .word(self.mode == MatchMode::WholeWord)
            .build(&regex::escape(needle))
            .with_context(|| format!("build matcher for `{needle}`"))
    }

    /// Every regular file under `root` whose bytes contain `needle`, in sorted
    /// order. Empty result is not an error.
    #[instrument(level = "debug", skip(self))]
    pub fn find_files(
        &self,
        root: &Path,
        needle: &str,
    ) -> Result<Vec<PathBuf>>
    {
        if needle.is_empty()
        {
            anyhow::bail!("cannot search for an empty name");
        }

        let matcher = self.matcher(needle)?;
        let candidates = self
            .walker
            .walk_files(root)?;

        let hits: Vec<Option<PathBuf>> = candidates
            .into_par_iter()
            .map_init(
                || {
                    SearcherBuilder::new()
                        .binary_detection(BinaryDetection::none())
                        .bom_sniffing(false)
                        .encoding(None)
                        .line_number(false)
                        .build()
                },
                |searcher, path| -> Result<Option<PathBuf>> {
                    let mut sink = FirstMatch::default();
                    searcher
                        .search_path(&matcher, &path, &mut sink)
                        .with_context(|| format!("search {}", path.display()))?;
                    Ok(sink
                        .found
                        .then_some(path))
                },
            )
            .collect::<Result<_>>()?;

        let files: Vec<PathBuf> = hits
            .into_iter()
            .flatten()
            .collect();
        debug!(count = files.len(), "located files");

        Ok(files)
    }
}
