//! Rename engine: log → locate → (backup → review → flush) per file.
//!
//! Files are handled strictly in locator order, lines strictly top to bottom.
//! A file is only written after its whole review finished, and only after
//! its backup exists. A failure aborts the rest of the command; files already
//! flushed for it stay edited.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::core::backup::{BackupOutcome, BackupStore};
use crate::core::command::RenameCommand;
use crate::core::error::RenameError;
use crate::core::locate::OccurrenceLocator;
use crate::core::mapping_log::MappingLog;
use crate::core::review::{LineMatcher, LineReview, MatchMode};
use crate::infra::config::Config;
use crate::infra::console::{Console, Palette};
use crate::infra::io::write_atomic;
use crate::infra::walk::FileWalker;

/// Behavior switches derived from config and global flags.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub match_mode: MatchMode,
    pub quiet: bool,
    pub dry_run: bool,
    pub palette: Palette,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::Substring,
            quiet: false,
            dry_run: false,
            palette: Palette::plain(),
        }
    }
}

/// What one command did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    /// Files that contained the searge name, in review order
    pub files: Vec<PathBuf>,
    pub matched_lines: usize,
    pub replaced_lines: usize,
    /// Files whose content changed on disk
    pub rewritten: Vec<PathBuf>,
    pub backups_created: usize,
}

pub struct RenameEngine {
    source_root: PathBuf,
    locator: OccurrenceLocator,
    backups: BackupStore,
    log: MappingLog,
    options: EngineOptions,
}

impl RenameEngine {
    /// Prepare the live dir and mapping log, then check the source tree.
    pub fn open(config: &Config, options: EngineOptions) -> Result<Self, RenameError> {
        fs::create_dir_all(&config.live_dir).map_err(|e| RenameError::Setup {
            path: config.live_dir.clone(),
            cause: e.into(),
        })?;

        let log_path = config.log_path();
        let log = MappingLog::open(&log_path).map_err(|cause| RenameError::Setup {
            path: log_path.clone(),
            cause,
        })?;

        if !config.source_dir.is_dir() {
            return Err(RenameError::MissingSourceRoot(config.source_dir.clone()));
        }

        let setup_err = |cause| RenameError::Setup {
            path: config.source_dir.clone(),
            cause,
        };
        let mut walker = FileWalker::new(&config.ignore_patterns)
            .map_err(setup_err)?
            .with_include_hidden(config.include_hidden)
            .with_git_ignore(config.respect_gitignore);

        // Never search our own backups when the live dir sits inside the tree
        if let Some(rel) = nested_dir(&config.source_dir, &config.live_dir) {
            debug!(dir = %rel.display(), "excluding live dir from search");
            walker = walker.with_excluded_dir(rel);
        }

        Ok(Self {
            source_root: config.source_dir.clone(),
            locator: OccurrenceLocator::new(walker, options.match_mode),
            backups: BackupStore::new(config.backup_root()),
            log,
            options,
        })
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn log(&self) -> &MappingLog {
        &self.log
    }

    pub fn backups(&self) -> &BackupStore {
        &self.backups
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Apply an accepted command. The log entry is written before any file
    /// is touched, regardless of how the per-line decisions go.
    #[instrument(skip(self, console), fields(cmd = %command))]
    pub fn process<C: Console + ?Sized>(
        &mut self,
        command: &RenameCommand,
        console: &mut C,
    ) -> Result<RenameReport, RenameError> {
        if self.options.dry_run {
            return self.preview(command, console);
        }

        self.log.append(command).map_err(|cause| RenameError::Log {
            path: self.log.path().to_path_buf(),
            cause,
        })?;

        let needle = &command.searge_name;
        let search_err = |cause| RenameError::Search {
            needle: needle.clone(),
            cause,
        };
        let matcher = LineMatcher::new(needle, self.options.match_mode).map_err(search_err)?;
        let files = self
            .locator
            .find_files(&self.source_root, needle)
            .map_err(search_err)?;

        let mut report = RenameReport::default();
        if files.is_empty() {
            self.say(console, format!("No occurrences of {needle} found."));
            return Ok(report);
        }

        let review = LineReview::new(&matcher, &command.semantic_name)
            .with_palette(self.options.palette)
            .with_quiet(self.options.quiet);

        for file in files {
            let rel = relative_to(&self.source_root, &file);
            let backup = self
                .backups
                .ensure_backup(&file, rel)
                .map_err(|cause| RenameError::Backup {
                    path: file.clone(),
                    cause,
                })?;
            if backup.outcome == BackupOutcome::Created {
                report.backups_created += 1;
            }
            debug!(file = %file.display(), backup = %backup.path.display(), outcome = ?backup.outcome, "backup ready");

            let outcome = review.run(&file, console).map_err(|cause| {
                warn!(file = %file.display(), "review aborted");
                RenameError::Review {
                    path: file.clone(),
                    cause,
                }
            })?;

            report.matched_lines += outcome.matched;
            report.replaced_lines += outcome.replaced;

            // Declined everything: bytes would be identical, leave the file alone
            if outcome.changed() {
                write_atomic(&file, &outcome.content).map_err(|cause| RenameError::Flush {
                    path: file.clone(),
                    cause,
                })?;
                info!(file = %file.display(), replaced = outcome.replaced, "file rewritten");
                report.rewritten.push(file.clone());
            }
            report.files.push(file);
        }

        self.say(
            console,
            format!(
                "Replaced {} of {} matching lines in {} files ({} rewritten).",
                report.replaced_lines,
                report.matched_lines,
                report.files.len(),
                report.rewritten.len()
            ),
        );
        Ok(report)
    }

    /// Dry run: list matching lines, no log entry, no backups, no prompts.
    fn preview<C: Console + ?Sized>(
        &self,
        command: &RenameCommand,
        console: &mut C,
    ) -> Result<RenameReport, RenameError> {
        let needle = &command.searge_name;
        let search_err = |cause| RenameError::Search {
            needle: needle.clone(),
            cause,
        };
        let matcher = LineMatcher::new(needle, self.options.match_mode).map_err(search_err)?;
        let files = self
            .locator
            .find_files(&self.source_root, needle)
            .map_err(search_err)?;

        let review = LineReview::new(&matcher, &command.semantic_name);
        let mut report = RenameReport::default();
        for file in files {
            let hits = review.preview(&file).map_err(|cause| RenameError::Review {
                path: file.clone(),
                cause,
            })?;
            for hit in &hits {
                console
                    .say(&format!(
                        "{}:{}: {}",
                        self.options.palette.heading(file.display()),
                        hit.number,
                        hit.text
                    ))
                    .map_err(|e| RenameError::Review {
                        path: file.clone(),
                        cause: e.into(),
                    })?;
            }
            report.matched_lines += hits.len();
            report.files.push(file);
        }

        let summary = self.options.palette.warn(format!(
            "DRY RUN: {} matching lines in {} files; nothing logged or changed.",
            report.matched_lines,
            report.files.len()
        ));
        emit(console, &summary);
        Ok(report)
    }

    /// Status line, suppressed by --quiet.
    fn say<C: Console + ?Sized>(&self, console: &mut C, text: String) {
        if !self.options.quiet {
            emit(console, &text);
        }
    }
}

/// Report lines come after the work is done; a broken console only gets traced.
fn emit<C: Console + ?Sized>(console: &mut C, text: &str) {
    if let Err(e) = console.say(text) {
        warn!(error = %e, "console write failed");
    }
}

fn relative_to<'a>(root: &Path, file: &'a Path) -> &'a Path {
    file.strip_prefix(root).unwrap_or(file)
}

/// `live` relative to `source` when it lies strictly inside it.
fn nested_dir(source: &Path, live: &Path) -> Option<PathBuf> {
    let source = fs::canonicalize(source).ok()?;
    let live = fs::canonicalize(live).ok()?;
    let rel = live.strip_prefix(&source).ok()?;
    (!rel.as_os_str().is_empty()).then(|| rel.to_path_buf())
}
