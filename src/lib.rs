//! **mcplive** - Interactive searge-to-semantic renamer for MCP source trees
//!
//! Every accepted rename is appended to a mapping log, and every file is
//! backed up once, before its first edit, into a mirrored live directory.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Rename pipeline: grammar, locate, backup, review, flush
pub mod core {
    /// `scf|scm|ssf|ssm` command grammar
    pub mod command;
    pub use command::{ParseError, RenameCommand, RenameKind};

    /// Copy-on-first-touch backup tree
    pub mod backup;
    pub use backup::{BackupLocation, BackupOutcome, BackupStore};

    /// Literal occurrence search with ripgrep's searcher
    pub mod locate;
    pub use locate::OccurrenceLocator;

    /// Per-line interactive review, in memory
    pub mod review;
    pub use review::{LineMatcher, LineReview, MatchMode, ReviewOutcome};

    /// Append-only mapping log
    pub mod mapping_log;
    pub use mapping_log::{MappingLog, MappingLogEntry};

    /// Rename failure taxonomy
    pub mod error;
    pub use error::RenameError;

    /// Orchestrator: log, locate, backup, review, flush
    pub mod engine;
    pub use engine::{EngineOptions, RenameEngine, RenameReport};

    /// Operator command loop
    pub mod session;
}

/// Infrastructure - Configuration, console, I/O, and walking
pub mod infra {
    /// Layered configuration (file, env, CLI)
    pub mod config;
    pub use self::config::{Config, init as config_init, load_config};

    /// Prompt/output seam and terminal styling
    pub mod console;
    pub use console::{Console, Palette, TermConsole};

    /// Mmap-aware reads and atomic file replacement
    pub mod io;
    pub use io::{FileContent, read_file_smart, write_atomic};

    /// Source tree walking with ignore globs
    pub mod walk;
    pub use walk::FileWalker;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use crate::core::{RenameCommand, RenameEngine, RenameError, RenameKind};
pub use crate::infra::{Config, load_config};
