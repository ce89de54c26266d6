//! Append-only mapping log: one accepted rename per line, in acceptance order.

use anyhow::{Context, Result};
use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};
use tabled::{Table, Tabled};
use tracing::warn;

use crate::cli::{AppContext, LogArgs, PathArgs};
use crate::core::command::RenameCommand;
use crate::infra::config;

/// One line of the log; `command` is `None` for lines that no longer parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingLogEntry {
    pub line_no: usize,
    pub raw: String,
    pub command: Option<RenameCommand>,
}

#[derive(Debug, Clone)]
pub struct MappingLog {
    path: PathBuf,
}

impl MappingLog {
    /// Open the log, creating it empty if absent. Never truncates.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open mapping log: {}", path.display()))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `<kind> <searge> <semantic>[ <description>]` as a new line.
    pub fn append(&self, command: &RenameCommand) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&self.path)
            .with_context(|| format!("open mapping log: {}", self.path.display()))?;

        // A hand-edited log may lack its final newline; don't glue entries together
        let mut line = String::new();
        if !ends_with_newline(&mut f)? {
            line.push('\n');
        }
        line.push_str(&command.to_string());
        line.push('\n');

        f.write_all(line.as_bytes())
            .with_context(|| format!("append to mapping log: {}", self.path.display()))?;
        if let Err(e) = f.sync_all() {
            warn!(error = %e, log = %self.path.display(), "fsync of mapping log failed");
        }
        Ok(())
    }

    /// All non-blank lines, oldest first.
    pub fn entries(&self) -> Result<Vec<MappingLogEntry>> {
        let file = File::open(&self.path)
            .with_context(|| format!("open mapping log: {}", self.path.display()))?;

        let mut out = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("read mapping log line {}", i + 1))?;
            if line.trim().is_empty() {
                continue;
            }
            out.push(MappingLogEntry {
                line_no: i + 1,
                command: RenameCommand::parse(&line).ok(),
                raw: line,
            });
        }
        Ok(out)
    }
}

fn ends_with_newline(f: &mut File) -> Result<bool> {
    let len = f.metadata().context("stat mapping log")?.len();
    if len == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    f.seek(SeekFrom::End(-1)).context("seek mapping log")?;
    f.read_exact(&mut last).context("read mapping log tail")?;
    Ok(last[0] == b'\n')
}

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "#")]
    line: usize,
    #[tabled(rename = "Command")]
    kind: String,
    #[tabled(rename = "Searge name")]
    searge: String,
    #[tabled(rename = "Semantic name")]
    semantic: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&MappingLogEntry> for LogRow {
    fn from(entry: &MappingLogEntry) -> Self {
        match &entry.command {
            Some(cmd) => LogRow {
                line: entry.line_no,
                kind: cmd.kind.expanded().to_string(),
                searge: cmd.searge_name.clone(),
                semantic: cmd.semantic_name.clone(),
                description: cmd.description.clone().unwrap_or_default(),
            },
            None => LogRow {
                line: entry.line_no,
                kind: "?".to_string(),
                searge: String::new(),
                semantic: String::new(),
                description: entry.raw.clone(),
            },
        }
    }
}

/// `mcplive log`: print the mapping log.
pub fn run(args: LogArgs, paths: &PathArgs, ctx: &AppContext) -> Result<()> {
    let config = config::resolve(paths)?;
    let log_path = config.log_path();
    if !log_path.exists() {
        if !ctx.quiet {
            println!("No mapping log at {}", log_path.display());
        }
        return Ok(());
    }

    let log = MappingLog::open(&log_path)?;
    let mut entries = log.entries()?;
    if let Some(n) = args.tail {
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
    }

    if args.raw {
        for e in &entries {
            println!("{}", e.raw);
        }
    } else if entries.is_empty() {
        if !ctx.quiet {
            println!("Mapping log {} is empty", log_path.display());
        }
    } else {
        let rows: Vec<LogRow> = entries.iter().map(LogRow::from).collect();
        println!("{}", Table::new(rows));
    }
    Ok(())
}
