//! Shared test utilities for integration tests
//!
//! Builds MCP-shaped fixtures (`src/` + `mcp-live/`) and scripted consoles
//! that feed operator answers from a string.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;

use assert_fs::prelude::*;
use mcplive::core::{EngineOptions, RenameEngine};
use mcplive::infra::{Config, TermConsole};

pub type Scripted = TermConsole<Cursor<Vec<u8>>, Vec<u8>>;

/// Create a temp project with the given `src/`-relative files.
pub fn mcp_fixture(files: &[(&str, &str)]) -> assert_fs::TempDir
{
    // Initialize the temporary project root
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    for (rel, body) in files
    {
        tmp.child(format!("src/{rel}"))
            .write_str(body)
            .expect("write source");
    }

    // Make sure the source root exists even with no files
    tmp.child("src")
        .create_dir_all()
        .expect("create src");

    tmp
}

/// Config rooted at a fixture produced by `mcp_fixture`.
pub fn config_for(root: &Path) -> Config
{
    Config {
        source_dir: root.join("src"),
        live_dir: root.join("mcp-live"),
        ..Config::default()
    }
}

/// Open an engine with default options against `config`.
pub fn engine(config: &Config) -> RenameEngine
{
    RenameEngine::open(config, EngineOptions::default()).expect("open engine")
}

/// Console answering from `answers` (one answer per line).
pub fn scripted(answers: &str) -> Scripted
{
    TermConsole::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
}

/// Everything the console printed so far.
pub fn transcript(console: &Scripted) -> String
{
    String::from_utf8_lossy(console.output()).into_owned()
}
