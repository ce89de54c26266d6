//! `mcplive completions <shell>`: render the completion script for the
//! rename CLI and print it or drop it into a directory.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{Generator, Shell as CompletionShell, generate};
use tracing::info;

use crate::cli::{AppContext, Cli, CompletionsArgs, Shell};
use crate::infra::io::write_atomic;

const BIN_NAME: &str = "mcplive";

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
            Shell::Elvish => CompletionShell::Elvish,
        }
    }
}

/// Completion script for `shell`, in memory.
pub fn script(shell: CompletionShell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buf);
    buf
}

pub fn run(args: CompletionsArgs, ctx: &AppContext) -> Result<()> {
    let shell: CompletionShell = args.shell.into();
    let body = script(shell);

    if args.stdout {
        let mut out = io::stdout().lock();
        out.write_all(&body).context("write completion script")?;
        return out.flush().context("flush completion script");
    }

    let dir: PathBuf = args
        .out_dir
        .context("--out-dir is required unless --stdout is set")?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;

    let path = dir.join(shell.file_name(BIN_NAME));
    if !path.exists() {
        fs::File::create(&path).with_context(|| format!("create {}", path.display()))?;
    }
    write_atomic(&path, &body)?;
    info!(shell = %shell, path = %path.display(), "completion script written");

    if !ctx.quiet {
        println!("Wrote completion to {}", path.display());
    }
    Ok(())
}
