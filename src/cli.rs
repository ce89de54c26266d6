use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

#[derive(Parser)]
#[command(name = "mcplive")]
#[command(
    about = "Interactively rename searge names to semantic names across an MCP source tree"
)]
#[command(version, long_about = None)]
pub struct Cli {
    /// Subcommand; an interactive session starts when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub paths: PathArgs,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output (replacement echoes, reports)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show matching lines without logging, backing up or editing
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Raise diagnostic log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Path and matching overrides layered on top of the config file
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PathArgs {
    /// Source tree to rename in (default: ./src/)
    #[arg(long, global = true, value_name = "DIR")]
    pub src: Option<PathBuf>,

    /// Live directory holding backups and the mapping log (default: ./mcp-live/)
    #[arg(long, global = true, value_name = "DIR")]
    pub live_dir: Option<PathBuf>,

    /// Mapping log file name inside the live directory
    #[arg(long, global = true, value_name = "NAME")]
    pub log_file: Option<String>,

    /// Only match the searge name as a whole word
    #[arg(long, global = true)]
    pub whole_word: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive rename session (default)
    Session,

    /// Run a single rename command, e.g. `scf field_1234_a isOpen`
    Apply(ApplyArgs),

    /// Show the mapping log
    Log(LogArgs),

    /// Initialize a mcplive.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Rename command words (`scf|scm|ssf|ssm <searge> <semantic> [description]`)
    #[arg(required = true, num_args = 1.., value_name = "COMMAND")]
    pub command: Vec<String>,

    /// Skip the top-level "Is this okay?" confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct LogArgs {
    /// Only show the last N entries
    #[arg(long)]
    pub tail: Option<usize>,

    /// Print raw log lines instead of a table
    #[arg(long)]
    pub raw: bool,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
