use anyhow::Result;
use clap::Parser;
use mcplive::cli::{AppContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };

    let Cli { command, paths, .. } = cli;
    match command.unwrap_or(Commands::Session) {
        Commands::Session => mcplive::core::session::run(&paths, &ctx),
        Commands::Apply(args) => mcplive::core::session::apply_run(args, &paths, &ctx),
        Commands::Log(args) => mcplive::core::mapping_log::run(args, &paths, &ctx),
        Commands::Init(args) => mcplive::infra::config::init(args, &ctx),
        Commands::Completions(args) => mcplive::completion::run(args, &ctx),
    }
}

/// Diagnostics go to stderr so they never interleave with prompts on stdout.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
