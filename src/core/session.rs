//! Operator session: read a command, show it, confirm, hand it to the engine.

use anyhow::Result;
use tracing::warn;

use crate::cli::{AppContext, ApplyArgs, PathArgs};
use crate::core::command::RenameCommand;
use crate::core::engine::{EngineOptions, RenameEngine, RenameReport};
use crate::core::error::RenameError;
use crate::infra::config::{self, Config};
use crate::infra::console::{Console, Palette, TermConsole};

const MCPBOT_URL: &str = "http://mcpold.ocean-labs.de/index.php/MCPBot";

/// What the loop should do after one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub fn show_help<C: Console + ?Sized>(console: &mut C) -> std::io::Result<()> {
    console.say("Usage: `scf/scm/ssf/ssm <searge_name> <semantic_name> [description]`.")?;
    console.say(&format!("See {MCPBOT_URL} for more details"))?;
    console.say("end: exit the script")?;
    console.say("h: show help")
}

/// Print the parsed command and ask for the top-level go-ahead.
/// Returns `None` when the operator declined; the command is then discarded.
pub fn submit<C: Console + ?Sized>(
    engine: &mut RenameEngine,
    console: &mut C,
    command: &RenameCommand,
    skip_confirm: bool,
) -> Result<Option<RenameReport>> {
    let palette = engine.options().palette;
    console.say(&format!("{} {}", palette.heading("Command:"), command.kind.expanded()))?;
    console.say(&format!("{} {}", palette.heading("Searge name:"), command.searge_name))?;
    console.say(&format!("{} {}", palette.heading("Semantic name:"), command.semantic_name))?;
    console.say(&format!(
        "{} {}",
        palette.heading("Description:"),
        command.description.as_deref().unwrap_or("(None given.)")
    ))?;

    if !skip_confirm && !console.yes_no("Is this okay?")? {
        console.say("Aborting.")?;
        return Ok(None);
    }

    Ok(Some(engine.process(command, console)?))
}

/// Handle one line of operator input.
pub fn handle_line<C: Console + ?Sized>(
    engine: &mut RenameEngine,
    console: &mut C,
    line: &str,
) -> Result<Flow> {
    match line {
        "end" => return Ok(Flow::Exit),
        "h" | "help" | "?" => {
            show_help(console)?;
            return Ok(Flow::Continue);
        }
        _ => {}
    }

    let command = match RenameCommand::parse(line) {
        Ok(cmd) => cmd,
        Err(e) => {
            console.say(&format!("Invalid command. ({e})"))?;
            show_help(console)?;
            return Ok(Flow::Continue);
        }
    };

    submit(engine, console, &command, false)?;
    Ok(Flow::Continue)
}

/// Command loop until `end` or end of input. Per-command failures are
/// reported and the loop goes on; fatal ones end the session.
pub fn run_loop<C: Console + ?Sized>(engine: &mut RenameEngine, console: &mut C) -> Result<()> {
    let palette = engine.options().palette;
    console.say("Type 'h' for help.")?;

    while let Some(line) = console.read_line("> ")? {
        match handle_line(engine, console, &line) {
            Ok(Flow::Exit) => break,
            Ok(Flow::Continue) => {}
            Err(e) if e.downcast_ref::<RenameError>().is_some_and(RenameError::is_fatal) => {
                return Err(e);
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "command aborted");
                console.say(&palette.error(format!("Error: {e:#}")))?;
            }
        }
        console.say("")?;
    }

    console.say("Done.")?;
    Ok(())
}

fn open_engine(paths: &PathArgs, ctx: &AppContext) -> Result<RenameEngine> {
    let config: Config = config::resolve(paths)?;
    let options = EngineOptions {
        match_mode: config.match_mode,
        quiet: ctx.quiet,
        dry_run: ctx.dry_run,
        palette: Palette::new(!ctx.no_color),
    };
    Ok(RenameEngine::open(&config, options)?)
}

/// `mcplive` / `mcplive session`: interactive loop on stdin/stdout.
pub fn run(paths: &PathArgs, ctx: &AppContext) -> Result<()> {
    let mut engine = open_engine(paths, ctx)?;
    let mut console = TermConsole::stdio();
    run_loop(&mut engine, &mut console)
}

/// `mcplive apply <command>`: one command, then exit. Failures exit non-zero.
pub fn apply_run(args: ApplyArgs, paths: &PathArgs, ctx: &AppContext) -> Result<()> {
    let line = args.command.join(" ");
    let command = RenameCommand::parse(&line)?;

    let mut engine = open_engine(paths, ctx)?;
    let mut console = TermConsole::stdio();
    submit(&mut engine, &mut console, &command, args.yes)?;
    Ok(())
}
