//! Drive the `mcplive` binary through stdin like an operator would.

mod util;

use assert_cmd::Command;
use assert_fs::prelude::*;
use clap::Parser;
use mcplive::cli::{Cli, Commands};
use predicates::prelude::*;
use util::mcp_fixture;

fn mcplive(root: &std::path::Path) -> Command
{
    let mut cmd = Command::cargo_bin("mcplive").unwrap();
    cmd.current_dir(root)
        .arg("--no-color")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn apply_flag_parsing()
{
    // Given
    let argv = vec![
        "mcplive",
        "--src",
        "sources",
        "apply",
        "--yes",
        "ssm",
        "func_70071_h_",
        "onUpdate",
        "Called",
        "every",
        "tick",
    ];

    // When
    let cli = Cli::parse_from(argv);

    // Then
    assert_eq!(
        cli.paths
            .src
            .as_deref(),
        Some(std::path::Path::new("sources"))
    );
    match cli.command
    {
        Some(Commands::Apply(args)) =>
        {
            assert!(args.yes);
            assert_eq!(args.command.join(" "), "ssm func_70071_h_ onUpdate Called every tick");
        }
        _ => panic!("expected Apply command"),
    }
}

#[test]
fn interactive_session_renames_with_default_layout()
{
    let tmp = mcp_fixture(&[("Foo.java", "int func_123_a;\n")]);

    mcplive(tmp.path())
        .write_stdin("h\nscf func_123_a isOpen\ny\ny\nend\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Type 'h' for help."))
        .stdout(predicate::str::contains("Command: set client field"))
        .stdout(predicate::str::contains("Is this okay? [y/n]: "))
        .stdout(predicate::str::contains("Wrote replacement: int isOpen;"))
        .stdout(predicate::str::contains("Done."));

    tmp.child("src/Foo.java")
        .assert("int isOpen;\n");
    tmp.child("mcp-live/src/Foo.java")
        .assert("int func_123_a;\n");
    tmp.child("mcp-live/mcpbot_commands.txt")
        .assert("scf func_123_a isOpen\n");
}

#[test]
fn session_survives_invalid_input_and_reprompts()
{
    let tmp = mcp_fixture(&[("Foo.java", "int func_123_a;\n")]);

    mcplive(tmp.path())
        .write_stdin("hello\nscf func_123_a isOpen\nmaybe\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid command."))
        .stdout(predicate::str::contains("Invalid input. Enter one of [y, n]."))
        .stdout(predicate::str::contains("Aborting."));

    tmp.child("src/Foo.java")
        .assert("int func_123_a;\n");
    tmp.child("mcp-live/mcpbot_commands.txt")
        .assert("");
}

#[test]
fn missing_source_folder_exits_with_message()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    mcplive(tmp.path())
        .write_stdin("end\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source folder not found"));

    // live dir and log are prepared before the check
    tmp.child("mcp-live/mcpbot_commands.txt")
        .assert("");
}

#[test]
fn apply_with_custom_paths()
{
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("minecraft/net/World.java")
        .write_str("void func_72835_b() {}\n")
        .unwrap();

    mcplive(tmp.path())
        .args([
            "--src",
            "minecraft",
            "--live-dir",
            "live",
            "--log-file",
            "renames.txt",
            "apply",
            "--yes",
            "scm",
            "func_72835_b",
            "tick",
        ])
        .write_stdin("y\n")
        .assert()
        .success();

    tmp.child("minecraft/net/World.java")
        .assert("void tick() {}\n");
    tmp.child("live/minecraft/net/World.java")
        .assert("void func_72835_b() {}\n");
    tmp.child("live/renames.txt")
        .assert("scm func_72835_b tick\n");
}

#[test]
fn apply_rejects_malformed_command()
{
    let tmp = mcp_fixture(&[]);

    mcplive(tmp.path())
        .args(["apply", "scf", "only_one"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed `scf` command"));
}

#[test]
fn dry_run_lists_without_changes()
{
    let tmp = mcp_fixture(&[("Foo.java", "a\nint func_1_a;\n")]);

    mcplive(tmp.path())
        .args(["--dry-run", "apply", "--yes", "scf", "func_1_a", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Foo.java:2: int func_1_a;"))
        .stdout(predicate::str::contains("DRY RUN"));

    tmp.child("src/Foo.java")
        .assert("a\nint func_1_a;\n");
    tmp.child("mcp-live/mcpbot_commands.txt")
        .assert("");
}

#[test]
fn log_command_prints_entries()
{
    let tmp = mcp_fixture(&[]);
    tmp.child("mcp-live/mcpbot_commands.txt")
        .write_str("scf a b\nssm func_1_a tick Called each tick\n")
        .unwrap();

    mcplive(tmp.path())
        .args(["log", "--raw", "--tail", "1"])
        .assert()
        .success()
        .stdout("ssm func_1_a tick Called each tick\n");

    mcplive(tmp.path())
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("set server method"))
        .stdout(predicate::str::contains("Called each tick"));
}

#[test]
fn init_writes_config_once()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    mcplive(tmp.path())
        .arg("init")
        .assert()
        .success();
    tmp.child("mcplive.toml")
        .assert(predicate::str::contains("source_dir"));

    mcplive(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_file_sets_whole_word_mode()
{
    let tmp = mcp_fixture(&[("Foo.java", "int a; int abc;\n")]);
    tmp.child("mcplive.toml")
        .write_str("match_mode = \"whole-word\"\n")
        .unwrap();

    mcplive(tmp.path())
        .args(["apply", "--yes", "scf", "a", "n"])
        .write_stdin("y\n")
        .assert()
        .success();

    tmp.child("src/Foo.java")
        .assert("int n; int abc;\n");
}

#[test]
fn completions_print_to_stdout()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    mcplive(tmp.path())
        .args(["completions", "bash", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mcplive"));
}
