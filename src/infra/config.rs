use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs, PathArgs};
use crate::core::review::MatchMode;

/// Config file names probed in the working directory, first hit wins
const CONFIG_FILES: [&str; 4] = ["mcplive.toml", "mcplive.yaml", "mcplive.json", ".mcplive.toml"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Source tree the renames are applied to
    pub source_dir: PathBuf,

    /// Live directory holding the backup tree and the mapping log
    pub live_dir: PathBuf,

    /// Mapping log file name, relative to `live_dir`
    pub log_file: String,

    /// Extra glob patterns skipped while locating occurrences
    pub ignore_patterns: Vec<String>,

    /// Search dotfiles and dot-directories
    pub include_hidden: bool,

    /// Honor .gitignore files under the source tree
    pub respect_gitignore: bool,

    /// Substring (default) or whole-word matching of searge names
    pub match_mode: MatchMode,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            source_dir: PathBuf::from("./src/"),
            live_dir: PathBuf::from("./mcp-live/"),
            log_file: "mcpbot_commands.txt".to_string(),
            ignore_patterns: Vec::new(),
            include_hidden: true,
            respect_gitignore: false,
            match_mode: MatchMode::Substring,
        }
    }
}

impl Config
{
    /// Full path of the mapping log.
    pub fn log_path(&self) -> PathBuf
    {
        self.live_dir
            .join(&self.log_file)
    }

    /// Root of the backup tree: `<live_dir>/<source dir name>`, so the
    /// mirrored layout keeps the source folder name (e.g. `mcp-live/src/..`).
    /// Sources like `.` or `..` use the name of the directory they resolve
    /// to; `src` only when that cannot be determined (e.g. filesystem root).
    pub fn backup_root(&self) -> PathBuf
    {
        let name: OsString = match self
            .source_dir
            .file_name()
        {
            Some(name) => name.to_os_string(),
            None => std::fs::canonicalize(&self.source_dir)
                .ok()
                .and_then(|p| {
                    p.file_name()
                        .map(OsStr::to_os_string)
                })
                .unwrap_or_else(|| OsString::from("src")),
        };
        self.live_dir
            .join(name)
    }

    /// Layer CLI flags over file/env values.
    pub fn apply_overrides(
        &mut self,
        args: &PathArgs,
    )
    {
        if let Some(src) = &args.src
        {
            self.source_dir = src.clone();
        }
        if let Some(live) = &args.live_dir
        {
            self.live_dir = live.clone();
        }
        if let Some(name) = &args.log_file
        {
            self.log_file = name.clone();
        }
        if args.whole_word
        {
            self.match_mode = MatchMode::WholeWord;
        }
    }

    /// Expand `~` and `$VAR` in the configured directories.
    pub fn expand_paths(&mut self) -> Result<()>
    {
        self.source_dir = expand(&self.source_dir)?;
        self.live_dir = expand(&self.live_dir)?;
        Ok(())
    }
}

fn expand(path: &Path) -> Result<PathBuf>
{
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand path {}", path.display()))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

pub fn load_config() -> Result<Config>
{
    load_config_in(Path::new("."))
}

/// Load config from the first config file found in `dir`, then
/// `MCPLIVE__*` environment variables.
pub fn load_config_in(dir: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    for name in &CONFIG_FILES
    {
        let path = dir.join(name);
        if path.exists()
        {
            builder = builder.add_source(config::File::from(path));
            break;
        }
    }

    builder = builder.add_source(config::Environment::with_prefix("MCPLIVE").separator("__"));

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

/// Config for a command invocation: file/env layers, CLI overrides, path expansion.
pub fn resolve(args: &PathArgs) -> Result<Config>
{
    let mut config = load_config()?;
    config.apply_overrides(args);
    config.expand_paths()?;
    Ok(config)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("mcplive.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_mirror_mcp_layout()
    {
        let config = Config::default();
        assert_eq!(config.log_path(), Path::new("./mcp-live/mcpbot_commands.txt"));
        assert_eq!(config.backup_root(), Path::new("./mcp-live/src"));
        assert_eq!(config.match_mode, MatchMode::Substring);
    }

    #[test]
    fn partial_file_keeps_defaults() -> Result<()>
    {
        let tmp = TempDir::new()?;
        std::fs::write(
            tmp.path()
                .join("mcplive.toml"),
            "source_dir = \"sources/minecraft\"\nmatch_mode = \"whole-word\"\n",
        )?;

        let config = load_config_in(tmp.path())?;
        assert_eq!(config.source_dir, PathBuf::from("sources/minecraft"));
        assert_eq!(config.match_mode, MatchMode::WholeWord);
        assert_eq!(config.log_file, "mcpbot_commands.txt");
        assert_eq!(config.backup_root(), Path::new("./mcp-live/minecraft"));
        Ok(())
    }

    #[test]
    fn dot_sources_back_up_under_their_resolved_name() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let project = tmp
            .path()
            .join("forge");
        std::fs::create_dir_all(project.join("nested"))?;

        let config = Config {
            source_dir: project.join("nested/.."),
            live_dir: tmp
                .path()
                .join("live"),
            ..Config::default()
        };
        assert_eq!(
            config.backup_root(),
            tmp.path()
                .join("live/forge")
        );

        let config = Config {
            source_dir: project.join("."),
            ..config
        };
        assert!(
            config
                .backup_root()
                .ends_with("live/forge")
        );
        Ok(())
    }

    #[test]
    fn cli_overrides_win()
    {
        let mut config = Config::default();
        config.apply_overrides(&PathArgs {
            src: Some(PathBuf::from("other")),
            live_dir: None,
            log_file: Some("log.txt".into()),
            whole_word: true,
        });

        assert_eq!(config.source_dir, PathBuf::from("other"));
        assert_eq!(config.live_dir, PathBuf::from("./mcp-live/"));
        assert_eq!(config.log_path(), Path::new("./mcp-live/log.txt"));
        assert_eq!(config.match_mode, MatchMode::WholeWord);
    }

    #[test]
    fn init_refuses_to_overwrite() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let ctx = AppContext { quiet: true, ..Default::default() };
        let args = || InitArgs { path: tmp.path().to_path_buf(), force: false };

        init(args(), &ctx)?;
        let written = std::fs::read_to_string(
            tmp.path()
                .join("mcplive.toml"),
        )?;
        let parsed: Config = toml::from_str(&written)?;
        assert_eq!(parsed, Config::default());

        assert!(init(args(), &ctx).is_err());
        init(InitArgs { path: tmp.path().to_path_buf(), force: true }, &ctx)?;
        Ok(())
    }
}
