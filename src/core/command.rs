//! MCPBot-style rename commands: `scf|scm|ssf|ssm <searge> <semantic> [description]`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// Command grammar; keyword is case-insensitive, names are `\w+`.
static GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:(?P<kind>scf|scm|ssf|ssm)) (?P<searge>\w+) (?P<semantic>\w+)(?: (?P<description>.+))?$")
        .expect("rename grammar is a valid regex")
});

/// Which mapping a rename targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenameKind {
    SetClientField,
    SetClientMethod,
    SetServerField,
    SetServerMethod,
}

impl RenameKind {
    pub const ALL: [RenameKind; 4] = [
        RenameKind::SetClientField,
        RenameKind::SetClientMethod,
        RenameKind::SetServerField,
        RenameKind::SetServerMethod,
    ];

    /// MCPBot keyword as written to the mapping log.
    pub fn keyword(self) -> &'static str {
        match self {
            RenameKind::SetClientField => "scf",
            RenameKind::SetClientMethod => "scm",
            RenameKind::SetServerField => "ssf",
            RenameKind::SetServerMethod => "ssm",
        }
    }

    /// Human form, e.g. `set client field`.
    pub fn expanded(self) -> &'static str {
        match self {
            RenameKind::SetClientField => "set client field",
            RenameKind::SetClientMethod => "set client method",
            RenameKind::SetServerField => "set server field",
            RenameKind::SetServerMethod => "set server method",
        }
    }
}

impl fmt::Display for RenameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for RenameKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenameKind::ALL
            .into_iter()
            .find(|k| k.keyword().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownKind(s.to_string()))
    }
}

/// Command grammar errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (expected scf, scm, ssf or ssm)")]
    UnknownKind(String),
    #[error("malformed `{0}` command: expected `{0} <searge_name> <semantic_name> [description]`")]
    Malformed(String),
}

/// One accepted operator decision; immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameCommand {
    pub kind: RenameKind,
    pub searge_name: String,
    pub semantic_name: String,
    pub description: Option<String>,
}

impl RenameCommand {
    pub fn new(kind: RenameKind, searge: impl Into<String>, semantic: impl Into<String>) -> Self {
        Self {
            kind,
            searge_name: searge.into(),
            semantic_name: semantic.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parse one line of operator input.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let Some(caps) = GRAMMAR.captures(line) else {
            let word = line.split_whitespace().next().unwrap_or_default();
            return Err(match word.parse::<RenameKind>() {
                Ok(kind) => ParseError::Malformed(kind.keyword().to_string()),
                Err(e) => e,
            });
        };

        Ok(Self {
            kind: caps["kind"].parse()?,
            searge_name: caps["searge"].to_string(),
            semantic_name: caps["semantic"].to_string(),
            description: caps.name("description").map(|m| m.as_str().to_string()),
        })
    }
}

impl FromStr for RenameCommand {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenameCommand::parse(s)
    }
}

/// Renders the mapping-log line: `<kind> <searge> <semantic>[ <description>]`.
impl fmt::Display for RenameCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.searge_name, self.semantic_name)?;
        if let Some(desc) = &self.description {
            write!(f, " {desc}")?;
        }
        Ok(())
    }
}
