//! Line-oriented operator console.
//!
//! The rename flow only ever suspends at two kinds of points: a free-form
//! command read and a bounded confirmation. Both go through [`Console`] so the
//! engine runs the same against a terminal and against scripted input.

use std::fmt::Display;
use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

use owo_colors::{OwoColorize, Style};

/// Blocking prompt + output sink used by the session and the engine.
pub trait Console
{
    /// Print `prompt` (no newline) and read one line. `None` on end of input.
    fn read_line(
        &mut self,
        prompt: &str,
    ) -> io::Result<Option<String>>;

    /// Print one line of output.
    fn say(
        &mut self,
        text: &str,
    ) -> io::Result<()>;

    /// Ask until the answer is one of `valid`; reprompts forever, no timeout.
    fn confirm(
        &mut self,
        prompt: &str,
        valid: &[&str],
    ) -> io::Result<String>
    {
        let full = format!("{prompt} [{}]: ", valid.join("/"));

        loop
        {
            match self.read_line(&full)?
            {
                Some(answer) if valid.contains(&answer.as_str()) => return Ok(answer),
                Some(_) =>
                {
                    self.say(&format!("Invalid input. Enter one of [{}].", valid.join(", ")))?;
                }
                None =>
                {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "input closed while waiting for an answer",
                    ));
                }
            }
        }
    }

    /// `confirm` over `{y, n}`; true only for `y`.
    fn yes_no(
        &mut self,
        prompt: &str,
    ) -> io::Result<bool>
    {
        Ok(self.confirm(prompt, &["y", "n"])? == "y")
    }
}

/// Console over any reader/writer pair.
pub struct TermConsole<R, W>
{
    reader: R,
    writer: W,
}

impl TermConsole<StdinLock<'static>, Stdout>
{
    /// Console bound to the process stdin/stdout.
    pub fn stdio() -> Self
    {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TermConsole<R, W>
{
    pub fn new(
        reader: R,
        writer: W,
    ) -> Self
    {
        Self { reader, writer }
    }

    /// Everything written so far (handy with `Vec<u8>` writers).
    pub fn output(&self) -> &W
    {
        &self.writer
    }
}

impl<R: BufRead, W: Write> Console for TermConsole<R, W>
{
    fn read_line(
        &mut self,
        prompt: &str,
    ) -> io::Result<Option<String>>
    {
        self.writer
            .write_all(prompt.as_bytes())?;
        self.writer
            .flush()?;

        let mut line = String::new();
        if self
            .reader
            .read_line(&mut line)?
            == 0
        {
            return Ok(None);
        }

        // Strip only the terminator; answers are compared verbatim
        let trimmed = line.trim_end_matches(['\n', '\r']);
        Ok(Some(trimmed.to_string()))
    }

    fn say(
        &mut self,
        text: &str,
    ) -> io::Result<()>
    {
        writeln!(self.writer, "{text}")
    }
}

/// Terminal styling that collapses to plain text under `--no-color`.
#[derive(Debug, Clone, Copy)]
pub struct Palette
{
    enabled: bool,
}

impl Palette
{
    pub fn new(enabled: bool) -> Self
    {
        Self { enabled }
    }

    pub fn plain() -> Self
    {
        Self::new(false)
    }

    pub fn paint<T: Display>(
        &self,
        text: T,
        style: Style,
    ) -> String
    {
        if self.enabled
        {
            text.style(style)
                .to_string()
        }
        else
        {
            text.to_string()
        }
    }

    pub fn heading<T: Display>(
        &self,
        text: T,
    ) -> String
    {
        self.paint(text, Style::new().bold().cyan())
    }

    pub fn added<T: Display>(
        &self,
        text: T,
    ) -> String
    {
        self.paint(text, Style::new().green())
    }

    pub fn muted<T: Display>(
        &self,
        text: T,
    ) -> String
    {
        self.paint(text, Style::new().dimmed())
    }

    pub fn warn<T: Display>(
        &self,
        text: T,
    ) -> String
    {
        self.paint(text, Style::new().yellow())
    }

    pub fn error<T: Display>(
        &self,
        text: T,
    ) -> String
    {
        self.paint(text, Style::new().bold().red())
    }
}
