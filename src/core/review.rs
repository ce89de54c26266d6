//! Line review: walk one file top to bottom, ask per matching line, and build
//! the edited content in memory. Nothing here touches the disk except the
//! initial read, which is what lets the caller flush atomically afterwards.
//!
//! Works on raw bytes: line terminators (LF, CRLF, none on the last line) and
//! non-UTF-8 content pass through untouched.

use std::path::Path;

use anyhow::{Context, Result};
use bstr::{BString, ByteSlice};
use memchr::memmem::Finder;
use regex::bytes::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use crate::infra::console::{Console, Palette};
use crate::infra::io::read_file_smart;

/// How a searge name is matched inside a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Raw substring, so `a` also hits `abc`; the MCP-compatible default
    #[default]
    Substring,
    /// Only occurrences bounded by non-word characters
    WholeWord,
}

/// Compiled matcher for one name.
#[derive(Debug)]
pub struct LineMatcher {
    needle: Vec<u8>,
    finder: Finder<'static>,
    word: Option<Regex>,
}

impl LineMatcher {
    pub fn new(needle: &str, mode: MatchMode) -> Result<Self> {
        if needle.is_empty() {
            anyhow::bail!("cannot match an empty name");
        }
        let word = match mode {
            MatchMode::Substring => None,
            MatchMode::WholeWord => Some(
                Regex::new(&format!(r"\b{}\b", regex::escape(needle)))
                    .with_context(|| format!("build word matcher for `{needle}`"))?,
            ),
        };
        Ok(Self {
            needle: needle.as_bytes().to_vec(),
            finder: Finder::new(needle.as_bytes()).into_owned(),
            word,
        })
    }

    pub fn is_match(&self, line: &[u8]) -> bool {
        match &self.word {
            Some(re) => re.is_match(line),
            None => self.finder.find(line).is_some(),
        }
    }

    /// Number of occurrences in `line`.
    pub fn count(&self, line: &[u8]) -> usize {
        match &self.word {
            Some(re) => re.find_iter(line).count(),
            None => self.finder.find_iter(line).count(),
        }
    }

    /// Replace every occurrence in `line`.
    pub fn replace_all(&self, line: &[u8], with: &[u8]) -> Vec<u8> {
        match &self.word {
            Some(re) => re.replace_all(line, NoExpand(with)).into_owned(),
            None => line.replace(&self.needle, with),
        }
    }
}

/// Result of reviewing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// Full edited content, all lines in original order
    pub content: Vec<u8>,
    /// Lines that contained the name
    pub matched: usize,
    /// Lines the operator accepted
    pub replaced: usize,
}

impl ReviewOutcome {
    pub fn changed(&self) -> bool {
        self.replaced > 0
    }
}

/// A matching line, for dry runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineHit {
    pub number: usize, // 1-based
    pub text: BString, // without terminator
}

pub struct LineReview<'a> {
    matcher: &'a LineMatcher,
    replacement: &'a [u8],
    palette: Palette,
    quiet: bool,
}

impl<'a> LineReview<'a> {
    pub fn new(matcher: &'a LineMatcher, replacement: &'a str) -> Self {
        Self {
            matcher,
            replacement: replacement.as_bytes(),
            palette: Palette::plain(),
            quiet: false,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Suppress the per-line "Wrote replacement"/"Skipping" echoes.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Ask about every matching line of `path`; returns the edited content.
    pub fn run<C: Console + ?Sized>(&self, path: &Path, console: &mut C) -> Result<ReviewOutcome> {
        let source = read_file_smart(path)?;
        let bytes = source.as_ref();

        let mut content = Vec::with_capacity(bytes.len());
        let mut matched = 0;
        let mut replaced = 0;

        for (idx, line) in bytes.lines_with_terminator().enumerate() {
            if !self.matcher.is_match(line) {
                content.extend_from_slice(line);
                continue;
            }
            matched += 1;

            console.say(&self.palette.heading(format!("In line {} of {}:", idx + 1, path.display())))?;
            console.say(&display_line(line).to_string())?;

            if console.yes_no("Replace?")? {
                let edited = self.matcher.replace_all(line, self.replacement);
                if !self.quiet {
                    console.say(&format!(
                        "Wrote replacement: {}",
                        self.palette.added(display_line(&edited))
                    ))?;
                }
                content.extend_from_slice(&edited);
                replaced += 1;
            } else {
                if !self.quiet {
                    console.say(&self.palette.muted("Skipping this line."))?;
                }
                content.extend_from_slice(line);
            }
        }

        Ok(ReviewOutcome {
            content,
            matched,
            replaced,
        })
    }

    /// Matching lines of `path` without prompting.
    pub fn preview(&self, path: &Path) -> Result<Vec<LineHit>> {
        let source = read_file_smart(path)?;
        Ok(source
            .as_ref()
            .lines_with_terminator()
            .enumerate()
            .filter(|(_, line)| self.matcher.is_match(line))
            .map(|(idx, line)| LineHit {
                number: idx + 1,
                text: display_line(line).to_owned(),
            })
            .collect())
    }
}

/// Line without its terminator, printable lossily.
fn display_line(line: &[u8]) -> &bstr::BStr {
    line.trim_end_with(|c| c == '\n' || c == '\r').as_bstr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::console::TermConsole;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn console(answers: &str) -> TermConsole<Cursor<Vec<u8>>, Vec<u8>> {
        TermConsole::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
    }

    fn fixture(body: &[u8]) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Foo.java");
        fs::write(&path, body).unwrap();
        (tmp, path)
    }

    #[test]
    fn accepts_and_skips_per_line() {
        let (_tmp, path) = fixture(b"int func_1_a;\nint other;\nreturn func_1_a + func_1_a;\n");
        let matcher = LineMatcher::new("func_1_a", MatchMode::Substring).unwrap();
        let mut c = console("n\ny\n");

        let out = LineReview::new(&matcher, "isOpen").run(&path, &mut c).unwrap();

        assert_eq!(out.matched, 2);
        assert_eq!(out.replaced, 1);
        assert_eq!(out.content, b"int func_1_a;\nint other;\nreturn isOpen + isOpen;\n");

        let shown = String::from_utf8(c.output().clone()).unwrap();
        assert!(shown.contains(&format!("In line 1 of {}:", path.display())));
        assert!(shown.contains(&format!("In line 3 of {}:", path.display())));
        assert!(shown.contains("Skipping this line."));
        assert!(shown.contains("Wrote replacement: return isOpen + isOpen;"));
        // review never writes
        assert_eq!(fs::read(&path).unwrap(), b"int func_1_a;\nint other;\nreturn func_1_a + func_1_a;\n");
    }

    #[test]
    fn preserves_crlf_and_missing_final_newline() {
        let (_tmp, path) = fixture(b"a func_1_a\r\nb\r\nfunc_1_a");
        let matcher = LineMatcher::new("func_1_a", MatchMode::Substring).unwrap();
        let mut c = console("y\ny\n");

        let out = LineReview::new(&matcher, "x").run(&path, &mut c).unwrap();
        assert_eq!(out.content, b"a x\r\nb\r\nx");
    }

    #[test]
    fn substring_mode_touches_embedded_names() {
        let matcher = LineMatcher::new("func_1_a", MatchMode::Substring).unwrap();
        assert_eq!(matcher.replace_all(b"func_1_ab func_1_a", b"z"), b"zb z");

        let word = LineMatcher::new("func_1_a", MatchMode::WholeWord).unwrap();
        assert!(!word.is_match(b"func_1_ab"));
        assert_eq!(word.count(b"func_1_ab func_1_a(func_1_a)"), 2);
        assert_eq!(word.replace_all(b"func_1_ab func_1_a", b"$0"), b"func_1_ab $0");
    }

    #[test]
    fn no_matches_means_no_prompts() {
        let (_tmp, path) = fixture(b"nothing here\n");
        let matcher = LineMatcher::new("func_1_a", MatchMode::Substring).unwrap();
        let mut c = console("");

        let out = LineReview::new(&matcher, "x").run(&path, &mut c).unwrap();
        assert_eq!(out.matched, 0);
        assert!(!out.changed());
        assert!(c.output().is_empty());
    }

    #[test]
    fn eof_mid_review_is_an_error() {
        let (_tmp, path) = fixture(b"func_1_a\nfunc_1_a\n");
        let matcher = LineMatcher::new("func_1_a", MatchMode::Substring).unwrap();
        let mut c = console("y\n");

        assert!(LineReview::new(&matcher, "x").run(&path, &mut c).is_err());
    }

    #[test]
    fn quiet_hides_echoes() {
        let (_tmp, path) = fixture(b"func_1_a\n");
        let matcher = LineMatcher::new("func_1_a", MatchMode::Substring).unwrap();
        let mut c = console("y\n");

        LineReview::new(&matcher, "x").with_quiet(true).run(&path, &mut c).unwrap();
        let shown = String::from_utf8(c.output().clone()).unwrap();
        assert!(!shown.contains("Wrote replacement"));
        assert!(shown.contains("Replace? [y/n]: "));
    }

    #[test]
    fn preview_lists_hits() {
        let (_tmp, path) = fixture(b"a\nfunc_1_a;\r\nb func_1_a\n");
        let matcher = LineMatcher::new("func_1_a", MatchMode::Substring).unwrap();

        let hits = LineReview::new(&matcher, "x").preview(&path).unwrap();
        assert_eq!(
            hits,
            vec![
                LineHit { number: 2, text: "func_1_a;".into() },
                LineHit { number: 3, text: "b func_1_a".into() },
            ]
        );
    }
}
