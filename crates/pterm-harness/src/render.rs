#![forbid(unsafe_code)]

//! Plain-text rendering of the scrollback.

use std::io::{self, Write};

use pterm::{HistoryEntry, Interpreter};

/// Render the scrollback as the lines a page would show.
#[must_use]
pub fn scrollback(shell: &Interpreter) -> Vec<String> {
    let config = shell.config();
    let mut lines = Vec::new();
    for entry in shell.history().iter() {
        match entry {
            HistoryEntry::Command {
                text,
                is_root,
                path,
                ..
            } => {
                let prompt = if *is_root {
                    format!("root@{}:{path}# ", config.host)
                } else {
                    format!("{}@{}:{path}$ ", config.user, config.host)
                };
                lines.push(format!("{prompt}{text}"));
            }
            HistoryEntry::Output { lines: output } => lines.extend(output.iter().cloned()),
            HistoryEntry::Error { message, .. } => lines.push(message.clone()),
        }
    }
    lines
}

/// Prints only what changed since the previous frame.
///
/// Appended lines are printed as they are. Anything else (a cleared screen,
/// a replaced `Checking…` line) repaints the whole scrollback.
#[derive(Debug, Default)]
pub struct Renderer {
    shown: Vec<String>,
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, lines: Vec<String>, out: &mut impl Write) -> io::Result<()> {
        if lines.starts_with(&self.shown) {
            for line in &lines[self.shown.len()..] {
                writeln!(out, "{line}")?;
            }
        } else {
            writeln!(out, "--- redraw ---")?;
            for line in &lines {
                writeln!(out, "{line}")?;
            }
        }
        self.shown = lines;
        Ok(())
    }

    /// Forget what was shown, so the next frame prints in full.
    pub fn invalidate(&mut self) {
        self.shown.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn appends_print_only_the_tail() {
        let mut r = Renderer::new();
        let mut out = Vec::new();
        r.render(lines(&["a", "b"]), &mut out).unwrap();
        r.render(lines(&["a", "b", "c"]), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn rewrites_repaint() {
        let mut r = Renderer::new();
        let mut out = Vec::new();
        r.render(lines(&["a", "Checking…"]), &mut out).unwrap();
        r.render(lines(&["a", "guest@1.2.3.4"]), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a\nChecking…\n--- redraw ---\na\nguest@1.2.3.4\n"
        );
    }
}
