#![forbid(unsafe_code)]

//! Tab completion and inline suggestions.
//!
//! Two grammars are recognised:
//!
//! 1. `cd <partial>`: candidates are known routes starting with the
//!    partial, which is given a leading slash first.
//! 2. A single bare token: candidates are command names with that prefix
//!    (case-sensitive).
//!
//! Repeated completion within the debounce window cycles through an
//! ambiguous candidate set in declared order.

use std::time::Duration;

use crate::vocab::{Vocabulary, normalize_path};

/// Default window in which a repeated completion cycles.
pub const COMPLETION_DEBOUNCE: Duration = Duration::from_millis(500);

/// How a completion request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// No candidate; input left as typed.
    NoMatch,
    Unique,
    /// Rewritten to a longer common prefix of several candidates.
    CommonPrefix,
    /// First candidate of an ambiguous set; the set is remembered.
    First,
    /// Advanced to the next remembered candidate.
    Cycled,
}

/// Result of one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub input: String,
    /// The new input came from a candidate.
    pub accepted: bool,
    pub kind: CompletionKind,
}

#[derive(Debug, Clone)]
struct CycleState {
    candidates: Vec<String>,
    index: usize,
}

/// Per-instance completion state.
#[derive(Debug, Clone)]
pub struct Completer {
    debounce: Duration,
    cycle: Option<CycleState>,
    last_at: Option<Duration>,
}

impl Default for Completer {
    fn default() -> Self {
        Self::new(COMPLETION_DEBOUNCE)
    }
}

/// Candidate lines for `input`, plus the typed text they are compared to.
fn candidates(input: &str, vocab: &Vocabulary) -> Option<(String, Vec<String>)> {
    if let Some(rest) = input.strip_prefix("cd ") {
        let partial = rest.trim_start();
        if partial.contains(char::is_whitespace) {
            return None;
        }
        let partial = if partial.is_empty() {
            "/".to_owned()
        } else if partial.starts_with('/') {
            partial.to_owned()
        } else {
            format!("/{partial}")
        };
        let lines = vocab
            .routes_with_prefix(&partial)
            .into_iter()
            .map(|path| format!("cd {path}"))
            .collect();
        return Some((format!("cd {partial}"), lines));
    }

    if input.is_empty() || input.contains(char::is_whitespace) {
        return None;
    }
    let lines = vocab
        .commands_with_prefix(input)
        .into_iter()
        .map(str::to_owned)
        .collect();
    Some((input.to_owned(), lines))
}

/// Longest string prefixing every item, on char boundaries.
#[must_use]
pub fn longest_common_prefix<S: AsRef<str>>(items: &[S]) -> String {
    let Some((first, rest)) = items.split_first() else {
        return String::new();
    };
    let first = first.as_ref();
    let mut end = first.len();
    for item in rest {
        let item = item.as_ref();
        end = first[..end]
            .char_indices()
            .zip(item.chars())
            .find(|((_, a), b)| a != b)
            .map_or_else(|| end.min(item.len()), |((i, _), _)| i);
        while !first.is_char_boundary(end) {
            end -= 1;
        }
    }
    first[..end].to_owned()
}

/// Ghost text to render after `input`, never part of the buffer.
///
/// The suffix is taken against the normalized partial, so `cd ab` suggests
/// `out` the same way Tab would complete it to `cd /about`.
#[must_use]
pub fn inline_suggestion(input: &str, vocab: &Vocabulary) -> Option<String> {
    let (typed, lines) = candidates(input, vocab)?;
    let target = match lines.as_slice() {
        [] => return None,
        [only] => only.clone(),
        many => longest_common_prefix(many),
    };
    target
        .strip_prefix(typed.as_str())
        .filter(|rest| !rest.is_empty())
        .map(str::to_owned)
}

impl Completer {
    #[must_use]
    pub const fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            cycle: None,
            last_at: None,
        }
    }

    /// Forget any remembered candidate set.
    pub fn reset(&mut self) {
        self.cycle = None;
        self.last_at = None;
    }

    fn within_window(&self, now: Duration) -> bool {
        self.last_at
            .is_some_and(|last| now.saturating_sub(last) < self.debounce)
    }

    /// Resolve one completion request at host time `now`.
    pub fn complete(&mut self, input: &str, vocab: &Vocabulary, now: Duration) -> Completion {
        let within = self.within_window(now);
        self.last_at = Some(now);

        if let Some(cycle) = self.cycle.as_mut().filter(|_| within) {
            if cycle.candidates.get(cycle.index).is_some_and(|c| c == input) {
                cycle.index = (cycle.index + 1) % cycle.candidates.len();
                let next = cycle.candidates[cycle.index].clone();
                tracing::debug!(index = cycle.index, candidate = %next, "completion cycled");
                return Completion {
                    input: next,
                    accepted: true,
                    kind: CompletionKind::Cycled,
                };
            }
        }
        self.cycle = None;

        let Some((typed, mut lines)) = candidates(input, vocab) else {
            return Self::unchanged(input);
        };

        match lines.len() {
            0 => Self::unchanged(input),
            1 => {
                let input = lines.swap_remove(0);
                tracing::debug!(candidate = %input, "completion unique");
                Completion {
                    input,
                    accepted: true,
                    kind: CompletionKind::Unique,
                }
            }
            count => {
                let prefix = longest_common_prefix(&lines);
                if prefix.len() > typed.len() {
                    tracing::debug!(%prefix, count, "completion common prefix");
                    return Completion {
                        input: prefix,
                        accepted: false,
                        kind: CompletionKind::CommonPrefix,
                    };
                }
                let first = lines[0].clone();
                tracing::debug!(candidate = %first, count, "completion cycle started");
                self.cycle = Some(CycleState {
                    candidates: lines,
                    index: 0,
                });
                Completion {
                    input: first,
                    accepted: true,
                    kind: CompletionKind::First,
                }
            }
        }
    }

    fn unchanged(input: &str) -> Completion {
        Completion {
            input: input.to_owned(),
            accepted: false,
            kind: CompletionKind::NoMatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn unique_command_is_accepted() {
        let mut c = Completer::default();
        let out = c.complete("he", &Vocabulary::default(), ms(0));
        assert_eq!(out.input, "help");
        assert!(out.accepted);
        assert_eq!(out.kind, CompletionKind::Unique);
    }

    #[test]
    fn no_match_leaves_input() {
        let mut c = Completer::default();
        let out = c.complete("zz", &Vocabulary::default(), ms(0));
        assert_eq!(out.input, "zz");
        assert!(!out.accepted);
        assert_eq!(out.kind, CompletionKind::NoMatch);

        let out = c.complete("echo hi", &Vocabulary::default(), ms(0));
        assert_eq!(out.kind, CompletionKind::NoMatch);
    }

    #[test]
    fn cycles_within_debounce_window() {
        let vocab = Vocabulary::default();
        let mut c = Completer::default();

        let out = c.complete("su", &vocab, ms(0));
        assert_eq!((out.input.as_str(), out.kind), ("su", CompletionKind::First));
        let out = c.complete("su", &vocab, ms(200));
        assert_eq!((out.input.as_str(), out.kind), ("sudo", CompletionKind::Cycled));
        assert!(out.accepted);
        let out = c.complete("sudo", &vocab, ms(400));
        assert_eq!(out.input, "su");
    }

    #[test]
    fn restarts_after_window() {
        let vocab = Vocabulary::default();
        let mut c = Completer::default();
        c.complete("su", &vocab, ms(0));
        let out = c.complete("su", &vocab, ms(600));
        assert_eq!((out.input.as_str(), out.kind), ("su", CompletionKind::First));
    }

    #[test]
    fn common_prefix_extends_before_cycling() {
        let mut vocab = Vocabulary::default();
        vocab.commands = vec!["theme".into(), "themes".into(), "help".into()];
        let mut c = Completer::default();
        let out = c.complete("th", &vocab, ms(0));
        assert_eq!(out.input, "theme");
        assert!(!out.accepted);
        assert_eq!(out.kind, CompletionKind::CommonPrefix);
    }

    #[test]
    fn completes_routes_after_cd() {
        let vocab = Vocabulary::default();
        let mut c = Completer::default();
        let out = c.complete("cd ab", &vocab, ms(0));
        assert_eq!(out.input, "cd /about");
        assert!(out.accepted);

        let out = c.complete("cd /", &vocab, ms(0));
        assert_eq!(out.input, "cd /");
        assert_eq!(out.kind, CompletionKind::First);
        let out = c.complete("cd /", &vocab, ms(100));
        assert_eq!(out.input, "cd /about");
    }

    #[test]
    fn suggestion_is_remaining_suffix() {
        let vocab = Vocabulary::default();
        assert_eq!(inline_suggestion("he", &vocab).as_deref(), Some("lp"));
        assert_eq!(inline_suggestion("cd /pro", &vocab).as_deref(), Some("jects"));
        assert_eq!(inline_suggestion("cd ab", &vocab).as_deref(), Some("out"));
        assert_eq!(inline_suggestion("su", &vocab), None);
        assert_eq!(inline_suggestion("", &vocab), None);
    }

    #[test]
    fn common_prefix_of_strings() {
        assert_eq!(longest_common_prefix(&["sudo", "su"]), "su");
        assert_eq!(longest_common_prefix(&["abc", "xyz"]), "");
        assert_eq!(longest_common_prefix::<&str>(&[]), "");
        assert_eq!(longest_common_prefix(&["héllo", "hélp"]), "hél");
    }
}
