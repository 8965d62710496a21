#![forbid(unsafe_code)]

//! Line-bounded scrollback.
//!
//! The cap is measured in displayed lines, not entries. Eviction always drops
//! whole entries from the front so a multi-line output is never split. The
//! only exception is a single output entry that is longer than the whole cap
//! on its own: it keeps its last `max_lines` lines.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ShellError};

/// Default cap on displayed history lines.
pub const MAX_HISTORY_LINES: usize = 500;

/// One item of the scrollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// A submitted line, echoed with the prompt it was typed at.
    Command {
        text: String,
        is_root: bool,
        /// Produced in whole or part by autocomplete.
        accepted: bool,
        path: String,
    },
    Output {
        lines: Vec<String>,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
}

impl HistoryEntry {
    /// Single-line output.
    #[must_use]
    pub fn line(text: impl Into<String>) -> Self {
        Self::Output {
            lines: vec![text.into()],
        }
    }

    #[must_use]
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Output {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn error(err: &ShellError) -> Self {
        Self::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// Number of displayed lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        match self {
            Self::Output { lines } => lines.len(),
            Self::Command { .. } | Self::Error { .. } => 1,
        }
    }

    fn clip_to(&mut self, max_lines: usize) {
        if let Self::Output { lines } = self {
            let excess = lines.len().saturating_sub(max_lines);
            if excess > 0 {
                lines.drain(..excess);
            }
        }
    }
}

/// Stable handle to an entry, used to replace interim output in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

#[derive(Debug, Clone)]
struct Slot {
    id: EntryId,
    entry: HistoryEntry,
    banner: bool,
}

/// Scrollback bounded by [`History::max_lines`].
#[derive(Debug, Clone)]
pub struct History {
    slots: VecDeque<Slot>,
    max_lines: usize,
    total_lines: usize,
    next_id: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY_LINES)
    }
}

impl History {
    /// Create an empty history. A cap of zero is raised to one.
    #[must_use]
    pub fn new(max_lines: usize) -> Self {
        Self {
            slots: VecDeque::new(),
            max_lines: max_lines.max(1),
            total_lines: 0,
            next_id: 0,
        }
    }

    #[must_use]
    pub const fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Displayed lines currently held.
    #[must_use]
    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Append an entry, evicting the oldest entries as needed.
    pub fn push(&mut self, entry: HistoryEntry) -> EntryId {
        self.push_slot(entry, false)
    }

    /// Append a welcome-banner entry. Banners are never persisted.
    pub fn push_banner(&mut self, entry: HistoryEntry) -> EntryId {
        self.push_slot(entry, true)
    }

    fn push_slot(&mut self, mut entry: HistoryEntry, banner: bool) -> EntryId {
        entry.clip_to(self.max_lines);
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.total_lines += entry.line_count();
        self.slots.push_back(Slot { id, entry, banner });
        self.evict();
        id
    }

    /// Swap the entry behind `id`. Returns `false` if it was already evicted.
    pub fn replace(&mut self, id: EntryId, mut entry: HistoryEntry) -> bool {
        entry.clip_to(self.max_lines);
        let Some(slot) = self.slots.iter_mut().find(|slot| slot.id == id) else {
            return false;
        };
        self.total_lines = self.total_lines - slot.entry.line_count() + entry.line_count();
        slot.entry = entry;
        self.evict();
        true
    }

    fn evict(&mut self) {
        while self.total_lines > self.max_lines {
            let Some(oldest) = self.slots.pop_front() else {
                break;
            };
            self.total_lines -= oldest.entry.line_count();
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.total_lines = 0;
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.slots.iter().map(|slot| &slot.entry)
    }

    /// Entries with their handles, oldest first.
    pub fn records(&self) -> impl Iterator<Item = (EntryId, &HistoryEntry)> {
        self.slots.iter().map(|slot| (slot.id, &slot.entry))
    }

    /// Everything except banner entries, oldest first.
    #[must_use]
    pub fn entries_without_banner(&self) -> Vec<HistoryEntry> {
        self.slots
            .iter()
            .filter(|slot| !slot.banner)
            .map(|slot| slot.entry.clone())
            .collect()
    }

    /// Replace the non-banner entries with `entries`, keeping the banner first.
    ///
    /// Only the newest whole entries that fit beside the banner are kept, so
    /// a restore never evicts the banner.
    pub fn restore(&mut self, entries: impl IntoIterator<Item = HistoryEntry>) {
        self.slots.retain(|slot| slot.banner);
        self.total_lines = self.slots.iter().map(|s| s.entry.line_count()).sum();

        let budget = self.max_lines.saturating_sub(self.total_lines);
        let mut entries: Vec<HistoryEntry> = entries.into_iter().collect();
        let mut kept_lines = 0;
        let keep = entries
            .iter()
            .rev()
            .take_while(|entry| {
                kept_lines += entry.line_count();
                kept_lines <= budget
            })
            .count();
        let dropped = entries.len() - keep;
        if dropped > 0 {
            tracing::debug!(dropped, budget, "restored history trimmed to fit beside banner");
        }
        for entry in entries.drain(dropped..) {
            self.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cmd(text: &str) -> HistoryEntry {
        HistoryEntry::Command {
            text: text.into(),
            is_root: false,
            accepted: false,
            path: "/".into(),
        }
    }

    #[test]
    fn restore_at_cap_keeps_banner() {
        let mut h = History::new(6);
        h.push_banner(HistoryEntry::lines(["Welcome", ""]));
        let saved: Vec<_> = (0..6).map(|i| cmd(&format!("echo {i}"))).collect();
        h.restore(saved);
        assert_eq!(h.total_lines(), 6);
        assert_eq!(h.iter().next(), Some(&HistoryEntry::lines(["Welcome", ""])));
        assert_eq!(h.entries_without_banner().first(), Some(&cmd("echo 2")));
        assert_eq!(h.entries_without_banner().last(), Some(&cmd("echo 5")));
    }

    #[test]
    fn counts_displayed_lines() {
        let mut h = History::new(10);
        h.push(cmd("ls"));
        h.push(HistoryEntry::lines(["/", "/about", "/blog"]));
        assert_eq!(h.len(), 2);
        assert_eq!(h.total_lines(), 4);
    }

    #[test]
    fn evicts_whole_oldest_entries() {
        let mut h = History::new(5);
        h.push(HistoryEntry::lines(["a", "b", "c"]));
        h.push(cmd("x"));
        h.push(HistoryEntry::lines(["d", "e"]));
        // 3 + 1 + 2 = 6 > 5: the three-line entry goes as a unit.
        assert_eq!(h.total_lines(), 3);
        assert_eq!(h.iter().next(), Some(&cmd("x")));
    }

    #[test]
    fn oversize_output_keeps_its_tail() {
        let mut h = History::new(3);
        h.push(cmd("dump"));
        h.push(HistoryEntry::lines(["1", "2", "3", "4", "5"]));
        assert_eq!(h.total_lines(), 3);
        assert_eq!(
            h.iter().collect::<Vec<_>>(),
            vec![&HistoryEntry::lines(["3", "4", "5"])]
        );
    }

    #[test]
    fn replace_updates_line_total() {
        let mut h = History::new(10);
        let id = h.push(HistoryEntry::line("Checking…"));
        assert!(h.replace(id, HistoryEntry::lines(["a", "b"])));
        assert_eq!(h.total_lines(), 2);
    }

    #[test]
    fn replace_after_eviction_reports_missing() {
        let mut h = History::new(2);
        let id = h.push(HistoryEntry::line("Checking…"));
        h.push(cmd("a"));
        h.push(cmd("b"));
        assert!(!h.replace(id, HistoryEntry::line("late")));
    }

    #[test]
    fn banner_survives_restore_and_is_not_persisted() {
        let mut h = History::new(50);
        h.push_banner(HistoryEntry::line("Welcome"));
        h.push(cmd("old"));
        h.restore(vec![cmd("saved"), HistoryEntry::line("out")]);

        let all: Vec<_> = h.iter().cloned().collect();
        assert_eq!(
            all,
            vec![
                HistoryEntry::line("Welcome"),
                cmd("saved"),
                HistoryEntry::line("out"),
            ]
        );
        assert_eq!(
            h.entries_without_banner(),
            vec![cmd("saved"), HistoryEntry::line("out")]
        );
    }

    #[test]
    fn entries_serialize_with_type_tag() {
        let json = serde_json::to_value(HistoryEntry::error(&ShellError::AuthFailure)).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["kind"], "auth_failure");
    }
}
