//! # History
//!
//! Snapshot timeline behind undo, redo and "restore to point".
//!
//! ## Design
//!
//! - Every committed edit pushes a full project snapshot with a label
//! - Snapshots share untouched slides with their neighbours (`Arc<Slide>`),
//!   so a push costs one `Vec` of pointers plus the edited slide
//! - Pushing while the cursor is behind the end drops the redo future
//! - Restoring only moves the cursor; the next push does the truncation
//! - At most [`MAX_HISTORY`] entries are kept, oldest evicted first
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new();
//! history.push(project.clone(), "Add Slide");
//!
//! if let Some(previous) = history.undo() {
//!     project = previous.clone();
//! }
//! ```

use std::collections::VecDeque;

use arnika_model::Project;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Maximum number of snapshots kept
pub const MAX_HISTORY: usize = 30;

/// One point of the timeline, stored as `{timestamp, project, action}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub project: Project,
    pub action: String,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,

    /// Index of the entry matching the live project, `None` when empty
    cursor: Option<usize>,

    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    /// Timeline with a custom ceiling (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            capacity: capacity.max(1),
        }
    }

    /// Rebuild from stored entries. The cursor lands on the last entry.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self::from_entries_at(entries, None)
    }

    /// Rebuild from stored entries with a stored cursor. A missing or
    /// out-of-range cursor lands on the last entry.
    pub fn from_entries_at(entries: Vec<HistoryEntry>, cursor: Option<usize>) -> Self {
        let mut history = Self::new();
        history.entries = entries.into();
        let len = history.entries.len();
        history.cursor = cursor.filter(|&c| c < len).or(len.checked_sub(1));
        while history.entries.len() > history.capacity {
            history.entries.pop_front();
            history.cursor = history.cursor.map(|c| c.saturating_sub(1));
        }
        history
    }

    /// Record a snapshot taken now
    pub fn push(&mut self, project: Project, action: impl Into<String>) {
        self.push_at(project, action, Utc::now().timestamp_millis());
    }

    /// Record a snapshot with an explicit timestamp
    pub fn push_at(&mut self, project: Project, action: impl Into<String>, timestamp: i64) {
        // New action invalidates the redo future
        match self.cursor {
            Some(cursor) => self.entries.truncate(cursor + 1),
            None => self.entries.clear(),
        }

        self.entries.push_back(HistoryEntry {
            timestamp,
            project,
            action: action.into(),
        });

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }

        self.cursor = Some(self.entries.len() - 1);
    }

    /// Move the cursor to `index` and return that snapshot. Out of range is a
    /// no-op returning `None`. Later entries are kept.
    pub fn restore(&mut self, index: usize) -> Option<&Project> {
        let entry = self.entries.get(index)?;
        self.cursor = Some(index);
        Some(&entry.project)
    }

    pub fn undo(&mut self) -> Option<&Project> {
        let target = self.cursor?.checked_sub(1)?;
        self.restore(target)
    }

    pub fn redo(&mut self) -> Option<&Project> {
        let target = self.cursor? + 1;
        self.restore(target)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn entries(&self) -> &VecDeque<HistoryEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store;
    use arnika_model::{template, Template};

    fn titled(title: &str) -> Project {
        store::update_slide_title(&template(Template::Portfolio), "s1", title)
    }

    fn entry(title: &str) -> HistoryEntry {
        HistoryEntry {
            timestamp: 0,
            project: titled(title),
            action: title.to_string(),
        }
    }

    #[test]
    fn test_basic_undo_redo() {
        let mut history = History::new();
        assert!(!history.can_undo());
        assert_eq!(history.cursor(), None);

        history.push(titled("a"), "A");
        history.push(titled("b"), "B");

        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo().unwrap().slides[0].title, "a");
        assert!(history.undo().is_none());
        assert_eq!(history.redo().unwrap().slides[0].title, "b");
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new();
        for i in 0..35 {
            history.push_at(titled(&i.to_string()), format!("edit {}", i), i);
        }

        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.cursor(), Some(MAX_HISTORY - 1));
        assert_eq!(history.entries()[0].action, "edit 5");
        assert_eq!(history.current().unwrap().action, "edit 34");

        let stamps: Vec<i64> = history.entries().iter().map(|e| e.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_restore_then_push_truncates() {
        let mut history = History::new();
        for label in ["a", "b", "c", "d"] {
            history.push(titled(label), label);
        }

        assert_eq!(history.restore(1).unwrap().slides[0].title, "b");
        assert_eq!(history.len(), 4, "restore must not truncate");
        assert!(history.can_redo());

        history.push(titled("e"), "e");
        let actions: Vec<&str> = history.entries().iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["a", "b", "e"]);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_restore_out_of_range() {
        let mut history = History::new();
        history.push(titled("a"), "a");
        assert!(history.restore(3).is_none());
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn test_from_entries_cursor_on_last() {
        let entries: Vec<HistoryEntry> = (0..3)
            .map(|i| HistoryEntry {
                timestamp: i,
                project: titled("x"),
                action: format!("{}", i),
            })
            .collect();

        let history = History::from_entries(entries);
        assert_eq!(history.cursor(), Some(2));
        assert!(History::from_entries(Vec::new()).cursor().is_none());
    }

    #[test]
    fn test_from_entries_at_keeps_stored_cursor() {
        let entries = vec![
            entry("a"),
            entry("b"),
            entry("a"),
        ];

        let history = History::from_entries_at(entries.clone(), Some(0));
        assert_eq!(history.cursor(), Some(0));
        assert!(!history.can_undo());
        assert!(history.can_redo());

        let history = History::from_entries_at(entries.clone(), Some(7));
        assert_eq!(history.cursor(), Some(2));

        let history = History::from_entries_at(entries, None);
        assert_eq!(history.cursor(), Some(2));

        let history = History::from_entries_at(Vec::new(), Some(0));
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn test_entry_wire_format() {
        let entry = HistoryEntry {
            timestamp: 1_700_000_000_000,
            project: titled("x"),
            action: "Rename Slide".into(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.starts_with(r#"{"timestamp":1700000000000,"project":"#));
        assert!(json.contains(r#""action":"Rename Slide""#));
    }
}
