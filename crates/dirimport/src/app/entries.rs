//! The ordered, editable list of directory rows.

use tracing::debug;

use crate::domain::model::{DirectoryEntry, EntryId};

/// Tracks the directory rows shown by the form, in display order.
///
/// Row ids are never reused, so a stale id can not remove a row created later.
#[derive(Debug, Clone)]
pub struct DirectoryEntryList {
    entries: Vec<DirectoryEntry>,
    next_id: u64,
}

impl Default for DirectoryEntryList {
    fn default() -> Self {
        Self::with_rows(1)
    }
}

impl DirectoryEntryList {
    /// Create a list holding the single default empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list with `count` empty rows.
    pub fn with_rows(count: usize) -> Self {
        let mut list = Self {
            entries: Vec::with_capacity(count),
            next_id: 0,
        };
        for _ in 0..count {
            list.add_row();
        }
        list
    }

    /// Create a list with one row per value. Falls back to one empty row when
    /// `values` is empty so the form always opens with something to type into.
    pub fn with_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::with_rows(0);
        for value in values {
            let id = list.add_row();
            list.set_value(id, value);
        }
        if list.is_empty() {
            list.add_row();
        }
        list
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut DirectoryEntry> {
        self.entries.iter_mut().find(|entry| entry.id() == id)
    }

    /// Display position of the row with the given id.
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }

    pub fn first_id(&self) -> Option<EntryId> {
        self.entries.first().map(DirectoryEntry::id)
    }

    pub fn id_at(&self, index: usize) -> Option<EntryId> {
        self.entries.get(index).map(DirectoryEntry::id)
    }

    /// Append an empty row after the existing ones and return its id.
    pub fn add_row(&mut self) -> EntryId {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;
        self.entries.push(DirectoryEntry::new(id));
        debug!(row = id.get(), rows = self.entries.len(), "added directory row");
        id
    }

    /// Remove exactly the row with `id`. Returns `false` when it is already gone.
    pub fn remove_row(&mut self, id: EntryId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.entries.remove(index);
                debug!(row = id.get(), rows = self.entries.len(), "removed directory row");
                true
            }
            None => false,
        }
    }

    /// Replace the value of a row. Returns `false` when the row does not exist.
    pub fn set_value<S: Into<String>>(&mut self, id: EntryId, value: S) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.set_path(value);
                true
            }
            None => false,
        }
    }

    /// Current raw values of every row, in display order.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.path().to_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_empty_row() {
        let list = DirectoryEntryList::new();
        assert_eq!(list.len(), 1);
        assert_eq!(list.snapshot(), vec![String::new()]);
    }

    #[test]
    fn added_rows_are_independent_and_removable() {
        let mut list = DirectoryEntryList::new();
        let original = list.first_id().unwrap();
        let second = list.add_row();
        let third = list.add_row();
        assert_eq!(list.len(), 3);

        list.set_value(second, "/srv/second");
        assert_eq!(list.snapshot(), vec!["", "/srv/second", ""]);

        assert!(list.remove_row(original));
        assert!(list.remove_row(third));
        assert_eq!(list.snapshot(), vec!["/srv/second"]);

        assert!(list.remove_row(second));
        assert!(list.is_empty());
    }

    #[test]
    fn removing_twice_is_a_no_op() {
        let mut list = DirectoryEntryList::new();
        let id = list.add_row();
        assert!(list.remove_row(id));
        assert!(!list.remove_row(id));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut list = DirectoryEntryList::with_rows(0);
        let first = list.add_row();
        list.remove_row(first);
        let second = list.add_row();
        assert_ne!(first, second);
        assert!(!list.remove_row(first));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn row_count_tracks_adds_and_successful_removes() {
        let mut list = DirectoryEntryList::new();
        let mut expected: i64 = 1;
        let mut ids = vec![list.first_id().unwrap()];

        // Deterministic interleaving of adds and removes, including removals
        // of rows that are already gone.
        for step in 0..40u64 {
            if step % 3 == 2 {
                let target = ids[(step as usize * 7) % ids.len()];
                if list.remove_row(target) {
                    expected -= 1;
                }
            } else {
                ids.push(list.add_row());
                expected += 1;
            }
            assert!(expected >= 0);
            assert_eq!(list.len() as i64, expected);
        }
    }

    #[test]
    fn snapshot_follows_display_order_and_is_idempotent() {
        let mut list = DirectoryEntryList::with_values(["a", "b", "c"]);
        let b = list.id_at(1).unwrap();
        list.remove_row(b);
        let d = list.add_row();
        list.set_value(d, "d");

        let first = list.snapshot();
        let second = list.snapshot();
        assert_eq!(first, vec!["a", "c", "d"]);
        assert_eq!(first, second);
    }

    #[test]
    fn snapshot_keeps_values_untrimmed() {
        let list = DirectoryEntryList::with_values([" /x/y ", "\t"]);
        assert_eq!(list.snapshot(), vec![" /x/y ", "\t"]);
    }

    #[test]
    fn with_values_falls_back_to_a_single_empty_row() {
        let list = DirectoryEntryList::with_values(Vec::<String>::new());
        assert_eq!(list.snapshot(), vec![String::new()]);
    }
}
