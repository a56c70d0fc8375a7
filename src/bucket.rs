use crate::listener::{Entry, Listener};

/// Ordered listener entries registered under one key.
#[derive(Clone, Debug, Default)]
pub(crate) struct Bucket {
    entries: Vec<Entry>,
    warned: bool,
}

impl Bucket {
    pub(crate) fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Remove the first entry wrapping `listener`.
    pub(crate) fn remove(&mut self, listener: &Listener) -> Option<Entry> {
        let position = self.entries.iter().position(|e| e.wraps(listener))?;
        Some(self.entries.remove(position))
    }

    pub(crate) fn remove_entry(&mut self, entry: &Entry) -> bool {
        match self.entries.iter().position(|e| e.is(entry)) {
            Some(position) => {
                self.entries.remove(position);
                true
            }
            None => false,
        }
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True the first time this bucket grows past `max`. A `max` of 0 never warns.
    pub(crate) fn take_warning(&mut self, max: usize) -> bool {
        if max == 0 || self.warned || self.entries.len() <= max {
            return false;
        }
        self.warned = true;
        true
    }
}
