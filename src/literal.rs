use std::collections::HashMap;

use crate::bucket::Bucket;
use crate::event_name::EventName;
use crate::listener::{Entry, Listener};

/// Exact-name listener buckets.
///
/// Empty buckets are never kept: removing the last entry deletes the name.
#[derive(Debug, Default)]
pub(crate) struct LiteralIndex {
    buckets: HashMap<EventName, Bucket>,
}

impl LiteralIndex {
    pub(crate) fn register(&mut self, name: EventName, entry: Entry) -> &mut Bucket {
        let bucket = self.buckets.entry(name).or_default();
        bucket.push(entry);
        bucket
    }

    pub(crate) fn unregister(&mut self, name: &EventName, listener: &Listener) -> Option<Entry> {
        let bucket = self.buckets.get_mut(name)?;
        let removed = bucket.remove(listener);
        if bucket.is_empty() {
            self.buckets.remove(name);
        }
        removed
    }

    pub(crate) fn unregister_entry(&mut self, name: &EventName, entry: &Entry) -> bool {
        let Some(bucket) = self.buckets.get_mut(name) else {
            return false;
        };
        let removed = bucket.remove_entry(entry);
        if bucket.is_empty() {
            self.buckets.remove(name);
        }
        removed
    }

    pub(crate) fn remove_all(&mut self, name: &EventName) -> Vec<Entry> {
        self.buckets
            .remove(name)
            .map(Bucket::into_entries)
            .unwrap_or_default()
    }

    pub(crate) fn bucket(&self, name: &EventName) -> &[Entry] {
        self.buckets.get(name).map(Bucket::entries).unwrap_or(&[])
    }

    pub(crate) fn count_for(&self, name: &EventName) -> usize {
        self.buckets.get(name).map_or(0, Bucket::len)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &EventName> {
        self.buckets.keys()
    }
}
