use regex::Regex;

use crate::bucket::Bucket;
use crate::error::EmitterError;
use crate::listener::{Entry, Listener};

/// Compile a pattern source, mapping failure to a contract error.
pub(crate) fn compile(source: &str) -> Result<Regex, EmitterError> {
    Regex::new(source).map_err(|e| EmitterError::InvalidPattern {
        source: source.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Debug)]
struct PatternBucket {
    regex: Regex,
    bucket: Bucket,
}

/// Pattern listener buckets keyed by pattern source, in registration order.
///
/// Each compiled pattern lives beside its listeners, so a pattern is
/// compiled-and-indexed exactly while it has at least one listener.
#[derive(Debug, Default)]
pub(crate) struct PatternIndex {
    buckets: Vec<PatternBucket>,
}

impl PatternIndex {
    fn position(&self, source: &str) -> Option<usize> {
        self.buckets.iter().position(|b| b.regex.as_str() == source)
    }

    /// The already-compiled pattern for `source`, if it has listeners.
    pub(crate) fn compiled(&self, source: &str) -> Option<&Regex> {
        self.position(source).map(|i| &self.buckets[i].regex)
    }

    pub(crate) fn register(&mut self, regex: &Regex, entry: Entry) -> &mut Bucket {
        let index = match self.position(regex.as_str()) {
            Some(index) => index,
            None => {
                self.buckets.push(PatternBucket {
                    regex: regex.clone(),
                    bucket: Bucket::default(),
                });
                self.buckets.len() - 1
            }
        };
        let bucket = &mut self.buckets[index].bucket;
        bucket.push(entry);
        bucket
    }

    pub(crate) fn unregister(&mut self, source: &str, listener: &Listener) -> Option<Entry> {
        let index = self.position(source)?;
        let removed = self.buckets[index].bucket.remove(listener);
        self.prune(index);
        removed
    }

    pub(crate) fn unregister_entry(&mut self, source: &str, entry: &Entry) -> bool {
        let Some(index) = self.position(source) else {
            return false;
        };
        let removed = self.buckets[index].bucket.remove_entry(entry);
        self.prune(index);
        removed
    }

    pub(crate) fn remove_all(&mut self, source: &str) -> Vec<Entry> {
        match self.position(source) {
            Some(index) => self.buckets.remove(index).bucket.into_entries(),
            None => Vec::new(),
        }
    }

    fn prune(&mut self, index: usize) {
        if self.buckets[index].bucket.is_empty() {
            self.buckets.remove(index);
        }
    }

    pub(crate) fn bucket(&self, source: &str) -> &[Entry] {
        self.position(source)
            .map(|i| self.buckets[i].bucket.entries())
            .unwrap_or(&[])
    }

    pub(crate) fn count_for(&self, source: &str) -> usize {
        self.position(source)
            .map_or(0, |i| self.buckets[i].bucket.len())
    }

    /// Every pattern matching `name`, with its entries, in registration order.
    pub(crate) fn matching<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (&'a Regex, &'a [Entry])> + 'a {
        self.buckets
            .iter()
            .filter(move |b| b.regex.is_match(name))
            .map(|b| (&b.regex, b.bucket.entries()))
    }

    pub(crate) fn patterns(&self) -> impl Iterator<Item = &Regex> {
        self.buckets.iter().map(|b| &b.regex)
    }
}
