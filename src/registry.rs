use tracing::warn;

use crate::event_name::EventName;
use crate::listener::{Entry, Listener};
use crate::literal::LiteralIndex;
use crate::pattern::PatternIndex;
use crate::subscription::Subscription;

/// One element of a matching sequence: an entry and the key it was found under.
#[derive(Clone, Debug)]
pub(crate) struct Matched {
    pub(crate) key: Subscription,
    pub(crate) entry: Entry,
}

/// Literal and pattern listener indices behind one lock.
#[derive(Debug)]
pub(crate) struct Registry {
    literals: LiteralIndex,
    patterns: PatternIndex,
    max_listeners: usize,
}

impl Registry {
    pub(crate) fn new(max_listeners: usize) -> Self {
        Registry {
            literals: LiteralIndex::default(),
            patterns: PatternIndex::default(),
            max_listeners,
        }
    }

    pub(crate) fn max_listeners(&self) -> usize {
        self.max_listeners
    }

    pub(crate) fn set_max_listeners(&mut self, max: usize) {
        self.max_listeners = max;
    }

    /// Append `entry` under `key` and return the bucket size.
    pub(crate) fn add(&mut self, key: &Subscription, entry: Entry) -> usize {
        let max = self.max_listeners;
        let bucket = match key {
            Subscription::Literal(name) => self.literals.register(name.clone(), entry),
            Subscription::Pattern(regex) => self.patterns.register(regex, entry),
        };
        let count = bucket.len();
        if bucket.take_warning(max) {
            warn!(
                key = %key,
                count,
                max,
                "possible listener leak: more listeners than the configured maximum"
            );
        }
        count
    }

    pub(crate) fn remove(&mut self, key: &Subscription, listener: &Listener) -> Option<Entry> {
        match key {
            Subscription::Literal(name) => self.literals.unregister(name, listener),
            Subscription::Pattern(regex) => self.patterns.unregister(regex.as_str(), listener),
        }
    }

    pub(crate) fn remove_entry(&mut self, key: &Subscription, entry: &Entry) -> bool {
        match key {
            Subscription::Literal(name) => self.literals.unregister_entry(name, entry),
            Subscription::Pattern(regex) => self.patterns.unregister_entry(regex.as_str(), entry),
        }
    }

    pub(crate) fn remove_all(&mut self, key: &Subscription) -> Vec<Entry> {
        match key {
            Subscription::Literal(name) => self.literals.remove_all(name),
            Subscription::Pattern(regex) => self.patterns.remove_all(regex.as_str()),
        }
    }

    /// The exact bucket for `key`, with no pattern matching.
    pub(crate) fn listeners_for(&self, key: &Subscription) -> &[Entry] {
        match key {
            Subscription::Literal(name) => self.literals.bucket(name),
            Subscription::Pattern(regex) => self.patterns.bucket(regex.as_str()),
        }
    }

    pub(crate) fn count_for(&self, key: &Subscription) -> usize {
        match key {
            Subscription::Literal(name) => self.literals.count_for(name),
            Subscription::Pattern(regex) => self.patterns.count_for(regex.as_str()),
        }
    }

    pub(crate) fn compiled(&self, source: &str) -> Option<Subscription> {
        self.patterns
            .compiled(source)
            .map(|regex| Subscription::Pattern(regex.clone()))
    }

    /// The matching sequence for `name`: the literal bucket, then the bucket
    /// of every pattern that matches, patterns in registration order.
    ///
    /// Non-text names never consult the pattern index.
    pub(crate) fn matching(&self, name: &EventName) -> Vec<Matched> {
        let literal = Subscription::Literal(name.clone());
        let mut matched: Vec<Matched> = self
            .literals
            .bucket(name)
            .iter()
            .map(|entry| Matched {
                key: literal.clone(),
                entry: entry.clone(),
            })
            .collect();

        if let Some(text) = name.as_text() {
            for (regex, entries) in self.patterns.matching(text) {
                matched.extend(entries.iter().map(|entry| Matched {
                    key: Subscription::Pattern(regex.clone()),
                    entry: entry.clone(),
                }));
            }
        }
        matched
    }

    /// Every key with at least one listener: literals first, then patterns
    /// in registration order.
    pub(crate) fn subscriptions(&self) -> Vec<Subscription> {
        self.literals
            .names()
            .cloned()
            .map(Subscription::Literal)
            .chain(self.patterns.patterns().cloned().map(Subscription::Pattern))
            .collect()
    }
}
