use std::fmt;

use regex::Regex;
use serde_json::Value;

use crate::error::EmitterError;
use crate::event_name::{EventName, Symbol};
use crate::pattern;

/// The key a listener is registered under.
///
/// Literal and pattern keys live in separate namespaces: the literal name
/// `"^a"` and the pattern `^a` are different subscriptions.
#[derive(Clone, Debug)]
pub enum Subscription {
    Literal(EventName),
    Pattern(Regex),
}

impl Subscription {
    /// Compile `source` into a pattern subscription.
    pub fn pattern(source: &str) -> Result<Self, EmitterError> {
        pattern::compile(source).map(Subscription::Pattern)
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, Subscription::Pattern(_))
    }

    /// Key as passed to `newListener`/`removeListener` listeners.
    pub(crate) fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl PartialEq for Subscription {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Subscription::Literal(a), Subscription::Literal(b)) => a == b,
            (Subscription::Pattern(a), Subscription::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for Subscription {}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subscription::Literal(name) => name.fmt(f),
            Subscription::Pattern(regex) => f.write_str(regex.as_str()),
        }
    }
}

impl From<EventName> for Subscription {
    fn from(name: EventName) -> Self {
        Subscription::Literal(name)
    }
}

impl From<&EventName> for Subscription {
    fn from(name: &EventName) -> Self {
        Subscription::Literal(name.clone())
    }
}

impl From<&str> for Subscription {
    fn from(name: &str) -> Self {
        Subscription::Literal(name.into())
    }
}

impl From<String> for Subscription {
    fn from(name: String) -> Self {
        Subscription::Literal(name.into())
    }
}

impl From<Symbol> for Subscription {
    fn from(symbol: Symbol) -> Self {
        Subscription::Literal(symbol.into())
    }
}

impl From<&Symbol> for Subscription {
    fn from(symbol: &Symbol) -> Self {
        Subscription::Literal(symbol.into())
    }
}

impl From<Regex> for Subscription {
    fn from(regex: Regex) -> Self {
        Subscription::Pattern(regex)
    }
}

impl From<&Regex> for Subscription {
    fn from(regex: &Regex) -> Self {
        Subscription::Pattern(regex.clone())
    }
}
