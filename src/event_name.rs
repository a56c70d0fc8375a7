use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Lifecycle event emitted before a listener becomes active.
pub const NEW_LISTENER: &str = "newListener";
/// Lifecycle event emitted when a listener is removed.
pub const REMOVE_LISTENER: &str = "removeListener";
/// Reserved event that receives listener failures.
pub const ERROR: &str = "error";

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// A unique, non-textual event identifier.
///
/// Two symbols are equal only if one is a clone of the other; the
/// description is for display and never participates in equality.
#[derive(Clone, Debug)]
pub struct Symbol {
    id: u64,
    description: Arc<str>,
}

impl Symbol {
    pub fn new(description: impl Into<String>) -> Self {
        Symbol {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description: Arc::from(description.into()),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}

/// The name an event is emitted under.
///
/// Only `Text` names are tested against pattern subscriptions. `Symbol`
/// names reach literal listeners only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventName {
    Text(String),
    Symbol(Symbol),
}

impl EventName {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            EventName::Text(text) => Some(text),
            EventName::Symbol(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, EventName::Text(_))
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventName::Text(text) => f.write_str(text),
            EventName::Symbol(symbol) => symbol.fmt(f),
        }
    }
}

impl PartialEq<str> for EventName {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for EventName {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl From<&str> for EventName {
    fn from(text: &str) -> Self {
        EventName::Text(text.to_string())
    }
}

impl From<String> for EventName {
    fn from(text: String) -> Self {
        EventName::Text(text)
    }
}

impl From<&String> for EventName {
    fn from(text: &String) -> Self {
        EventName::Text(text.clone())
    }
}

impl From<Symbol> for EventName {
    fn from(symbol: Symbol) -> Self {
        EventName::Symbol(symbol)
    }
}

impl From<&Symbol> for EventName {
    fn from(symbol: &Symbol) -> Self {
        EventName::Symbol(symbol.clone())
    }
}
