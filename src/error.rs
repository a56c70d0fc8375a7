use std::fmt;

use crate::listener::ListenerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitterError {
    /// A pattern source failed to compile. Nothing was registered.
    InvalidPattern { source: String, reason: String },
    /// A pattern-only operation was given a literal key.
    NotAPattern(String),
    LockPoisoned(&'static str),
    /// A listener failed and no `error` listener was registered to take it.
    Listener { event: String, error: ListenerError },
    /// `error` was emitted with nothing listening for it.
    Unhandled { event: String, error: String },
    InvalidConfig(String),
}

impl fmt::Display for EmitterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitterError::InvalidPattern { source, reason } => {
                write!(f, "invalid pattern {:?}: {}", source, reason)
            }
            EmitterError::NotAPattern(key) => {
                write!(f, "expected a pattern subscription, got literal {}", key)
            }
            EmitterError::LockPoisoned(operation) => {
                write!(f, "emitter registry lock poisoned during {}", operation)
            }
            EmitterError::Listener { event, error } => {
                write!(f, "listener for {} failed: {}", event, error)
            }
            EmitterError::Unhandled { event, error } => {
                write!(f, "unhandled {} event: {}", event, error)
            }
            EmitterError::InvalidConfig(reason) => write!(f, "invalid emitter config: {}", reason),
        }
    }
}

impl std::error::Error for EmitterError {}
