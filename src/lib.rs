//! Synchronous event emitter with regular-expression subscriptions.
//!
//! Listeners register against an exact event name or a compiled pattern.
//! Emitting a name invokes the literal listeners for that name followed by
//! the listeners of every pattern that matches it.

mod bucket;
mod config;
mod dispatch;
mod emitter;
mod error;
mod event_name;
mod listener;
mod literal;
mod pattern;
mod registry;
mod subscription;

pub use config::{EmitterConfig, DEFAULT_MAX_LISTENERS};
pub use emitter::PatternEmitter;
pub use error::EmitterError;
pub use event_name::{EventName, Symbol, ERROR, NEW_LISTENER, REMOVE_LISTENER};
pub use listener::{Context, Listener, ListenerError};
pub use subscription::Subscription;

// Re-export the regex and JSON types that appear in the public API
pub use regex::Regex;
pub use serde_json::Value;
