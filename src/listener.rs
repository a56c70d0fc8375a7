use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::event_name::EventName;

type Callback = dyn Fn(&Context, &[Value]) -> Result<(), ListenerError> + Send + Sync;

/// What a listener sees of the emission that invoked it.
#[derive(Clone, Debug)]
pub struct Context {
    /// The name that was emitted, not the key the listener was registered under.
    pub event: EventName,
    /// The listener being added or removed, set only for `newListener`
    /// and `removeListener` notifications.
    pub listener: Option<Listener>,
}

impl Context {
    pub(crate) fn new(event: EventName, listener: Option<Listener>) -> Self {
        Context { event, listener }
    }
}

/// A registered callback.
///
/// Listeners compare by handle identity: clones of one `Listener` are the
/// same listener, two `Listener::new` calls over equal closures are not.
#[derive(Clone)]
pub struct Listener {
    callback: Arc<Callback>,
}

impl Listener {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Context, &[Value]) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        Listener {
            callback: Arc::new(callback),
        }
    }

    /// Wrap a callback that cannot fail.
    pub fn infallible<F>(callback: F) -> Self
    where
        F: Fn(&Context, &[Value]) + Send + Sync + 'static,
    {
        Listener::new(move |ctx, args| {
            callback(ctx, args);
            Ok(())
        })
    }

    pub fn call(&self, ctx: &Context, args: &[Value]) -> Result<(), ListenerError> {
        (self.callback)(ctx, args)
    }

    pub fn same(&self, other: &Listener) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.callback), Arc::as_ptr(&other.callback))
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Arc::as_ptr(&self.callback) as *const ())
    }
}

/// Failure reported by a listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerError {
    message: String,
}

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        ListenerError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ListenerError {}

impl From<&str> for ListenerError {
    fn from(message: &str) -> Self {
        ListenerError::new(message)
    }
}

impl From<String> for ListenerError {
    fn from(message: String) -> Self {
        ListenerError::new(message)
    }
}

/// A listener as stored in a bucket.
///
/// A once entry keeps the caller's listener as its back-reference, so it is
/// found and removed by the original handle, and shares a fired flag between
/// every snapshot that holds it.
#[derive(Clone, Debug)]
pub(crate) struct Entry {
    listener: Listener,
    fired: Option<Arc<AtomicBool>>,
}

impl Entry {
    pub(crate) fn persistent(listener: Listener) -> Self {
        Entry {
            listener,
            fired: None,
        }
    }

    pub(crate) fn once(listener: Listener) -> Self {
        Entry {
            listener,
            fired: Some(Arc::new(AtomicBool::new(false))),
        }
    }

    pub(crate) fn listener(&self) -> &Listener {
        &self.listener
    }

    pub(crate) fn is_once(&self) -> bool {
        self.fired.is_some()
    }

    pub(crate) fn wraps(&self, listener: &Listener) -> bool {
        self.listener.same(listener)
    }

    /// Identity of this registration, distinct from the listener it wraps.
    pub(crate) fn is(&self, other: &Entry) -> bool {
        match (&self.fired, &other.fired) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => self.listener.same(&other.listener),
            _ => false,
        }
    }

    /// Returns false once a once-entry has already been claimed.
    pub(crate) fn claim(&self) -> bool {
        match &self.fired {
            None => true,
            Some(fired) => !fired.swap(true, Ordering::AcqRel),
        }
    }
}
