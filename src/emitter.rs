use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::{debug, trace};

use crate::config::EmitterConfig;
use crate::dispatch::{self, CurrentEvents};
use crate::error::EmitterError;
use crate::event_name::{EventName, ERROR, NEW_LISTENER, REMOVE_LISTENER};
use crate::listener::{Context, Entry, Listener};
use crate::registry::{Matched, Registry};
use crate::subscription::Subscription;

/// Event emitter with literal and regular-expression subscriptions.
///
/// An emitted name reaches every listener registered under exactly that
/// name, then every listener of every pattern matching it, patterns in the
/// order they were first registered. Delivery is synchronous on the calling
/// thread.
///
/// The emitter is a cheap handle: clones share one registry, and a listener
/// may capture a clone to emit, subscribe or unsubscribe from inside its own
/// invocation. No lock is held while listeners run; each emission iterates a
/// snapshot of its matching sequence taken before the first listener is
/// called.
///
/// # Example
///
/// ```
/// use regex::Regex;
/// use regex_emitter::{Listener, PatternEmitter};
/// use serde_json::json;
///
/// let emitter = PatternEmitter::new();
/// emitter
///     .on(Regex::new("^order\\.").unwrap(), Listener::infallible(|ctx, args| {
///         println!("{} {:?}", ctx.event, args);
///     }))
///     .unwrap();
///
/// assert!(emitter.emit("order.created", &[json!({"id": 7})]).unwrap());
/// assert!(!emitter.emit("user.created", &[]).unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct PatternEmitter {
    registry: Arc<RwLock<Registry>>,
    current: Arc<CurrentEvents>,
}

impl Default for PatternEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternEmitter {
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        PatternEmitter {
            registry: Arc::new(RwLock::new(Registry::new(config.max_listeners))),
            current: Arc::new(CurrentEvents::default()),
        }
    }

    fn read(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, Registry>, EmitterError> {
        self.registry
            .read()
            .map_err(|_| EmitterError::LockPoisoned(operation))
    }

    fn write(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, Registry>, EmitterError> {
        self.registry
            .write()
            .map_err(|_| EmitterError::LockPoisoned(operation))
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register `listener` under a literal name or a compiled pattern.
    ///
    /// `newListener` is emitted before the listener becomes active, so a
    /// `newListener` listener never observes its own registration.
    pub fn add_listener(
        &self,
        key: impl Into<Subscription>,
        listener: Listener,
    ) -> Result<&Self, EmitterError> {
        self.subscribe(key.into(), Entry::persistent(listener))
    }

    /// Alias for [`add_listener`](Self::add_listener).
    pub fn on(
        &self,
        key: impl Into<Subscription>,
        listener: Listener,
    ) -> Result<&Self, EmitterError> {
        self.add_listener(key, listener)
    }

    /// Register a listener that is removed before its first invocation runs.
    pub fn once(
        &self,
        key: impl Into<Subscription>,
        listener: Listener,
    ) -> Result<&Self, EmitterError> {
        self.subscribe(key.into(), Entry::once(listener))
    }

    /// Register `listener` under the pattern compiled from `source`.
    ///
    /// Fails with [`EmitterError::InvalidPattern`] before anything is
    /// registered or notified if `source` does not compile.
    pub fn add_pattern_listener(
        &self,
        source: &str,
        listener: Listener,
    ) -> Result<&Self, EmitterError> {
        let key = self.resolve_pattern(source)?;
        self.subscribe(key, Entry::persistent(listener))
    }

    /// Alias for [`add_pattern_listener`](Self::add_pattern_listener).
    pub fn on_pattern(&self, source: &str, listener: Listener) -> Result<&Self, EmitterError> {
        self.add_pattern_listener(source, listener)
    }

    pub fn once_on_pattern(&self, source: &str, listener: Listener) -> Result<&Self, EmitterError> {
        let key = self.resolve_pattern(source)?;
        self.subscribe(key, Entry::once(listener))
    }

    /// Reuse the compiled pattern for `source` when one is registered.
    fn resolve_pattern(&self, source: &str) -> Result<Subscription, EmitterError> {
        if let Some(key) = self.read("resolve_pattern")?.compiled(source) {
            return Ok(key);
        }
        Subscription::pattern(source)
    }

    fn subscribe(&self, key: Subscription, entry: Entry) -> Result<&Self, EmitterError> {
        self.notify(NEW_LISTENER, &key, entry.listener())?;
        let count = self.write("add_listener")?.add(&key, entry);
        debug!(key = %key, pattern = key.is_pattern(), count, "listener added");
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Remove the first registration of `listener` under `key`.
    ///
    /// Once-registrations are found by the listener originally passed in.
    /// Removing a listener that is not registered does nothing.
    pub fn remove_listener(
        &self,
        key: impl Into<Subscription>,
        listener: &Listener,
    ) -> Result<&Self, EmitterError> {
        self.unsubscribe(key.into(), listener)
    }

    /// Alias for [`remove_listener`](Self::remove_listener).
    pub fn off(
        &self,
        key: impl Into<Subscription>,
        listener: &Listener,
    ) -> Result<&Self, EmitterError> {
        self.remove_listener(key, listener)
    }

    pub fn remove_pattern_listener(
        &self,
        source: &str,
        listener: &Listener,
    ) -> Result<&Self, EmitterError> {
        let key = self.resolve_pattern(source)?;
        self.unsubscribe(key, listener)
    }

    fn unsubscribe(&self, key: Subscription, listener: &Listener) -> Result<&Self, EmitterError> {
        let (removed, count) = {
            let mut registry = self.write("remove_listener")?;
            let removed = registry.remove(&key, listener);
            (removed, registry.count_for(&key))
        };
        let Some(entry) = removed else {
            return Ok(self);
        };
        debug!(key = %key, pattern = key.is_pattern(), count, "listener removed");
        self.notify(REMOVE_LISTENER, &key, entry.listener())?;
        Ok(self)
    }

    /// Drop every listener registered under `key`, compiled pattern included.
    ///
    /// The bucket is detached first; `removeListener` is then emitted once
    /// per detached listener, in registration order.
    pub fn remove_all_listeners(
        &self,
        key: impl Into<Subscription>,
    ) -> Result<&Self, EmitterError> {
        let key = key.into();
        let removed = self.write("remove_all_listeners")?.remove_all(&key);
        if removed.is_empty() {
            return Ok(self);
        }
        debug!(key = %key, removed = removed.len(), "listeners cleared");
        for entry in &removed {
            self.notify(REMOVE_LISTENER, &key, entry.listener())?;
        }
        Ok(self)
    }

    pub fn remove_all_pattern_listeners(&self, source: &str) -> Result<&Self, EmitterError> {
        let key = self.resolve_pattern(source)?;
        self.remove_all_listeners(key)
    }

    /// Remove every subscription. Literal `removeListener` listeners go last
    /// so they observe every other removal.
    pub fn clear(&self) -> Result<&Self, EmitterError> {
        let lifecycle = Subscription::from(REMOVE_LISTENER);
        let keys = self.read("clear")?.subscriptions();
        for key in keys.into_iter().filter(|key| *key != lifecycle) {
            self.remove_all_listeners(key)?;
        }
        self.remove_all_listeners(lifecycle)
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Listeners registered under exactly `key`, without pattern matching.
    pub fn listeners(&self, key: impl Into<Subscription>) -> Result<Vec<Listener>, EmitterError> {
        let key = key.into();
        Ok(self
            .read("listeners")?
            .listeners_for(&key)
            .iter()
            .map(|entry| entry.listener().clone())
            .collect())
    }

    pub fn listener_count(&self, key: impl Into<Subscription>) -> Result<usize, EmitterError> {
        let key = key.into();
        Ok(self.read("listener_count")?.count_for(&key))
    }

    /// Listeners of a pattern subscription. Literal keys are rejected.
    pub fn pattern_listeners(
        &self,
        key: impl Into<Subscription>,
    ) -> Result<Vec<Listener>, EmitterError> {
        let key = require_pattern(key.into())?;
        self.listeners(key)
    }

    pub fn pattern_listener_count(
        &self,
        key: impl Into<Subscription>,
    ) -> Result<usize, EmitterError> {
        let key = require_pattern(key.into())?;
        self.listener_count(key)
    }

    /// The listeners `emit(name, ..)` would invoke, in invocation order.
    pub fn matching_listeners(
        &self,
        name: impl Into<EventName>,
    ) -> Result<Vec<Listener>, EmitterError> {
        let name = name.into();
        Ok(self
            .read("matching_listeners")?
            .matching(&name)
            .into_iter()
            .map(|m| m.entry.listener().clone())
            .collect())
    }

    pub fn matching_listener_count(
        &self,
        name: impl Into<EventName>,
    ) -> Result<usize, EmitterError> {
        let name = name.into();
        Ok(self.read("matching_listener_count")?.matching(&name).len())
    }

    /// Every key with at least one listener: literal names, then patterns
    /// in registration order.
    pub fn event_names(&self) -> Result<Vec<Subscription>, EmitterError> {
        Ok(self.read("event_names")?.subscriptions())
    }

    pub fn set_max_listeners(&self, max: usize) -> Result<&Self, EmitterError> {
        self.write("set_max_listeners")?.set_max_listeners(max);
        Ok(self)
    }

    pub fn max_listeners(&self) -> Result<usize, EmitterError> {
        Ok(self.read("max_listeners")?.max_listeners())
    }

    /// Name of the innermost emission the calling thread is dispatching, if any.
    pub fn current_event(&self) -> Option<EventName> {
        self.current.current()
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Invoke every listener matching `name` with `args`.
    ///
    /// Returns `Ok(false)` when nothing matched. A listener failure stops the
    /// remaining listeners; it is delivered to the `error` listeners when
    /// any are registered and returned as [`EmitterError::Listener`]
    /// otherwise. Emitting `error` with nothing listening fails with
    /// [`EmitterError::Unhandled`].
    pub fn emit(&self, name: impl Into<EventName>, args: &[Value]) -> Result<bool, EmitterError> {
        let name = name.into();
        let matched = self.read("emit")?.matching(&name);
        trace!(event = %name, matched = matched.len(), "emit");

        if matched.is_empty() {
            if name == ERROR {
                return Err(EmitterError::Unhandled {
                    event: name.to_string(),
                    error: args.first().map(describe).unwrap_or_default(),
                });
            }
            return Ok(false);
        }
        self.deliver(name, &matched, None, args)?;
        Ok(true)
    }

    fn notify(
        &self,
        lifecycle: &str,
        key: &Subscription,
        listener: &Listener,
    ) -> Result<(), EmitterError> {
        let name = EventName::from(lifecycle);
        let matched = self.read("notify")?.matching(&name);
        if matched.is_empty() {
            return Ok(());
        }
        let args = [key.to_value(), Value::Bool(key.is_pattern())];
        self.deliver(name, &matched, Some(listener.clone()), &args)
    }

    fn deliver(
        &self,
        name: EventName,
        matched: &[Matched],
        subject: Option<Listener>,
        args: &[Value],
    ) -> Result<(), EmitterError> {
        let (event, error) = match self.dispatch(name.clone(), matched, subject, args) {
            Err(EmitterError::Listener { event, error }) if name != ERROR => (event, error),
            other => return other,
        };

        let handlers = self.read("emit")?.matching(&EventName::from(ERROR));
        if handlers.is_empty() {
            return Err(EmitterError::Listener { event, error });
        }
        debug!(event = %event, error = %error, "listener failure routed to error listeners");
        let args = [Value::String(error.message().to_string())];
        self.dispatch(EventName::from(ERROR), &handlers, None, &args)
    }

    fn dispatch(
        &self,
        name: EventName,
        matched: &[Matched],
        subject: Option<Listener>,
        args: &[Value],
    ) -> Result<(), EmitterError> {
        let _scope = self.current.enter(name.clone());
        let ctx = Context::new(name, subject);
        dispatch::run(matched, &ctx, args, |m| self.retire(m))
    }

    /// Remove a once entry that is about to run.
    fn retire(&self, matched: &Matched) -> Result<(), EmitterError> {
        let removed = self
            .write("once")?
            .remove_entry(&matched.key, &matched.entry);
        if removed {
            self.notify(REMOVE_LISTENER, &matched.key, matched.entry.listener())?;
        }
        Ok(())
    }
}

fn require_pattern(key: Subscription) -> Result<Subscription, EmitterError> {
    match key {
        Subscription::Pattern(_) => Ok(key),
        Subscription::Literal(name) => Err(EmitterError::NotAPattern(name.to_string())),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
