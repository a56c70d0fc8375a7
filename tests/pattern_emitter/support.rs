//! Recording listeners shared by the emitter suites.

#![allow(dead_code)]

use regex_emitter::{Listener, ListenerError, Value};
use std::sync::{Arc, Mutex};

/// One observed invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub tag: String,
    pub event: String,
    pub args: Vec<Value>,
}

/// Collects invocations from every listener it hands out, in call order.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that records under `tag`.
    pub fn listener(&self, tag: &str) -> Listener {
        let calls = Arc::clone(&self.calls);
        let tag = tag.to_string();
        Listener::infallible(move |ctx, args| {
            calls.lock().unwrap().push(Call {
                tag: tag.clone(),
                event: ctx.event.to_string(),
                args: args.to_vec(),
            });
        })
    }

    /// A listener that records under `tag` and then fails with `message`.
    pub fn failing(&self, tag: &str, message: &str) -> Listener {
        let recorded = self.listener(tag);
        let message = message.to_string();
        Listener::new(move |ctx, args| {
            recorded.call(ctx, args)?;
            Err(ListenerError::new(message.clone()))
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.tag).collect()
    }

    pub fn count(&self, tag: &str) -> usize {
        self.calls().iter().filter(|c| c.tag == tag).count()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }
}
