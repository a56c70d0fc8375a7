use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use serde_json::Value;

use crate::error::EmitterError;
use crate::event_name::EventName;
use crate::listener::Context;
use crate::registry::Matched;

/// Names of the emissions in flight, one stack per thread, innermost last.
#[derive(Debug, Default)]
pub(crate) struct CurrentEvents {
    stacks: Mutex<HashMap<ThreadId, Vec<EventName>>>,
}

impl CurrentEvents {
    fn stacks(&self) -> MutexGuard<'_, HashMap<ThreadId, Vec<EventName>>> {
        self.stacks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark `event` as the calling thread's current event until the scope drops.
    pub(crate) fn enter(&self, event: EventName) -> EventScope<'_> {
        self.stacks()
            .entry(thread::current().id())
            .or_default()
            .push(event);
        EventScope { events: self }
    }

    pub(crate) fn current(&self) -> Option<EventName> {
        self.stacks()
            .get(&thread::current().id())
            .and_then(|stack| stack.last().cloned())
    }
}

/// Pops its event from the calling thread's stack on drop, whether the
/// dispatch inside the scope returned, failed, or unwound.
pub(crate) struct EventScope<'a> {
    events: &'a CurrentEvents,
}

impl Drop for EventScope<'_> {
    fn drop(&mut self) {
        let id = thread::current().id();
        let mut stacks = self.events.stacks();
        if let Some(stack) = stacks.get_mut(&id) {
            stack.pop();
            if stack.is_empty() {
                stacks.remove(&id);
            }
        }
    }
}

/// Invoke a matching sequence in order.
///
/// Once entries are claimed and handed to `retire` before their callback
/// runs. The first listener failure stops the sequence.
pub(crate) fn run<R>(
    matched: &[Matched],
    ctx: &Context,
    args: &[Value],
    mut retire: R,
) -> Result<(), EmitterError>
where
    R: FnMut(&Matched) -> Result<(), EmitterError>,
{
    for m in matched {
        if !m.entry.claim() {
            continue;
        }
        if m.entry.is_once() {
            retire(m)?;
        }
        m.entry
            .listener()
            .call(ctx, args)
            .map_err(|error| EmitterError::Listener {
                event: ctx.event.to_string(),
                error,
            })?;
    }
    Ok(())
}
