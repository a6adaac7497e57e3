//! Per-object named events with synchronous, cancelable dispatch.
//!
//! Each graph entity owns its own [`EventHub`]; there is no global bus.
//! Listeners run in registration order on the emitting turn and receive the
//! owning object plus the event arguments. A listener returning
//! [`Propagation::Halt`] stops the remaining listeners and makes
//! [`EventHub::emit`] return `Halt` to its caller.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Whether dispatch should continue to the next listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    Halt,
}

/// A registered callback. Identity (pointer equality) is what `off` matches on.
pub type Listener<O, A> = Rc<dyn Fn(&O, &A) -> Propagation>;

/// Named-event registry owned by a single object of type `O`.
pub struct EventHub<O: ?Sized, A: ?Sized> {
    listeners: HashMap<String, Vec<Listener<O, A>>>,
}

impl<O: ?Sized, A: ?Sized> EventHub<O, A> {
    #[must_use]
    pub fn new() -> Self {
        Self { listeners: HashMap::new() }
    }

    /// Register `listener` for `name`, after any existing listeners.
    pub fn on(&mut self, name: &str, listener: Listener<O, A>) {
        self.listeners.entry(name.to_owned()).or_default().push(listener);
    }

    /// Remove the first registration of `listener` under `name`.
    ///
    /// Unknown names and listeners are ignored.
    pub fn off(&mut self, name: &str, listener: &Listener<O, A>) {
        let Some(list) = self.listeners.get_mut(name) else {
            return;
        };
        if let Some(pos) = list.iter().position(|l| Rc::ptr_eq(l, listener)) {
            list.remove(pos);
        }
        if list.is_empty() {
            self.listeners.remove(name);
        }
    }

    /// Invoke every listener for `name` in registration order.
    pub fn emit(&self, name: &str, owner: &O, args: &A) -> Propagation {
        let Some(list) = self.listeners.get(name) else {
            return Propagation::Continue;
        };
        for listener in list {
            if listener(owner, args) == Propagation::Halt {
                return Propagation::Halt;
            }
        }
        Propagation::Continue
    }

    /// Number of listeners currently registered for `name`.
    #[must_use]
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map_or(0, Vec::len)
    }
}

impl<O: ?Sized, A: ?Sized> Default for EventHub<O, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ?Sized, A: ?Sized> fmt::Debug for EventHub<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.listeners.iter().map(|(name, list)| (name, list.len())))
            .finish()
    }
}
