// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered listener storage.
//!
//! Insertion order is dispatch order; nothing else reorders records.
//! The registry itself has no side effects. The owning
//! [`ViewportProvider`](crate::provider::ViewportProvider) schedules an
//! activation re-evaluation after each mutation.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::listener::{HandlerKey, Listener};

/// Ordered sequence of [`Listener`] records.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: Vec<Rc<Listener>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Append a record. Duplicates by handler are kept.
    pub fn add(&mut self, listener: Listener) {
        self.listeners.push(Rc::new(listener));
    }

    /// Remove every record whose handler matches `key`, keeping the rest in order.
    ///
    /// Returns how many records were removed; `0` means `key` was not registered.
    pub fn remove(&mut self, key: HandlerKey) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| !l.has_key(&key));
        before - self.listeners.len()
    }

    /// True if no records are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Clone the ordered record list.
    ///
    /// Dispatch works from a snapshot so handlers may add or remove listeners
    /// while an event is being delivered; such changes apply from the next event.
    pub fn snapshot(&self) -> Vec<Rc<Listener>> {
        self.listeners.clone()
    }

    /// Iterate records in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &Listener> + '_ {
        self.listeners.iter().map(|l| &**l)
    }
}
