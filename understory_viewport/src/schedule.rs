// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred task scheduling.
//!
//! ## Overview
//!
//! The activation controller needs exactly one thing from the host event
//! loop: "run this later, on a subsequent turn, unless I cancel it first".
//! [`Scheduler`] is that seam. Hosts with a real loop (a browser `setTimeout(0)`,
//! a winit user event, an async executor tick) implement it over their loop.
//!
//! [`TaskQueue`] is a small single-threaded macrotask queue that implements
//! [`Scheduler`] for hosts that pump their own loop, and for tests.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_viewport::schedule::{Scheduler, TaskQueue};
//!
//! let queue = TaskQueue::new();
//! let ran = Rc::new(Cell::new(0));
//! let r = ran.clone();
//! let first = queue.schedule(Box::new(move || r.set(r.get() + 1)));
//! let r = ran.clone();
//! queue.schedule(Box::new(move || r.set(r.get() + 10)));
//! queue.cancel(first);
//! assert_eq!(queue.run_pending(), 1);
//! assert_eq!(ran.get(), 10);
//! ```

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::cell::{Cell, RefCell};

/// Handle to a scheduled task, used to cancel it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Host hook for running work on a later turn of the event loop.
pub trait Scheduler {
    /// Queue `task` to run on a later turn. It must not run synchronously
    /// inside this call.
    fn schedule(&self, task: Task) -> TaskId;

    /// Cancel a task that has not yet run. Unknown or already-run ids are ignored.
    fn cancel(&self, id: TaskId);
}

/// Single-threaded FIFO macrotask queue.
///
/// Tasks scheduled while [`TaskQueue::run_pending`] is running are left for
/// the next call, matching "next macrotask" semantics.
#[derive(Default)]
pub struct TaskQueue {
    next_id: Cell<u64>,
    tasks: RefCell<VecDeque<(TaskId, Task)>>,
}

impl core::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

impl TaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Run the tasks that were queued before this call, in order.
    ///
    /// Returns how many tasks ran.
    ///
    /// A task cancelled by an earlier task of the same turn does not run.
    pub fn run_pending(&self) -> usize {
        let watermark = self.next_id.get();
        let mut ran = 0;
        loop {
            let next = {
                let mut tasks = self.tasks.borrow_mut();
                match tasks.front() {
                    Some((id, _)) if id.0 < watermark => tasks.pop_front(),
                    _ => None,
                }
            };
            let Some((_, task)) = next else {
                return ran;
            };
            task();
            ran += 1;
        }
    }

    /// Keep running turns until the queue stays empty. Returns the total number of tasks run.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            let ran = self.run_pending();
            if ran == 0 {
                return total;
            }
            total += ran;
        }
    }
}

impl Scheduler for TaskQueue {
    fn schedule(&self, task: Task) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.tasks.borrow_mut().push_back((id, task));
        id
    }

    fn cancel(&self, id: TaskId) {
        self.tasks.borrow_mut().retain(|(queued, _)| *queued != id);
    }
}
