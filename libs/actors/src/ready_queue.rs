//! Ready Queue
//!
//! One per worker: a FIFO of actors that have undelivered messages, plus the
//! blocking wait the worker parks on when it has nothing to do. Producers
//! push ids and wake the worker; shutdown closes the queue, which wakes the
//! worker for good.
//!
//! Capacity grows by `(capacity + 1) * 3 / 2` when a push finds the queue
//! full. Allocation failure is reported, never fatal.

use crate::error::{ActorError, Result};
use crate::registry::ActorId;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug)]
struct QueueState {
    ids: VecDeque<ActorId>,
    closed: bool,
    /// Length at which pushes fail, standing in for allocation failure
    #[cfg(test)]
    limit: usize,
}

#[derive(Debug)]
pub(crate) struct ReadyQueue {
    worker: usize,
    state: Mutex<QueueState>,
    available: Condvar,
}

impl ReadyQueue {
    pub(crate) fn new(worker: usize) -> Result<Self> {
        let mut ids = VecDeque::new();
        ids.try_reserve_exact(1)
            .map_err(|e| ActorError::allocation("ready queue", e))?;
        Ok(Self {
            worker,
            state: Mutex::new(QueueState {
                ids,
                closed: false,
                #[cfg(test)]
                limit: usize::MAX,
            }),
            available: Condvar::new(),
        })
    }

    #[cfg(test)]
    pub(crate) fn worker(&self) -> usize {
        self.worker
    }

    #[cfg(test)]
    pub(crate) fn set_limit(&self, limit: usize) {
        self.state.lock().limit = limit;
    }

    /// Append `id` at the tail, waking the worker if the queue was empty
    pub(crate) fn push(&self, id: ActorId) -> Result<()> {
        let mut state = self.state.lock();
        let len = state.ids.len();
        #[cfg(test)]
        if len >= state.limit {
            return Err(ActorError::exhausted("ready queue", state.limit));
        }
        if len == state.ids.capacity() {
            let grown = (state.ids.capacity() + 1) * 3 / 2;
            state
                .ids
                .try_reserve_exact(grown - len)
                .map_err(|e| ActorError::allocation("ready queue", e))?;
            debug!(
                worker = self.worker,
                new_capacity = state.ids.capacity(),
                "Ready queue grown"
            );
        }
        state.ids.push_back(id);
        if len == 0 {
            self.available.notify_one();
        }
        Ok(())
    }

    /// Next ready actor, blocking while the queue is empty.
    ///
    /// Returns `None` once the queue is closed.
    pub(crate) fn pop_blocking(&self) -> Option<ActorId> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return None;
            }
            if let Some(id) = state.ids.pop_front() {
                return Some(id);
            }
            self.available.wait(&mut state);
        }
    }

    #[cfg(test)]
    pub(crate) fn try_pop(&self) -> Option<ActorId> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }
        state.ids.pop_front()
    }

    /// Stop the queue and wake its worker
    pub(crate) fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.available.notify_all();
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.state.lock().ids.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.state.lock().ids.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.state.lock().ids.capacity()
    }

    /// Release storage after the worker has exited
    pub(crate) fn release(&self) {
        self.state.lock().ids = VecDeque::new();
    }
}
