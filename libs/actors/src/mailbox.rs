//! Actor Mailbox
//!
//! Fixed-capacity FIFO of pending messages. Storage is reserved once when
//! the actor is created and never grows; a full mailbox rejects the push
//! and hands the message back to the caller.

use crate::error::{ActorError, Result};
use crate::messages::Message;
use std::collections::VecDeque;

#[derive(Debug)]
pub(crate) struct Mailbox {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl Mailbox {
    /// Reserve room for exactly `capacity` messages
    pub(crate) fn with_capacity(capacity: usize) -> Result<Self> {
        let mut messages = VecDeque::new();
        messages
            .try_reserve_exact(capacity)
            .map_err(|e| ActorError::allocation("mailbox", e))?;
        Ok(Self { messages, capacity })
    }

    /// Enqueue at the tail, or return the message if the mailbox is full
    pub(crate) fn push(&mut self, message: Message) -> std::result::Result<(), Message> {
        if self.is_full() {
            return Err(message);
        }
        self.messages.push_back(message);
        Ok(())
    }

    /// Dequeue from the head
    pub(crate) fn pop(&mut self) -> Option<Message> {
        self.messages.pop_front()
    }

    /// Undo the most recent push
    pub(crate) fn retract_last(&mut self) -> Option<Message> {
        self.messages.pop_back()
    }

    pub(crate) fn len(&self) -> usize {
        self.messages.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.messages.len() >= self.capacity
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop queued messages and release storage
    pub(crate) fn release(&mut self) {
        self.messages = VecDeque::new();
    }
}
