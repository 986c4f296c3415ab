//! Actor Messages
//!
//! The closed set of messages an actor can receive. System messages drive
//! the actor lifecycle; user messages carry an opaque payload routed to the
//! role's handler for their tag.

use crate::registry::ActorId;
use crate::role::Role;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// Handler tag that receives `Hello`
pub const HELLO_TAG: usize = 0;

/// A message accepted into an actor mailbox
#[derive(Clone)]
pub enum Message {
    /// First message of every actor, carrying its parent (none for the root)
    Hello { parent: Option<ActorId> },
    /// Create a child actor running `role`
    Spawn(Arc<Role>),
    /// Stop accepting messages and drain what is queued
    Die,
    /// Application message routed to the role handler for `tag`
    User { tag: usize, payload: Bytes },
}

/// Message discriminant for logging and metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Hello,
    Spawn,
    Die,
    User(usize),
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Hello => write!(f, "hello"),
            MessageKind::Spawn => write!(f, "spawn"),
            MessageKind::Die => write!(f, "die"),
            MessageKind::User(tag) => write!(f, "user({})", tag),
        }
    }
}

impl Message {
    /// User message with the payload copied out of `data`
    pub fn user(tag: usize, data: impl AsRef<[u8]>) -> Self {
        Message::User {
            tag,
            payload: Bytes::copy_from_slice(data.as_ref()),
        }
    }

    /// User message without payload
    pub fn signal(tag: usize) -> Self {
        Message::User {
            tag,
            payload: Bytes::new(),
        }
    }

    /// Spawn request for a child with `role`
    pub fn spawn(role: impl Into<Arc<Role>>) -> Self {
        Message::Spawn(role.into())
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Hello { .. } => MessageKind::Hello,
            Message::Spawn(_) => MessageKind::Spawn,
            Message::Die => MessageKind::Die,
            Message::User { tag, .. } => MessageKind::User(*tag),
        }
    }

    /// Length of the payload a handler receives for this message
    pub fn payload_len(&self) -> usize {
        match self {
            Message::Hello { parent: Some(_) } => ActorId::ENCODED_LEN,
            Message::User { payload, .. } => payload.len(),
            _ => 0,
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Hello { parent } => f.debug_struct("Hello").field("parent", parent).finish(),
            Message::Spawn(role) => f.debug_tuple("Spawn").field(&role.name()).finish(),
            Message::Die => write!(f, "Die"),
            Message::User { tag, payload } => f
                .debug_struct("User")
                .field("tag", tag)
                .field("payload_len", &payload.len())
                .finish(),
        }
    }
}
