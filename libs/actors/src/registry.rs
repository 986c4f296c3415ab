//! Actor Registry
//!
//! Append-only table of every actor in a system, indexed by `ActorId`.
//! Records sit behind `Arc`, and callers re-resolve an id on each operation
//! instead of holding on to a record across a spawn. The table lock is the
//! system's global lock: it also guards the termination counters.
//!
//! # Lock Ordering
//!
//! 1. actor lock (`ActorSlot::lock`)
//! 2. global lock (the table) or a ready queue lock
//!
//! The global lock is never held while taking an actor or queue lock, so
//! table growth can never wait on an actor.

use crate::context::ActorState;
use crate::error::{ActorError, Result};
use crate::global::{GlobalState, Quiescence};
use crate::mailbox::Mailbox;
use crate::messages::Message;
use crate::role::Role;
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Sequential actor identifier, stable for the actor's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId(u64);

impl ActorId {
    /// Size of the little-endian encoding carried by `Hello`
    pub const ENCODED_LEN: usize = 8;

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Position in the registry table.
    ///
    /// Ids beyond `usize` saturate to `usize::MAX`, which no table reaches.
    pub fn index(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }

    /// Worker that owns this actor in a pool of `pool_size`
    pub fn worker(self, pool_size: usize) -> usize {
        (self.0 % pool_size as u64) as usize
    }

    pub fn to_le_bytes(self) -> [u8; Self::ENCODED_LEN] {
        self.0.to_le_bytes()
    }

    /// Decode a `Hello` payload; `None` unless exactly eight bytes
    pub fn from_le_slice(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; Self::ENCODED_LEN] = bytes.try_into().ok()?;
        Some(Self(u64::from_le_bytes(raw)))
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor-{}", self.0)
    }
}

impl From<u64> for ActorId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Actor lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorStatus {
    /// Accepting and processing messages
    Live,
    /// Processed `Die`; draining what is left
    Dead,
    /// Dead with an empty mailbox, counted toward shutdown
    Drained,
}

impl ActorStatus {
    pub fn accepts_messages(self) -> bool {
        self == ActorStatus::Live
    }
}

/// Mutable part of an actor record, guarded by the actor lock
#[derive(Debug)]
pub(crate) struct ActorCore {
    pub(crate) mailbox: Mailbox,
    pub(crate) status: ActorStatus,
    /// `None` while checked out by the dispatching worker
    pub(crate) state: Option<ActorState>,
    /// Queued on its ready queue or being processed
    pub(crate) scheduled: bool,
}

/// One actor record
#[derive(Debug)]
pub(crate) struct ActorSlot {
    id: ActorId,
    role: Arc<Role>,
    core: Mutex<ActorCore>,
}

impl ActorSlot {
    /// Record whose first message is its `Hello`, already marked scheduled
    fn with_hello(
        id: ActorId,
        role: Arc<Role>,
        mut mailbox: Mailbox,
        parent: Option<ActorId>,
    ) -> Result<Self> {
        mailbox
            .push(Message::Hello { parent })
            .map_err(|_| ActorError::QueueFull {
                actor: id,
                capacity: mailbox.capacity(),
            })?;
        Ok(Self {
            id,
            role,
            core: Mutex::new(ActorCore {
                mailbox,
                status: ActorStatus::Live,
                state: Some(ActorState::default()),
                scheduled: true,
            }),
        })
    }

    pub(crate) fn id(&self) -> ActorId {
        self.id
    }

    pub(crate) fn role(&self) -> &Arc<Role> {
        &self.role
    }

    /// Take the actor lock
    pub(crate) fn lock(&self) -> MutexGuard<'_, ActorCore> {
        self.core.lock()
    }
}

#[derive(Debug)]
struct ActorTable {
    slots: Vec<Arc<ActorSlot>>,
    global: GlobalState,
}

/// Growable actor table plus the global termination state
#[derive(Debug)]
pub(crate) struct ActorRegistry {
    table: Mutex<ActorTable>,
    mailbox_capacity: usize,
    max_actors: usize,
}

impl ActorRegistry {
    /// Registry holding only the root actor (id 0), its Hello queued
    pub(crate) fn with_root(
        role: Arc<Role>,
        mailbox_capacity: usize,
        max_actors: usize,
    ) -> Result<(Self, Arc<ActorSlot>)> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(1)
            .map_err(|e| ActorError::allocation("actor registry", e))?;

        let mailbox = Mailbox::with_capacity(mailbox_capacity)?;
        let root = Arc::new(ActorSlot::with_hello(ActorId::new(0), role, mailbox, None)?);
        slots.push(Arc::clone(&root));

        let registry = Self {
            table: Mutex::new(ActorTable {
                slots,
                global: GlobalState::with_root(),
            }),
            mailbox_capacity,
            max_actors,
        };
        Ok((registry, root))
    }

    /// Resolve `id` to its record
    pub(crate) fn resolve(&self, id: ActorId) -> Result<Arc<ActorSlot>> {
        let table = self.table.lock();
        table
            .slots
            .get(id.index())
            .cloned()
            .ok_or(ActorError::ActorIdInvalid {
                actor: id,
                actor_count: table.slots.len(),
            })
    }

    /// Append a child of `parent` with the next sequential id.
    ///
    /// The child's Hello is in its mailbox before the id becomes
    /// resolvable, so it is always the first message delivered.
    pub(crate) fn append(&self, parent: ActorId, role: Arc<Role>) -> Result<Arc<ActorSlot>> {
        let mailbox = Mailbox::with_capacity(self.mailbox_capacity)?;

        let mut table = self.table.lock();
        if !table.global.is_alive() {
            return Err(ActorError::SystemHalted);
        }
        let len = table.slots.len();
        if parent.index() >= len {
            return Err(ActorError::ActorIdInvalid {
                actor: parent,
                actor_count: len,
            });
        }
        if len >= self.max_actors {
            return Err(ActorError::exhausted("actors", self.max_actors));
        }
        if len == table.slots.capacity() {
            let grown = ((table.slots.capacity() + 1) * 3 / 2).min(self.max_actors);
            table
                .slots
                .try_reserve_exact(grown - len)
                .map_err(|e| ActorError::allocation("actor registry", e))?;
            debug!(
                old_capacity = len,
                new_capacity = table.slots.capacity(),
                "Actor registry grown"
            );
        }

        let id = ActorId::new(len as u64);
        let slot = Arc::new(ActorSlot::with_hello(id, role, mailbox, Some(parent))?);
        table.slots.push(Arc::clone(&slot));
        table.global.actor_added();
        Ok(slot)
    }

    /// Count one actor as drained. Call with that actor's lock held.
    pub(crate) fn record_drained(&self) -> Quiescence {
        self.table.lock().global.actor_drained()
    }

    pub(crate) fn actor_count(&self) -> usize {
        self.table.lock().slots.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.table.lock().slots.capacity()
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.table.lock().global.is_alive()
    }

    pub(crate) fn global_state(&self) -> GlobalState {
        self.table.lock().global.clone()
    }

    /// Free every record. Only valid once all workers have exited.
    pub(crate) fn release(&self) {
        let slots = std::mem::take(&mut self.table.lock().slots);
        for slot in &slots {
            let mut core = slot.lock();
            core.mailbox.release();
            core.state = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_role() -> Arc<Role> {
        Arc::new(Role::builder("test").handler(|_, _| Ok(())).build().unwrap())
    }

    #[test]
    fn test_actor_id_encoding() {
        let id = ActorId::new(0x0102_0304);
        assert_eq!(ActorId::from_le_slice(&id.to_le_bytes()), Some(id));
        assert_eq!(ActorId::from_le_slice(&[1, 2, 3]), None);
        assert_eq!(ActorId::from_le_slice(&[]), None);
        assert_eq!(id.to_string(), "actor-16909060");
    }

    #[test]
    fn test_actor_id_worker_assignment() {
        assert_eq!(ActorId::new(0).worker(3), 0);
        assert_eq!(ActorId::new(4).worker(3), 1);
        assert_eq!(ActorId::new(8).worker(3), 2);
        assert_eq!(ActorId::new(8).worker(1), 0);
    }

    #[test]
    fn test_root_has_hello_queued() {
        let (registry, root) = ActorRegistry::with_root(test_role(), 4, 16).unwrap();
        assert_eq!(root.id(), ActorId::new(0));
        assert_eq!(registry.actor_count(), 1);

        let mut core = root.lock();
        assert!(core.scheduled);
        assert_eq!(core.status, ActorStatus::Live);
        assert!(matches!(core.mailbox.pop(), Some(Message::Hello { parent: None })));
    }

    #[test]
    fn test_append_assigns_sequential_ids_and_grows() {
        let (registry, _root) = ActorRegistry::with_root(test_role(), 4, 1000).unwrap();
        let mut capacities = vec![registry.capacity()];

        for expected in 1..50u64 {
            let slot = registry.append(ActorId::new(0), test_role()).unwrap();
            assert_eq!(slot.id(), ActorId::new(expected));
            let capacity = registry.capacity();
            if capacity != *capacities.last().unwrap() {
                capacities.push(capacity);
            }
        }

        assert_eq!(registry.actor_count(), 50);
        assert!(capacities.windows(2).all(|w| w[1] > w[0]));
        assert!(registry.capacity() >= 50);

        let child = registry.resolve(ActorId::new(10)).unwrap();
        let mut core = child.lock();
        match core.mailbox.pop() {
            Some(Message::Hello { parent }) => assert_eq!(parent, Some(ActorId::new(0))),
            other => panic!("unexpected first message: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_out_of_range() {
        let (registry, _root) = ActorRegistry::with_root(test_role(), 4, 16).unwrap();
        match registry.resolve(ActorId::new(1)) {
            Err(ActorError::ActorIdInvalid { actor, actor_count }) => {
                assert_eq!(actor, ActorId::new(1));
                assert_eq!(actor_count, 1);
            }
            other => panic!("unexpected result: {:?}", other.map(|s| s.id())),
        }
    }

    #[test]
    fn test_largest_id_never_resolves() {
        let huge = ActorId::new(u64::MAX);
        assert_eq!(huge.index(), usize::MAX);

        let (registry, _root) = ActorRegistry::with_root(test_role(), 4, 16).unwrap();
        assert!(matches!(
            registry.resolve(huge),
            Err(ActorError::ActorIdInvalid { actor_count: 1, .. })
        ));
    }

    #[test]
    fn test_max_actors_is_an_error() {
        let (registry, _root) = ActorRegistry::with_root(test_role(), 4, 3).unwrap();
        registry.append(ActorId::new(0), test_role()).unwrap();
        registry.append(ActorId::new(0), test_role()).unwrap();

        let err = registry.append(ActorId::new(0), test_role()).unwrap_err();
        assert!(matches!(err, ActorError::ResourceExhausted { limit: 3, .. }));
        assert_eq!(registry.actor_count(), 3);
    }

    #[test]
    fn test_append_with_unknown_parent() {
        let (registry, _root) = ActorRegistry::with_root(test_role(), 4, 16).unwrap();
        let err = registry.append(ActorId::new(5), test_role()).unwrap_err();
        assert!(matches!(err, ActorError::ActorIdInvalid { .. }));
    }

    #[test]
    fn test_append_after_quiescence_is_rejected() {
        let (registry, _root) = ActorRegistry::with_root(test_role(), 4, 16).unwrap();
        assert_eq!(registry.record_drained(), Quiescence::Reached);
        assert!(!registry.is_alive());

        let err = registry.append(ActorId::new(0), test_role()).unwrap_err();
        assert!(matches!(err, ActorError::SystemHalted));
    }

    #[test]
    fn test_release_clears_table() {
        let (registry, _root) = ActorRegistry::with_root(test_role(), 4, 16).unwrap();
        registry.append(ActorId::new(0), test_role()).unwrap();
        registry.release();
        assert_eq!(registry.actor_count(), 0);
    }
}
