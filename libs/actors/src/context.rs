//! Handler Context
//!
//! What a handler sees while it runs: the id of the actor it serves, that
//! actor's private state, and the system it can send and spawn into.
//! Worker threads also record which actor they are serving so plain code
//! deeper in a handler can ask for [`current_actor`].

use crate::error::Result;
use crate::messages::Message;
use crate::registry::ActorId;
use crate::role::Role;
use crate::system::ActorSystem;
use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

thread_local! {
    static CURRENT_ACTOR: Cell<Option<ActorId>> = const { Cell::new(None) };
    static CURRENT_WORKER: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Actor being serviced by the calling thread.
///
/// `Some` only inside a handler running on a worker thread.
pub fn current_actor() -> Option<ActorId> {
    CURRENT_ACTOR.with(|current| current.get())
}

/// Worker index of the calling thread, if it is a worker
pub(crate) fn current_worker() -> Option<usize> {
    CURRENT_WORKER.with(|current| current.get())
}

pub(crate) fn bind_worker(worker: usize) {
    CURRENT_WORKER.with(|current| current.set(Some(worker)));
}

pub(crate) fn unbind_worker() {
    CURRENT_WORKER.with(|current| current.set(None));
}

/// Marks the calling thread as serving `actor` until dropped
pub(crate) struct ActorScope {
    previous: Option<ActorId>,
}

impl ActorScope {
    pub(crate) fn enter(actor: ActorId) -> Self {
        let previous = CURRENT_ACTOR.with(|current| current.replace(Some(actor)));
        Self { previous }
    }
}

impl Drop for ActorScope {
    fn drop(&mut self) {
        CURRENT_ACTOR.with(|current| current.set(self.previous));
    }
}

/// Opaque per-actor state, owned by the actor and typed by its handlers
#[derive(Default)]
pub struct ActorState(Option<Box<dyn Any + Send>>);

impl ActorState {
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Replace the state with `value`
    pub fn set<T: Any + Send>(&mut self, value: T) {
        self.0 = Some(Box::new(value));
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.as_ref()?.downcast_ref()
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.as_mut()?.downcast_mut()
    }

    /// State as `T`, initialized with `init` when empty or of another type
    pub fn get_or_insert_with<T: Any + Send>(&mut self, init: impl FnOnce() -> T) -> &mut T {
        if self.get::<T>().is_none() {
            self.set(init());
        }
        self.0
            .as_mut()
            .and_then(|state| state.downcast_mut())
            .unwrap_or_else(|| unreachable!("state was just set"))
    }

    /// Remove and return the state if it is a `T`
    pub fn take<T: Any>(&mut self) -> Option<T> {
        let boxed = self.0.take()?;
        match boxed.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(other) => {
                self.0 = Some(other);
                None
            }
        }
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

impl fmt::Debug for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorState")
            .field("is_empty", &self.is_empty())
            .finish()
    }
}

/// Handle passed to every handler invocation
pub struct Context<'a> {
    system: &'a ActorSystem,
    actor: ActorId,
    role: &'a Arc<Role>,
    state: &'a mut ActorState,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        system: &'a ActorSystem,
        actor: ActorId,
        role: &'a Arc<Role>,
        state: &'a mut ActorState,
    ) -> Self {
        Self {
            system,
            actor,
            role,
            state,
        }
    }

    /// Id of the actor this handler runs for
    pub fn id(&self) -> ActorId {
        self.actor
    }

    pub fn role(&self) -> &Arc<Role> {
        self.role
    }

    pub fn system(&self) -> &ActorSystem {
        self.system
    }

    pub fn state(&self) -> &ActorState {
        &*self.state
    }

    pub fn state_mut(&mut self) -> &mut ActorState {
        &mut *self.state
    }

    pub fn send(&self, to: ActorId, message: Message) -> Result<()> {
        self.system.send(to, message)
    }

    pub fn send_self(&self, message: Message) -> Result<()> {
        self.system.send(self.actor, message)
    }

    /// Create a child immediately; it receives Hello with this actor as parent
    pub fn spawn(&self, role: impl Into<Arc<Role>>) -> Result<ActorId> {
        self.system.spawn(self.actor, role)
    }

    /// Queue `Die` for this actor behind its pending messages
    pub fn die(&self) -> Result<()> {
        self.send_self(Message::Die)
    }
}
