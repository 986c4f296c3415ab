//! Message dispatch
//!
//! Interprets one popped message for one actor. System messages are
//! handled by the runtime; `Hello` and user messages go to the role's
//! handler table. Handler errors and panics are contained here so a
//! misbehaving actor never takes its worker down.

use crate::context::{ActorScope, ActorState, Context};
use crate::messages::{Message, HELLO_TAG};
use crate::registry::{ActorId, ActorSlot};
use crate::system::ActorSystem;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, trace, warn};

/// What the worker must apply to the actor after dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Continue,
    /// `Die` was processed
    Died,
}

pub(crate) fn dispatch(
    system: &ActorSystem,
    slot: &ActorSlot,
    state: &mut ActorState,
    message: Message,
) -> Outcome {
    let actor = slot.id();
    trace!(actor_id = %actor, kind = %message.kind(), "Dispatching message");

    match message {
        Message::Hello { parent } => {
            let encoded = parent.map(ActorId::to_le_bytes);
            let payload = encoded.as_ref().map_or(&[][..], |bytes| &bytes[..]);
            invoke(system, slot, state, HELLO_TAG, payload);
            Outcome::Continue
        }
        Message::Spawn(role) => {
            let role_name = role.name().to_string();
            if let Err(e) = system.spawn(actor, role) {
                error!(
                    system_id = system.system_id(),
                    actor_id = %actor,
                    role = %role_name,
                    error = %e,
                    error_category = e.category(),
                    "Spawn request failed"
                );
            }
            Outcome::Continue
        }
        Message::Die => {
            debug!(system_id = system.system_id(), actor_id = %actor, "Actor processing Die");
            Outcome::Died
        }
        Message::User { tag, payload } => {
            invoke(system, slot, state, tag, &payload);
            Outcome::Continue
        }
    }
}

fn invoke(system: &ActorSystem, slot: &ActorSlot, state: &mut ActorState, tag: usize, payload: &[u8]) {
    let actor = slot.id();
    let role = slot.role();
    let Some(handler) = role.handler(tag) else {
        system.metrics().record_unhandled();
        warn!(
            system_id = system.system_id(),
            actor_id = %actor,
            role = role.name(),
            tag,
            handler_count = role.handler_count(),
            "No handler for message tag"
        );
        return;
    };

    let _scope = ActorScope::enter(actor);
    let mut ctx = Context::new(system, actor, role, state);
    match panic::catch_unwind(AssertUnwindSafe(|| handler(&mut ctx, payload))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            system.metrics().record_handler_failure();
            error!(
                system_id = system.system_id(),
                actor_id = %actor,
                role = role.name(),
                tag,
                error = %e,
                "Actor handler failed"
            );
        }
        Err(cause) => {
            system.metrics().record_handler_failure();
            error!(
                system_id = system.system_id(),
                actor_id = %actor,
                role = role.name(),
                tag,
                panic_message = panic_message(cause.as_ref()),
                "Actor handler panicked"
            );
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
