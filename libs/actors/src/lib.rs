//! Thread-Pool Actor Runtime
//!
//! Runs many lightweight actors on a fixed pool of worker threads. Each
//! actor owns a bounded mailbox and private state; the runtime guarantees
//! per-actor FIFO delivery and stops on its own once every actor has died
//! and drained its mailbox.
//!
//! # Architecture
//!
//! ```text
//!  send(id, msg)                         worker i = id % P
//! ┌──────────────┐   0→scheduled   ┌───────────────────┐
//! │  Mailbox[id] │ ──────────────▶ │  ReadyQueue[i]    │
//! │  (bounded)   │                 │  (growable FIFO)  │
//! └──────────────┘                 └─────────┬─────────┘
//!        ▲                                   │ pop_blocking
//!        │ requeue if backlog      ┌─────────▼─────────┐
//!        └──────────────────────── │  Worker i         │
//!                                  │  dispatch 1 msg   │
//!                                  └─────────┬─────────┘
//!                                            │ Dead + empty
//!                                  ┌─────────▼─────────┐
//!                                  │  GlobalState      │
//!                                  │  all drained →    │
//!                                  │  close queues     │
//!                                  └───────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use cacti_actors::{ActorSystem, Message, Role};
//! use cacti_config::RuntimeConfig;
//!
//! let role = Role::builder("greeter")
//!     .handler(|ctx, _parent| {
//!         ctx.send_self(Message::user(1, b"world"))?;
//!         Ok(())
//!     })
//!     .handler(|ctx, payload| {
//!         assert_eq!(payload, b"world");
//!         ctx.die()?;
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let (system, root) = ActorSystem::create_with_config(RuntimeConfig::default(), role)?;
//! system.join(root)?;
//! # Ok::<(), cacti_actors::ActorError>(())
//! ```

pub mod context;
mod dispatch;
pub mod error;
pub mod global;
mod mailbox;
pub mod messages;
pub mod metrics;
mod ready_queue;
pub mod registry;
pub mod role;
pub mod system;
mod worker;

pub use context::{current_actor, ActorState, Context};
pub use error::{ActorError, Result};
pub use global::GlobalState;
pub use messages::{Message, MessageKind, HELLO_TAG};
pub use metrics::{SystemMetrics, SystemStats};
pub use registry::{ActorId, ActorStatus};
pub use role::{Handler, Role, RoleBuilder};
pub use system::ActorSystem;
