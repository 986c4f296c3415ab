//! Actor System Core
//!
//! The owned system context: actor registry, one ready queue per worker,
//! the worker pool and metrics. Cloning an `ActorSystem` clones a handle to
//! the same system; workers hold one too.
//!
//! # Lock Ordering (CRITICAL for deadlock prevention)
//!
//! When acquiring multiple locks, ALWAYS follow this order:
//! 1. actor lock
//! 2. global lock (registry table) or one ready queue lock
//!
//! Never take an actor lock while holding the global lock or a queue lock,
//! and never hold the global lock and a queue lock together.

use crate::context::current_worker;
use crate::error::{ActorError, Result};
use crate::global::{GlobalState, Quiescence};
use crate::messages::Message;
use crate::metrics::{SystemMetrics, SystemStats};
use crate::ready_queue::ReadyQueue;
use crate::registry::{ActorId, ActorRegistry, ActorStatus};
use crate::role::Role;
use crate::worker::WorkerPool;
use cacti_config::RuntimeConfig;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, trace};
use uuid::Uuid;

/// Handle to a running actor system
#[derive(Clone)]
pub struct ActorSystem {
    inner: Arc<SystemInner>,
}

struct SystemInner {
    /// System ID for log correlation
    system_id: String,
    config: RuntimeConfig,
    registry: ActorRegistry,
    /// Indexed by worker; actor `id` lives on `id % pool_size`
    queues: Vec<ReadyQueue>,
    workers: WorkerPool,
    metrics: SystemMetrics,
}

impl ActorSystem {
    /// Create a system sized from `CACTI_*` environment variables.
    ///
    /// Returns the handle and the root actor id (always 0).
    pub fn create(role: impl Into<Arc<Role>>) -> Result<(Self, ActorId)> {
        let config = RuntimeConfig::from_env()
            .map_err(|e| ActorError::configuration(format!("{:#}", e), None))?;
        Self::create_with_config(config, role)
    }

    /// Create a system with explicit sizing
    pub fn create_with_config(
        config: RuntimeConfig,
        role: impl Into<Arc<Role>>,
    ) -> Result<(Self, ActorId)> {
        config
            .validate()
            .map_err(|e| ActorError::configuration(e.to_string(), None))?;

        let role = role.into();
        let system_id = format!("system-{}", Uuid::new_v4());
        let (registry, root) =
            ActorRegistry::with_root(Arc::clone(&role), config.mailbox_capacity, config.max_actors)?;
        let queues = (0..config.pool_size)
            .map(ReadyQueue::new)
            .collect::<Result<Vec<_>>>()?;

        let system = Self {
            inner: Arc::new(SystemInner {
                system_id,
                config,
                registry,
                queues,
                workers: WorkerPool::new(),
                metrics: SystemMetrics::default(),
            }),
        };

        system.inner.workers.start(&system)?;

        // Root is created with its Hello queued and marked scheduled.
        let root_id = root.id();
        system.inner.metrics.record_spawned();
        system.inner.metrics.record_sent();
        if let Err(e) = system.ready_queue(root_id.worker(system.pool_size())).push(root_id) {
            system.abort_workers();
            return Err(e);
        }

        info!(
            system_id = %system.inner.system_id,
            pool_size = system.inner.config.pool_size,
            mailbox_capacity = system.inner.config.mailbox_capacity,
            max_actors = system.inner.config.max_actors,
            root_role = role.name(),
            "Actor system created"
        );
        Ok((system, root_id))
    }

    /// Enqueue `message` for `to`.
    ///
    /// Never blocks on capacity: a full mailbox is reported as `QueueFull`
    /// and nothing is retried.
    pub fn send(&self, to: ActorId, message: Message) -> Result<()> {
        let slot = self.inner.registry.resolve(to)?;
        let kind = message.kind();

        let mut core = slot.lock();
        if !core.status.accepts_messages() {
            self.inner.metrics.record_dead_actor_rejection();
            debug!(
                system_id = %self.inner.system_id,
                actor_id = %to,
                kind = %kind,
                "Send rejected: actor is dead"
            );
            return Err(ActorError::ActorDead { actor: to });
        }

        if core.mailbox.push(message).is_err() {
            self.inner.metrics.record_queue_full();
            debug!(
                system_id = %self.inner.system_id,
                actor_id = %to,
                kind = %kind,
                capacity = core.mailbox.capacity(),
                "Send rejected: mailbox full"
            );
            return Err(ActorError::QueueFull {
                actor: to,
                capacity: core.mailbox.capacity(),
            });
        }

        if !core.scheduled {
            if let Err(e) = self.ready_queue(to.worker(self.pool_size())).push(to) {
                core.mailbox.retract_last();
                return Err(e);
            }
            core.scheduled = true;
        }
        self.inner.metrics.record_sent();

        trace!(actor_id = %to, kind = %kind, queued = core.mailbox.len(), "Message accepted");
        Ok(())
    }

    /// Create a child of `parent` running `role`.
    ///
    /// The child's first message is `Hello` carrying `parent`.
    pub fn spawn(&self, parent: ActorId, role: impl Into<Arc<Role>>) -> Result<ActorId> {
        let role = role.into();
        let slot = match self.inner.registry.append(parent, Arc::clone(&role)) {
            Ok(slot) => slot,
            Err(e) => {
                self.inner.metrics.record_spawn_failure();
                return Err(e);
            }
        };
        let id = slot.id();
        self.inner.metrics.record_spawned();

        let mut core = slot.lock();
        if let Err(e) = self.ready_queue(id.worker(self.pool_size())).push(id) {
            // Nobody holds the id, so retire the child now or shutdown
            // would wait on it forever.
            core.mailbox.release();
            core.status = ActorStatus::Drained;
            core.state = None;
            core.scheduled = false;
            self.inner.metrics.record_spawn_failure();
            self.inner.metrics.record_drained();
            let quiescence = self.inner.registry.record_drained();
            drop(core);

            error!(
                system_id = %self.inner.system_id,
                actor_id = %id,
                parent = %parent,
                error = %e,
                "Spawned actor could not be scheduled, retired"
            );
            if quiescence == Quiescence::Reached {
                self.shutdown_workers();
            }
            return Err(e);
        }
        self.inner.metrics.record_sent();
        drop(core);

        debug!(
            system_id = %self.inner.system_id,
            actor_id = %id,
            parent = %parent,
            role = role.name(),
            "Actor spawned"
        );
        Ok(id)
    }

    /// Block until every actor is drained and every worker has exited,
    /// then release all actor and queue storage.
    pub fn join(&self, actor: ActorId) -> Result<()> {
        if let Some(worker) = current_worker() {
            return Err(ActorError::usage(format!(
                "join called from worker {} would wait on itself",
                worker
            )));
        }

        let actor_count = self.inner.registry.actor_count();
        if actor.index() >= actor_count {
            return Err(ActorError::ActorIdInvalid { actor, actor_count });
        }

        debug!(
            system_id = %self.inner.system_id,
            actor_id = %actor,
            "Waiting for actor system shutdown"
        );
        let joined = self.inner.workers.join();

        self.inner.registry.release();
        for queue in &self.inner.queues {
            queue.release();
        }

        let stats = self.stats();
        info!(
            system_id = %self.inner.system_id,
            actors = stats.actors_spawned,
            messages_processed = stats.messages_processed,
            avg_processing_time_ns = stats.avg_processing_time_ns,
            "Actor system joined"
        );
        joined
    }

    /// Stop and join every worker when creation cannot complete
    fn abort_workers(&self) {
        self.shutdown_workers();
        if let Err(e) = self.inner.workers.join() {
            error!(
                system_id = %self.inner.system_id,
                error = %e,
                "Worker failed while aborting system creation"
            );
        }
    }

    /// Close every ready queue so idle workers wake and exit
    pub(crate) fn shutdown_workers(&self) {
        for queue in &self.inner.queues {
            queue.close();
        }
    }

    pub(crate) fn registry(&self) -> &ActorRegistry {
        &self.inner.registry
    }

    pub(crate) fn ready_queue(&self, worker: usize) -> &ReadyQueue {
        &self.inner.queues[worker]
    }

    pub(crate) fn metrics(&self) -> &SystemMetrics {
        &self.inner.metrics
    }

    pub fn system_id(&self) -> &str {
        &self.inner.system_id
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn pool_size(&self) -> usize {
        self.inner.config.pool_size
    }

    /// Number of actors ever created (0 after `join` released storage)
    pub fn actor_count(&self) -> usize {
        self.inner.registry.actor_count()
    }

    /// Messages waiting in `actor`'s mailbox
    pub fn pending_messages(&self, actor: ActorId) -> Result<usize> {
        let slot = self.inner.registry.resolve(actor)?;
        let len = slot.lock().mailbox.len();
        Ok(len)
    }

    pub fn actor_status(&self, actor: ActorId) -> Result<ActorStatus> {
        let slot = self.inner.registry.resolve(actor)?;
        let status = slot.lock().status;
        Ok(status)
    }

    /// False once every actor has been drained
    pub fn is_alive(&self) -> bool {
        self.inner.registry.is_alive()
    }

    pub fn global_state(&self) -> GlobalState {
        self.inner.registry.global_state()
    }

    pub fn stats(&self) -> SystemStats {
        self.inner.metrics.snapshot()
    }
}

impl fmt::Debug for ActorSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorSystem")
            .field("system_id", &self.inner.system_id)
            .field("pool_size", &self.inner.config.pool_size)
            .finish()
    }
}
