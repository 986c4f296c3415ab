//! Worker Pool
//!
//! Fixed set of OS threads. Worker `i` serves ready queue `i` for its whole
//! life, so every message for a given actor is handled by the same thread
//! in mailbox order. Workers exit when their queue is closed at quiescence.

use crate::context::{bind_worker, unbind_worker};
use crate::dispatch::{dispatch, Outcome};
use crate::error::{ActorError, Result};
use crate::global::Quiescence;
use crate::registry::{ActorId, ActorStatus};
use crate::system::ActorSystem;
use parking_lot::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Join handles of the running workers
#[derive(Debug, Default)]
pub(crate) struct WorkerPool {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start one worker per ready queue
    pub(crate) fn start(&self, system: &ActorSystem) -> Result<()> {
        let mut handles = self.handles.lock();
        for index in 0..system.pool_size() {
            let worker = Worker {
                index,
                system: system.clone(),
            };
            let spawned = thread::Builder::new()
                .name(format!("cacti-worker-{}", index))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    system.shutdown_workers();
                    for handle in handles.drain(..) {
                        let _ = handle.join();
                    }
                    return Err(ActorError::creation_with_source(
                        format!("failed to start worker {}", index),
                        e,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Wait for every worker to exit.
    ///
    /// Concurrent callers serialize on the handle list; later callers
    /// return once the first has joined everything.
    pub(crate) fn join(&self) -> Result<()> {
        let mut handles = self.handles.lock();
        let mut panicked = None;
        for (index, handle) in handles.drain(..).enumerate() {
            if handle.join().is_err() {
                error!(worker = index, "Worker thread panicked");
                panicked.get_or_insert(index);
            }
        }
        match panicked {
            Some(worker) => Err(ActorError::WorkerPanicked { worker }),
            None => Ok(()),
        }
    }
}

struct Worker {
    index: usize,
    system: ActorSystem,
}

impl Worker {
    fn run(self) {
        bind_worker(self.index);
        debug!(
            system_id = self.system.system_id(),
            worker = self.index,
            "Worker started"
        );

        let mut processed = 0u64;
        let mut carried = None;
        loop {
            let next = carried
                .take()
                .or_else(|| self.system.ready_queue(self.index).pop_blocking());
            let Some(actor) = next else { break };
            carried = self.process(actor);
            processed += 1;
        }

        unbind_worker();
        debug!(
            system_id = self.system.system_id(),
            worker = self.index,
            processed,
            "Worker exiting"
        );
    }

    /// Deliver exactly one message to `actor` and reschedule it if needed.
    ///
    /// Returns the actor when it still has messages but could not be put
    /// back on the ready queue; it stays scheduled and the caller serves it
    /// again before popping anything else.
    fn process(&self, actor: ActorId) -> Option<ActorId> {
        let slot = match self.system.registry().resolve(actor) {
            Ok(slot) => slot,
            Err(e) => {
                error!(worker = self.index, actor_id = %actor, error = %e, "Ready actor not in registry");
                return None;
            }
        };

        let (message, mut state) = {
            let mut core = slot.lock();
            match core.mailbox.pop() {
                Some(message) => (message, core.state.take().unwrap_or_default()),
                None => {
                    core.scheduled = false;
                    warn!(worker = self.index, actor_id = %actor, "Scheduled actor had an empty mailbox");
                    return None;
                }
            }
        };

        let start = Instant::now();
        let outcome = dispatch(&self.system, &slot, &mut state, message);
        self.system.metrics().record_message_handled(start.elapsed());

        let mut quiescence = Quiescence::Running;
        let mut carried = None;
        {
            let mut core = slot.lock();
            core.state = Some(state);
            if outcome == Outcome::Died && core.status == ActorStatus::Live {
                core.status = ActorStatus::Dead;
            }

            if !core.mailbox.is_empty() {
                // Round robin: back of the line behind other ready actors.
                if let Err(e) = self.system.ready_queue(self.index).push(actor) {
                    warn!(
                        worker = self.index,
                        actor_id = %actor,
                        error = %e,
                        "Failed to requeue actor, serving it again"
                    );
                    carried = Some(actor);
                }
            } else {
                core.scheduled = false;
                if core.status == ActorStatus::Dead {
                    core.status = ActorStatus::Drained;
                    core.state = None;
                    self.system.metrics().record_drained();
                    quiescence = self.system.registry().record_drained();
                    debug!(actor_id = %actor, "Actor drained");
                }
            }
        }

        if quiescence == Quiescence::Reached {
            info!(
                system_id = self.system.system_id(),
                worker = self.index,
                "All actors drained, shutting down workers"
            );
            self.system.shutdown_workers();
        }
        carried
    }
}
