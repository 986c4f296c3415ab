//! Global termination state
//!
//! Counters behind shutdown detection. No actor coordinates termination;
//! the system stops when every actor it ever created is dead with an empty
//! mailbox. Always mutated under the registry's global lock; callers
//! outside the crate only see snapshots.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalState {
    number_of_actors: usize,
    number_of_dead_and_finished_actors: usize,
    is_alive: bool,
}

/// Effect of recording one drained actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quiescence {
    /// Other actors are still running
    Running,
    /// This was the last actor; the system just stopped
    Reached,
}

impl GlobalState {
    /// State for a system holding only its root actor
    pub(crate) fn with_root() -> Self {
        Self {
            number_of_actors: 1,
            number_of_dead_and_finished_actors: 0,
            is_alive: true,
        }
    }

    pub(crate) fn actor_added(&mut self) {
        debug_assert!(self.is_alive, "actor added after shutdown");
        self.number_of_actors += 1;
    }

    /// Count one actor as drained; flips `is_alive` when all are
    pub(crate) fn actor_drained(&mut self) -> Quiescence {
        debug_assert!(self.number_of_dead_and_finished_actors < self.number_of_actors);
        self.number_of_dead_and_finished_actors += 1;
        if self.is_alive && self.number_of_dead_and_finished_actors == self.number_of_actors {
            self.is_alive = false;
            return Quiescence::Reached;
        }
        Quiescence::Running
    }

    pub fn number_of_actors(&self) -> usize {
        self.number_of_actors
    }

    pub fn number_of_dead_and_finished_actors(&self) -> usize {
        self.number_of_dead_and_finished_actors
    }

    pub fn is_alive(&self) -> bool {
        self.is_alive
    }
}
