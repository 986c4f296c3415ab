//! Common Test Utilities for the actor runtime
//!
//! Shared config builders, tracing setup and an event log that handlers
//! append to from worker threads.

#![allow(dead_code)]

use cacti_actors::{ActorId, ActorSystem, Role};
use cacti_config::RuntimeConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Route runtime logs through the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub fn config(pool_size: usize, mailbox_capacity: usize) -> RuntimeConfig {
    RuntimeConfig::default()
        .with_pool_size(pool_size)
        .with_mailbox_capacity(mailbox_capacity)
        .with_max_actors(4096)
}

pub fn start(config: RuntimeConfig, role: Role) -> (ActorSystem, ActorId) {
    init_tracing();
    ActorSystem::create_with_config(config, role).expect("system should start")
}

/// Ordered record of what handlers observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Hello { actor: ActorId, parent: Option<ActorId> },
    User { actor: ActorId, tag: usize, seq: u64 },
}

#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.events.lock().push(event);
    }

    pub fn snapshot(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// User sequence numbers seen by `actor`, in delivery order
    pub fn user_seqs(&self, actor: ActorId) -> Vec<u64> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::User { actor: a, seq, .. } if *a == actor => Some(*seq),
                _ => None,
            })
            .collect()
    }
}

pub fn encode_seq(seq: u64) -> [u8; 8] {
    seq.to_le_bytes()
}

pub fn decode_seq(payload: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&payload[..8]);
    u64::from_le_bytes(bytes)
}

/// Poll `condition` until it holds or `timeout` elapses
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    condition()
}
