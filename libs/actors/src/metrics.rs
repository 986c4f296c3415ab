//! System Metrics
//!
//! Lock-free counters updated on the send and dispatch paths, and the
//! snapshot type returned by `ActorSystem::stats`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// System-wide counters
#[derive(Debug, Default)]
pub struct SystemMetrics {
    pub actors_spawned: AtomicU64,
    pub actors_drained: AtomicU64,
    pub messages_sent: AtomicU64,
    pub messages_processed: AtomicU64,
    pub total_processing_time_ns: AtomicU64,

    // Rejections
    pub queue_full_events: AtomicU64,
    pub dead_actor_rejections: AtomicU64,

    // Failures inside the dispatch loop
    pub handler_failures: AtomicU64,
    pub unhandled_messages: AtomicU64,
    pub spawn_failures: AtomicU64,
}

impl SystemMetrics {
    pub fn record_message_handled(&self, duration: Duration) {
        self.messages_processed.fetch_add(1, Ordering::Relaxed);
        self.total_processing_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_sent(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_spawned(&self) {
        self.actors_spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_drained(&self) {
        self.actors_drained.fetch_add(1, Ordering::Relaxed);
    }

    /// Record mailbox full for backpressure monitoring
    pub fn record_queue_full(&self) {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dead_actor_rejection(&self) {
        self.dead_actor_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_handler_failure(&self) {
        self.handler_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unhandled(&self) {
        self.unhandled_messages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_spawn_failure(&self) {
        self.spawn_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn avg_processing_time_ns(&self) -> f64 {
        let count = self.messages_processed.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        let total = self.total_processing_time_ns.load(Ordering::Relaxed);
        total as f64 / count as f64
    }

    pub fn snapshot(&self) -> SystemStats {
        SystemStats {
            actors_spawned: self.actors_spawned.load(Ordering::Relaxed),
            actors_drained: self.actors_drained.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_processed: self.messages_processed.load(Ordering::Relaxed),
            avg_processing_time_ns: self.avg_processing_time_ns(),
            queue_full_events: self.queue_full_events.load(Ordering::Relaxed),
            dead_actor_rejections: self.dead_actor_rejections.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
            unhandled_messages: self.unhandled_messages.load(Ordering::Relaxed),
            spawn_failures: self.spawn_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of [`SystemMetrics`]
#[derive(Debug, Clone, PartialEq)]
pub struct SystemStats {
    pub actors_spawned: u64,
    pub actors_drained: u64,
    pub messages_sent: u64,
    pub messages_processed: u64,
    pub avg_processing_time_ns: f64,
    pub queue_full_events: u64,
    pub dead_actor_rejections: u64,
    pub handler_failures: u64,
    pub unhandled_messages: u64,
    pub spawn_failures: u64,
}

impl SystemStats {
    /// Messages accepted but not yet dispatched
    pub fn in_flight(&self) -> u64 {
        self.messages_sent.saturating_sub(self.messages_processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avg_processing_time() {
        let metrics = SystemMetrics::default();
        assert_eq!(metrics.avg_processing_time_ns(), 0.0);

        metrics.record_message_handled(Duration::from_nanos(100));
        metrics.record_message_handled(Duration::from_nanos(300));
        assert_eq!(metrics.avg_processing_time_ns(), 200.0);
    }

    #[test]
    fn test_snapshot() {
        let metrics = SystemMetrics::default();
        metrics.record_sent();
        metrics.record_sent();
        metrics.record_sent();
        metrics.record_message_handled(Duration::from_nanos(10));
        metrics.record_queue_full();
        metrics.record_dead_actor_rejection();
        metrics.record_spawned();
        metrics.record_drained();

        let stats = metrics.snapshot();
        assert_eq!(stats.messages_sent, 3);
        assert_eq!(stats.messages_processed, 1);
        assert_eq!(stats.in_flight(), 2);
        assert_eq!(stats.queue_full_events, 1);
        assert_eq!(stats.dead_actor_rejections, 1);
        assert_eq!(stats.actors_spawned, 1);
        assert_eq!(stats.actors_drained, 1);
        assert_eq!(stats.handler_failures, 0);
    }
}
