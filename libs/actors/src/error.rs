//! Actor Runtime Error Types
//!
//! Every failure the runtime can report to a caller. Send-time errors are
//! returned synchronously and never retried; growth and limit failures are
//! propagated instead of aborting the process.

use crate::registry::ActorId;
use std::collections::TryReserveError;
use thiserror::Error;

/// Main runtime error type
#[derive(Error, Debug)]
pub enum ActorError {
    /// Target id was never assigned
    #[error("Invalid actor id: {actor} (system has {actor_count} actors)")]
    ActorIdInvalid { actor: ActorId, actor_count: usize },

    /// Target has processed Die and accepts no more messages
    #[error("Actor {actor} is dead")]
    ActorDead { actor: ActorId },

    /// Target mailbox is at capacity
    #[error("Mailbox of {actor} is full (capacity {capacity})")]
    QueueFull { actor: ActorId, capacity: usize },

    /// Bad arguments to system or role creation
    #[error("Creation error: {message}")]
    Creation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid runtime configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// A growable structure could not allocate
    #[error("Allocation failure: {resource}: {source}")]
    AllocationFailure {
        resource: String,
        source: TryReserveError,
    },

    /// A configured hard limit was reached
    #[error("Resource exhausted: {resource} (limit {limit})")]
    ResourceExhausted { resource: String, limit: usize },

    /// The system already reached quiescence
    #[error("Actor system has shut down")]
    SystemHalted,

    /// A worker thread panicked outside of handler isolation
    #[error("Worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    /// API used from a context where it cannot work
    #[error("Usage error: {message}")]
    Usage { message: String },
}

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, ActorError>;

impl ActorError {
    /// Create a creation error
    pub fn creation(message: impl Into<String>) -> Self {
        Self::Creation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a creation error with source
    pub fn creation_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Creation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::Configuration {
            message: message.into(),
            field: field.map(|s| s.to_string()),
        }
    }

    /// Create an allocation failure
    pub fn allocation(resource: impl Into<String>, source: TryReserveError) -> Self {
        Self::AllocationFailure {
            resource: resource.into(),
            source,
        }
    }

    /// Create a resource exhausted error
    pub fn exhausted(resource: impl Into<String>, limit: usize) -> Self {
        Self::ResourceExhausted {
            resource: resource.into(),
            limit,
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Short category name for structured logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::ActorIdInvalid { .. } => "actor_id_invalid",
            Self::ActorDead { .. } => "actor_dead",
            Self::QueueFull { .. } => "queue_full",
            Self::Creation { .. } => "creation",
            Self::Configuration { .. } => "configuration",
            Self::AllocationFailure { .. } => "allocation",
            Self::ResourceExhausted { .. } => "resource_exhausted",
            Self::SystemHalted => "system_halted",
            Self::WorkerPanicked { .. } => "worker_panicked",
            Self::Usage { .. } => "usage",
        }
    }

    /// Whether retrying the same call later could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::QueueFull { .. } | Self::AllocationFailure { .. })
    }
}
