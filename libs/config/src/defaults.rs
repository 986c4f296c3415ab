//! Runtime defaults
//!
//! Default sizing values for an actor system and the environment variable
//! layout used to override them.

/// Scheduler and actor table sizing
pub mod runtime {
    /// Number of worker threads in the pool
    pub const POOL_SIZE: usize = 3;

    /// Per-actor mailbox capacity (messages)
    pub const MAILBOX_CAPACITY: usize = 1024;

    /// Maximum number of actors one system may ever create
    pub const MAX_ACTORS: usize = 1_048_576;
}

/// Environment variable layout
pub mod env {
    /// Prefix for overrides, e.g. `CACTI_POOL_SIZE=8`
    pub const PREFIX: &str = "CACTI";

    /// Separator between nested keys
    pub const NESTING_SEPARATOR: &str = "__";
}
