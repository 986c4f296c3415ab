//! # Cacti Runtime Configuration
//!
//! Sizing configuration and defaults for the actor runtime.
//!
//! ## Usage
//!
//! ```rust
//! use cacti_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::default().with_pool_size(4);
//! assert!(config.validate().is_ok());
//! ```

pub mod defaults;
pub mod runtime_config;

pub use runtime_config::RuntimeConfig;
