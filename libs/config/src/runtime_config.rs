//! Runtime Configuration Module
//!
//! Loads the sizing parameters of an actor system. Values come from an
//! optional TOML file, overridden by `CACTI_`-prefixed environment variables,
//! with compiled-in defaults for anything left unset.

use crate::defaults;
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Sizing parameters fixed for the lifetime of one actor system
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Worker thread count (P)
    pub pool_size: usize,

    /// Per-actor mailbox capacity (K)
    pub mailbox_capacity: usize,

    /// Upper bound on the number of actors ever created
    pub max_actors: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            pool_size: defaults::runtime::POOL_SIZE,
            mailbox_capacity: defaults::runtime::MAILBOX_CAPACITY,
            max_actors: defaults::runtime::MAX_ACTORS,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from an optional file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, defaults::env::PREFIX)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load using a custom environment prefix
    pub fn load_from(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading runtime config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator(defaults::env::NESTING_SEPARATOR)
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build runtime configuration")?
            .try_deserialize()
            .context("Failed to deserialize runtime configuration")?;

        config.validate()?;
        debug!(
            pool_size = config.pool_size,
            mailbox_capacity = config.mailbox_capacity,
            max_actors = config.max_actors,
            "Runtime configuration loaded"
        );
        Ok(config)
    }

    /// Reject sizes the runtime cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            bail!("pool_size must be at least 1");
        }
        if self.mailbox_capacity == 0 {
            bail!("mailbox_capacity must be at least 1");
        }
        if self.max_actors == 0 {
            bail!("max_actors must be at least 1");
        }
        Ok(())
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_mailbox_capacity(mut self, mailbox_capacity: usize) -> Self {
        self.mailbox_capacity = mailbox_capacity;
        self
    }

    pub fn with_max_actors(mut self, max_actors: usize) -> Self {
        self.max_actors = max_actors;
        self
    }
}
