//! Roles
//!
//! A role is the immutable handler table shared by every actor of one kind.
//! Handler `tag` receives `Message::User { tag, .. }`; tag 0 also receives
//! `Hello`.

use crate::context::Context;
use crate::error::{ActorError, Result};
use std::fmt;
use std::sync::Arc;

/// Handler invoked with the actor context and the message payload
pub type Handler = Arc<dyn Fn(&mut Context<'_>, &[u8]) -> anyhow::Result<()> + Send + Sync>;

/// Immutable dispatch table for one kind of actor
pub struct Role {
    name: String,
    handlers: Vec<Handler>,
}

impl Role {
    /// Build a role from an ordered handler table
    pub fn new(name: impl Into<String>, handlers: Vec<Handler>) -> Result<Self> {
        let name = name.into();
        if handlers.is_empty() {
            return Err(ActorError::creation(format!(
                "role '{}' has no handlers and cannot receive Hello",
                name
            )));
        }
        Ok(Self { name, handlers })
    }

    pub fn builder(name: impl Into<String>) -> RoleBuilder {
        RoleBuilder {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Handler for `tag`, if the table has one
    pub fn handler(&self, tag: usize) -> Option<&Handler> {
        self.handlers.get(tag)
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Role")
            .field("name", &self.name)
            .field("handler_count", &self.handlers.len())
            .finish()
    }
}

/// Appends handlers in tag order
pub struct RoleBuilder {
    name: String,
    handlers: Vec<Handler>,
}

impl RoleBuilder {
    /// Add the handler for the next tag (the first one handles Hello)
    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Context<'_>, &[u8]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(f));
        self
    }

    pub fn build(self) -> Result<Role> {
        Role::new(self.name, self.handlers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_role_rejected() {
        let err = Role::builder("empty").build().unwrap_err();
        assert_eq!(err.category(), "creation");
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_handlers_in_tag_order() {
        let role = Role::builder("worker")
            .handler(|_, _| Ok(()))
            .handler(|_, _| anyhow::bail!("second"))
            .build()
            .unwrap();

        assert_eq!(role.name(), "worker");
        assert_eq!(role.handler_count(), 2);
        assert!(role.handler(0).is_some());
        assert!(role.handler(1).is_some());
        assert!(role.handler(2).is_none());
    }

    #[test]
    fn test_debug_omits_closures() {
        let role = Role::builder("printer").handler(|_, _| Ok(())).build().unwrap();
        let debug = format!("{:?}", role);
        assert!(debug.contains("printer"));
        assert!(debug.contains("handler_count: 1"));
    }
}
