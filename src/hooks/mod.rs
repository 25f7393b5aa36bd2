//! Mutation hooks - side effects run before a registry change is committed
//!
//! The registry knows what is about to change; hooks decide what to do about
//! it. Persistence is registered here rather than wired into the registry, so
//! the backing store can be swapped without touching registry logic. A hook
//! that fails vetoes the change.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::types::Course;

/// Kind of change being applied to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Added,
    Updated,
    Removed,
    Replaced,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationKind::Added => write!(f, "added"),
            MutationKind::Updated => write!(f, "updated"),
            MutationKind::Removed => write!(f, "removed"),
            MutationKind::Replaced => write!(f, "replaced"),
        }
    }
}

/// What a hook sees for a pending mutation
#[derive(Debug, Clone, Copy)]
pub struct MutationEvent<'a> {
    pub kind: MutationKind,
    /// Full registry contents once the mutation is committed
    pub courses: &'a [Course],
}

impl<'a> MutationEvent<'a> {
    pub fn new(kind: MutationKind, courses: &'a [Course]) -> Self {
        Self { kind, courses }
    }
}

/// Type alias for hook handler functions
pub type HookFn = Arc<dyn Fn(&MutationEvent<'_>) -> Result<()> + Send + Sync>;

/// A registered hook with metadata
struct RegisteredHook {
    name: String,
    handler: HookFn,
}

/// Mutation hooks, fired in registration order
#[derive(Default)]
pub struct MutationHooks {
    hooks: Vec<RegisteredHook>,
}

impl MutationHooks {
    /// Create a new empty hook list
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook after the existing ones
    pub fn register(&mut self, name: &str, handler: HookFn) {
        self.hooks.push(RegisteredHook {
            name: name.to_string(),
            handler,
        });
        debug!("Registered mutation hook '{}'", name);
    }

    /// Fire every hook in order.
    ///
    /// A failing hook does not stop the ones after it; the first failure is
    /// returned once all have run.
    pub fn fire(&self, event: &MutationEvent<'_>) -> Result<()> {
        let mut first_error = None;

        for hook in &self.hooks {
            if let Err(e) = (hook.handler)(event) {
                warn!("Mutation hook '{}' failed for {}: {:#}", hook.name, event.kind, e);
                if first_error.is_none() {
                    first_error = Some(e.context(format!("hook '{}' failed", hook.name)));
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Get count of registered hooks
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl std::fmt::Debug for MutationHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.hooks.iter().map(|h| h.name.as_str()).collect();
        f.debug_struct("MutationHooks").field("hooks", &names).finish()
    }
}
