//! Command declarations and descriptors.
//!
//! A handler is registered together with a [`CommandSpec`], a loose
//! declaration whose required fields may be missing. The registry validates
//! it and turns it into an immutable [`CommandDescriptor`]; only the enabled
//! flag changes afterwards.
//!
//! ```rust,ignore
//! use herald_framework::command;
//!
//! let spec = command("/echo")
//!     .permission(1)
//!     .description("/echo some words");
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use crate::handler::BoxedHandler;
use crate::permission::PermissionLevel;

/// Description given to commands that do not declare one.
pub const DEFAULT_DESCRIPTION: &str = "The developer was lazy :)";

/// Starts a declaration for the command invoked by `prefix`.
pub fn command(prefix: impl Into<String>) -> CommandSpec {
    CommandSpec::new().prefix(prefix)
}

/// An unvalidated command declaration.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub(crate) prefix: Option<String>,
    pub(crate) level: Option<PermissionLevel>,
    pub(crate) description: Option<String>,
    pub(crate) lockable: bool,
}

impl Default for CommandSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandSpec {
    /// Creates an empty declaration.
    pub fn new() -> Self {
        Self {
            prefix: None,
            level: None,
            description: None,
            lockable: true,
        }
    }

    /// Sets the invocation prefix, e.g. `"/help"`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the permission level (`1`, `2`, `3` or a [`PermissionLevel`]).
    pub fn permission(mut self, level: impl Into<PermissionLevel>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Sets the human-readable description shown by `/docs`.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the command as never disableable.
    pub fn pinned(mut self) -> Self {
        self.lockable = false;
        self
    }
}

/// A validated command descriptor, owned by the registry.
#[derive(Debug)]
pub struct CommandDescriptor {
    prefix: String,
    level: PermissionLevel,
    description: String,
    lockable: bool,
    enabled: AtomicBool,
}

impl CommandDescriptor {
    pub(crate) fn new(
        prefix: String,
        level: PermissionLevel,
        description: Option<String>,
        lockable: bool,
    ) -> Self {
        Self {
            prefix,
            level,
            description: description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            lockable,
            enabled: AtomicBool::new(true),
        }
    }

    /// Returns the invocation prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the declared permission level.
    pub fn level(&self) -> PermissionLevel {
        self.level
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `false` for pinned commands that can never be disabled.
    pub fn is_lockable(&self) -> bool {
        self.lockable
    }

    /// Returns whether the command currently accepts invocations.
    ///
    /// Pinned commands always report `true`.
    pub fn is_enabled(&self) -> bool {
        !self.lockable || self.enabled.load(Ordering::Acquire)
    }

    /// Flips the enabled flag. Returns `false` if the command is pinned and
    /// `enabled` is `false`.
    pub(crate) fn set_enabled(&self, enabled: bool) -> bool {
        if !self.lockable && !enabled {
            return false;
        }
        self.enabled.store(enabled, Ordering::Release);
        true
    }
}

/// A descriptor bound to its handler.
pub struct RegisteredCommand {
    descriptor: CommandDescriptor,
    handler: BoxedHandler,
}

impl RegisteredCommand {
    pub(crate) fn new(descriptor: CommandDescriptor, handler: BoxedHandler) -> Self {
        Self {
            descriptor,
            handler,
        }
    }

    /// Returns the descriptor.
    pub fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    /// Returns the handler.
    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    /// Shortcut for `descriptor().prefix()`.
    pub fn prefix(&self) -> &str {
        self.descriptor.prefix()
    }
}

impl std::fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
