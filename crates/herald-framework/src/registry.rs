//! The command registry.
//!
//! Registration happens once at startup through a [`RegistryBuilder`]. Every
//! declaration is validated, and all contract violations are collected so a
//! developer sees the complete list in one run:
//!
//! ```rust,ignore
//! let mut builder = RegistryBuilder::new();
//! builder.register(command("/echo").permission(1), echo);
//! builder.register(command("/echo").permission(2), other); // duplicate
//! let registry = builder.build()?; // Err with every problem found
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::command::{CommandDescriptor, CommandSpec, RegisteredCommand};
use crate::dispatcher::SIGIL;
use crate::error::{RegistrationError, RegistrationErrors};
use crate::handler::{BoxedHandler, CommandHandler};

/// Result of a [`CommandRegistry::set_enabled`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The flag was updated.
    Applied,
    /// No command is registered under that prefix.
    Unknown,
    /// The command is pinned and cannot be disabled.
    Pinned,
}

/// Collects command registrations.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<(CommandSpec, BoxedHandler)>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a handler under `spec`.
    ///
    /// Validation is deferred to [`build`](Self::build).
    pub fn register<H: CommandHandler>(&mut self, spec: CommandSpec, handler: H) -> &mut Self {
        self.entries.push((spec, Arc::new(handler)));
        self
    }

    /// Registers a handler under `spec` (builder pattern).
    pub fn with<H: CommandHandler>(mut self, spec: CommandSpec, handler: H) -> Self {
        self.register(spec, handler);
        self
    }

    /// Returns the number of registrations so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validates every registration and builds the registry.
    ///
    /// Returns all errors found, not just the first.
    pub fn build(self) -> Result<CommandRegistry, RegistrationErrors> {
        let mut errors = Vec::new();
        let mut commands = Vec::with_capacity(self.entries.len());
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (position, (spec, handler)) in self.entries.into_iter().enumerate() {
            let Some(prefix) = spec.prefix else {
                errors.push(RegistrationError::MissingPrefix { index: position });
                continue;
            };

            if let Some(reason) = prefix_defect(&prefix) {
                errors.push(RegistrationError::InvalidPrefix {
                    prefix: prefix.clone(),
                    reason,
                });
            }

            let Some(level) = spec.level else {
                errors.push(RegistrationError::MissingPermission { prefix });
                continue;
            };

            if let Some(&first) = positions.get(&prefix) {
                errors.push(RegistrationError::DuplicatePrefix {
                    prefix,
                    first,
                    second: position,
                });
                continue;
            }
            positions.insert(prefix.clone(), position);

            debug!(prefix = %prefix, level = %level, "Registered command");
            index.insert(prefix.clone(), commands.len());
            commands.push(RegisteredCommand::new(
                CommandDescriptor::new(prefix, level, spec.description, spec.lockable),
                handler,
            ));
        }

        if errors.is_empty() {
            Ok(CommandRegistry { commands, index })
        } else {
            Err(RegistrationErrors(errors))
        }
    }
}

fn prefix_defect(prefix: &str) -> Option<&'static str> {
    if !prefix.starts_with(SIGIL) {
        Some("must start with '/'")
    } else if prefix.chars().count() < 2 {
        Some("must name a command after '/'")
    } else if prefix.chars().any(char::is_whitespace) {
        Some("must not contain whitespace")
    } else {
        None
    }
}

/// The immutable set of registered commands.
///
/// Only the per-command enabled flag changes after startup.
pub struct CommandRegistry {
    commands: Vec<RegisteredCommand>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Looks up the command registered under `prefix`.
    pub fn lookup(&self, prefix: &str) -> Option<&RegisteredCommand> {
        self.index.get(prefix).map(|&i| &self.commands[i])
    }

    /// Returns `true` if `prefix` is registered.
    pub fn contains(&self, prefix: &str) -> bool {
        self.index.contains_key(prefix)
    }

    /// Iterates `(prefix, descriptor)` pairs in registration order.
    pub fn list(&self) -> impl Iterator<Item = (&str, &CommandDescriptor)> {
        self.commands.iter().map(|c| (c.prefix(), c.descriptor()))
    }

    /// Iterates the registered commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &RegisteredCommand> {
        self.commands.iter()
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Enables or disables the command registered under `prefix`.
    pub fn set_enabled(&self, prefix: &str, enabled: bool) -> Toggle {
        match self.lookup(prefix) {
            None => Toggle::Unknown,
            Some(cmd) if cmd.descriptor().set_enabled(enabled) => Toggle::Applied,
            Some(_) => Toggle::Pinned,
        }
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("command_count", &self.commands.len())
            .finish()
    }
}
