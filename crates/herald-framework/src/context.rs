//! Per-request invocation context.

use herald_core::InboundEvent;

use crate::command::RegisteredCommand;
use crate::config::{ConfigSnapshot, Role, Settings};
use crate::registry::CommandRegistry;

/// Everything a handler may read while computing its effects.
///
/// The snapshot is the one the gate authorized the call against, so a
/// handler sees the same configuration the decision was based on.
#[derive(Debug, Clone, Copy)]
pub struct InvocationContext<'a> {
    event: &'a InboundEvent,
    text: &'a str,
    args: &'a str,
    command: &'a RegisteredCommand,
    registry: &'a CommandRegistry,
    snapshot: &'a ConfigSnapshot,
}

impl<'a> InvocationContext<'a> {
    /// Creates a context. `text` is the unescaped command text and `args`
    /// the part after the prefix.
    pub fn new(
        event: &'a InboundEvent,
        text: &'a str,
        args: &'a str,
        command: &'a RegisteredCommand,
        registry: &'a CommandRegistry,
        snapshot: &'a ConfigSnapshot,
    ) -> Self {
        Self {
            event,
            text,
            args,
            command,
            registry,
            snapshot,
        }
    }

    /// The originating event.
    pub fn event(&self) -> &'a InboundEvent {
        self.event
    }

    /// The full unescaped command text, e.g. `"/echo [hi]"`.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Everything after the prefix, trimmed.
    pub fn args(&self) -> &'a str {
        self.args
    }

    /// The command being invoked.
    pub fn command(&self) -> &'a RegisteredCommand {
        self.command
    }

    /// The registry, for introspection.
    pub fn registry(&self) -> &'a CommandRegistry {
        self.registry
    }

    /// The configuration snapshot.
    pub fn snapshot(&self) -> &'a ConfigSnapshot {
        self.snapshot
    }

    /// Shortcut for `snapshot().settings`.
    pub fn settings(&self) -> &'a Settings {
        &self.snapshot.settings
    }

    /// The sender's user id.
    pub fn sender_id(&self) -> i64 {
        self.event.sender_id
    }

    /// The sender's role.
    pub fn role(&self) -> Role {
        self.snapshot.settings.role(self.event.sender_id)
    }
}
