//! The request pipeline.
//!
//! Every inbound event goes through [`Dispatcher::dispatch`]:
//!
//! 1. [`route`](Dispatcher::route) classifies the text: no message, chatter,
//!    a mention of the bot, an unknown command, or a registered command
//! 2. a mention of the bot is answered with a greeting
//! 3. a registered command is checked by the [`AuthorizationGate`]
//! 4. if allowed, the handler runs and the [`Effect`]s it returns are
//!    executed in order, with the follow-ups of each [`Effect::Query`]
//!    spliced in after it
//!
//! Delivery failures are logged and swallowed; nothing here ever fails the
//! inbound request.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use herald_core::{BoxedGateway, EventSink, InboundEvent, is_exact_mention, unescape_cq_text};
use tracing::{debug, error, info, instrument, warn};

use crate::command::RegisteredCommand;
use crate::config::{ConfigHandle, Settings};
use crate::context::InvocationContext;
use crate::effect::Effect;
use crate::error::{StoreError, StoreResult};
use crate::gate::{AuthorizationGate, DenyReason, Verdict};
use crate::registry::{CommandRegistry, Toggle};

/// The leading character marking a command.
pub const SIGIL: char = '/';

/// Reply sent when a privilege change could not be saved.
pub const PERSIST_FAILED: &str = "Could not save the privilege change, nothing was modified.";

/// Upper bound on gateway queries a single invocation may chain.
pub const MAX_QUERIES: usize = 256;

/// Why an event does not reach a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReason {
    /// The event carries no text.
    NoMessage,
    /// Ordinary conversation.
    Chatter,
    /// The text is exactly a mention of the bot.
    Mention,
    /// The text starts with the sigil but names no registered command.
    UnknownCommand,
}

/// The routing decision for one event.
#[derive(Debug)]
pub enum Route<'a> {
    /// The event does not invoke a command.
    Locked(LockReason),
    /// The event invokes `command`.
    Unlocked {
        /// The matched command.
        command: &'a RegisteredCommand,
        /// The unescaped command text.
        text: String,
    },
}

/// What [`Dispatcher::dispatch`] did with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Nothing was done.
    Ignored(LockReason),
    /// The bot was mentioned and replied with a greeting.
    Greeted,
    /// The gate refused the request.
    Denied(DenyReason),
    /// The handler ran and its effects were executed.
    Invoked {
        /// The invoked prefix.
        prefix: String,
        /// The effects returned by the handler.
        effects: Vec<Effect>,
    },
}

/// Routes inbound events to command handlers.
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    config: Arc<ConfigHandle>,
    gateway: BoxedGateway,
    gate: AuthorizationGate,
}

impl Dispatcher {
    /// Creates a dispatcher.
    pub fn new(
        registry: Arc<CommandRegistry>,
        config: Arc<ConfigHandle>,
        gateway: BoxedGateway,
    ) -> Self {
        Self {
            registry,
            config,
            gateway,
            gate: AuthorizationGate::new(),
        }
    }

    /// Returns the registry.
    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Returns the configuration handle.
    pub fn config(&self) -> &Arc<ConfigHandle> {
        &self.config
    }

    /// Classifies `event`.
    pub fn route(&self, event: &InboundEvent, settings: &Settings) -> Route<'_> {
        let Some(raw) = event.text() else {
            return Route::Locked(LockReason::NoMessage);
        };

        if !raw.starts_with(SIGIL) {
            return if is_exact_mention(raw, settings.bot_id) {
                Route::Locked(LockReason::Mention)
            } else {
                Route::Locked(LockReason::Chatter)
            };
        }

        let text = unescape_cq_text(raw);
        let prefix = text.split(' ').next().unwrap_or_default();
        match self.registry.lookup(prefix) {
            Some(command) => Route::Unlocked { command, text },
            None => Route::Locked(LockReason::UnknownCommand),
        }
    }

    /// Processes one inbound event.
    #[instrument(skip_all, fields(sender = event.sender_id, message_id = event.message_id))]
    pub async fn dispatch(&self, event: &InboundEvent) -> DispatchOutcome {
        let current = self.config.current();
        let (command, text) = match self.route(event, &current.settings) {
            Route::Locked(LockReason::Mention) => {
                let settings = &current.settings;
                let greeting = format!(
                    "Hi {}! I'm {}, at your service. Send /info to learn more about me, or ask my owner ({}).",
                    event.sender_nickname(),
                    settings.bot_name,
                    settings.owner_id
                );
                self.reply(event, &greeting).await;
                return DispatchOutcome::Greeted;
            }
            Route::Locked(reason) => {
                debug!(?reason, "Event ignored");
                return DispatchOutcome::Ignored(reason);
            }
            Route::Unlocked { command, text } => (command, text),
        };
        drop(current);

        let prefix = command.prefix();
        let checked = self.gate.check(event.sender_id, command.descriptor(), &self.config);
        match checked.verdict {
            Verdict::Deny(denial) => {
                self.reply(event, &denial.notice).await;
                DispatchOutcome::Denied(denial.reason)
            }
            Verdict::Allow { notice } => {
                if let Some(notice) = notice {
                    self.reply(event, &notice).await;
                }

                let args = text[prefix.len()..].trim();
                let ctx = InvocationContext::new(
                    event,
                    &text,
                    args,
                    command,
                    &self.registry,
                    &checked.snapshot,
                );
                info!(prefix, "Invoking command");
                let effects = command.handler().invoke(&ctx);

                self.run_effects(event, effects.clone()).await;

                DispatchOutcome::Invoked {
                    prefix: prefix.to_string(),
                    effects,
                }
            }
        }
    }

    /// Executes `effects` in order. A query's follow-ups run right after it.
    async fn run_effects(&self, event: &InboundEvent, effects: Vec<Effect>) {
        let mut pending = VecDeque::from(effects);
        let mut queries = 0;
        while let Some(effect) = pending.pop_front() {
            if let Effect::Query { action, params, then } = effect {
                queries += 1;
                if queries > MAX_QUERIES {
                    warn!(action = %action, "Too many chained queries, dropping the rest");
                    break;
                }
                let response = match self.gateway.call_api(&action, params).await {
                    Ok(data) => Some(data),
                    Err(e) => {
                        warn!(error = %e, action = %action, "Gateway query failed");
                        None
                    }
                };
                for next in then.call(response).into_iter().rev() {
                    pending.push_front(next);
                }
            } else if !self.apply(event, &effect).await {
                break;
            }
        }
    }

    /// Performs one effect. Returns `false` when the remaining effects of
    /// the invocation must be skipped.
    async fn apply(&self, event: &InboundEvent, effect: &Effect) -> bool {
        match effect {
            Effect::Reply(text) => self.reply(event, text).await,
            Effect::SetEnabled { prefix, enabled } => {
                match self.registry.set_enabled(prefix, *enabled) {
                    Toggle::Applied => info!(prefix = %prefix, enabled, "Command toggled"),
                    Toggle::Unknown => warn!(prefix = %prefix, "Toggle of unknown command"),
                    Toggle::Pinned => warn!(prefix = %prefix, "Refused to disable pinned command"),
                }
            }
            Effect::Grant { users, prefix } => {
                match self.update_privilege(users, prefix, true).await {
                    Ok(()) => info!(prefix = %prefix, ?users, "Privilege granted"),
                    Err(e) => {
                        error!(error = %e, prefix = %prefix, "Failed to persist grant");
                        self.reply(event, PERSIST_FAILED).await;
                        return false;
                    }
                }
            }
            Effect::Revoke { users, prefix } => {
                match self.update_privilege(users, prefix, false).await {
                    Ok(()) => info!(prefix = %prefix, ?users, "Privilege revoked"),
                    Err(e) => {
                        error!(error = %e, prefix = %prefix, "Failed to persist revocation");
                        self.reply(event, PERSIST_FAILED).await;
                        return false;
                    }
                }
            }
            Effect::CallApi { action, params } => {
                if let Err(e) = self.gateway.call_api(action, params.clone()).await {
                    warn!(error = %e, action = %action, "Gateway call failed");
                }
            }
            Effect::Query { action, .. } => {
                warn!(action = %action, "Query reached apply, ignoring");
            }
        }
        true
    }

    /// Grants or revokes `prefix` for `users` on the blocking pool.
    async fn update_privilege(&self, users: &[i64], prefix: &str, grant: bool) -> StoreResult<()> {
        let config = self.config.clone();
        let users = users.to_vec();
        let prefix = prefix.to_string();
        tokio::task::spawn_blocking(move || {
            config.update_privilege(|privilege| {
                for user in &users {
                    if grant {
                        privilege.grant(*user, &prefix);
                    } else {
                        privilege.revoke(*user, &prefix);
                    }
                }
            })
        })
        .await
        .map_err(StoreError::Task)?
    }

    async fn reply(&self, event: &InboundEvent, text: &str) {
        if let Err(e) = self.gateway.reply(event, text).await {
            warn!(error = %e, "Failed to deliver reply");
        }
    }
}

#[async_trait]
impl EventSink for Dispatcher {
    async fn on_event(&self, event: InboundEvent) {
        self.dispatch(&event).await;
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
