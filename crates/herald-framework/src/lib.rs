//! # Herald Framework
//!
//! The command pipeline of a Herald bot:
//!
//! - [`RegistryBuilder`] / [`CommandRegistry`]: prefix → descriptor + handler,
//!   built once at startup with every registration error collected
//! - [`AuthorizationGate`]: owner / manager / privilege-grant checks plus the
//!   per-command enabled switch
//! - [`ConfigHandle`]: versioned, atomically swapped configuration snapshots
//!   backed by a [`ConfigStore`]
//! - [`Dispatcher`]: routes each inbound event, authorizes it, invokes the
//!   handler and executes the [`Effect`]s it returns
//! - [`builtin`]: the administrative commands (`/help`, `/docs`, `/start`,
//!   `/stop`, `/power`, `/recall`)
//!
//! ```text
//! InboundEvent ─▶ Dispatcher::route ─▶ CommandRegistry::lookup
//!                                          │
//!               Gateway ◀─ effects ◀─ handler ◀─ AuthorizationGate::check
//! ```

pub mod builtin;
pub mod command;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod effect;
pub mod error;
pub mod gate;
pub mod handler;
pub mod permission;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{CommandDescriptor, CommandSpec, RegisteredCommand, command};
pub use config::{
    ConfigHandle, ConfigSnapshot, ConfigStore, PrivilegeGrant, Role, Settings,
};
pub use context::InvocationContext;
pub use dispatcher::{DispatchOutcome, Dispatcher, LockReason, Route, SIGIL};
pub use effect::{Effect, Then};
pub use error::{RegistrationError, RegistrationErrors, StoreError, StoreResult};
pub use gate::{AuthorizationGate, Checked, Denial, DenyReason, Verdict};
pub use handler::{BoxedHandler, CommandHandler, handler_fn};
pub use permission::PermissionLevel;
pub use registry::{CommandRegistry, RegistryBuilder, Toggle};
