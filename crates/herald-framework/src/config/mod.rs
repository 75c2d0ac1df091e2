//! Bot configuration: the settings and privilege documents, the store they
//! are persisted in, and the versioned snapshot handle the gate reads from.

mod handle;
mod privilege;
mod settings;

pub use handle::{ConfigHandle, ConfigSnapshot, ConfigStore};
pub use privilege::PrivilegeGrant;
pub use settings::{DEFAULT_BOT_NAME, DEFAULT_LISTEN_HOST, DEFAULT_LISTEN_PORT, Role, Settings};
