//! The global settings document.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Bot name used when the settings document does not set one.
pub const DEFAULT_BOT_NAME: &str = "Herald";
/// Host the inbound HTTP server binds to by default.
pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";
/// Port the inbound HTTP server binds to by default.
pub const DEFAULT_LISTEN_PORT: u16 = 8080;

/// The role a user plays relative to the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Anyone else.
    Member,
    /// Listed in `manager_ids`.
    Manager,
    /// The single owner.
    Owner,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Manager => write!(f, "manager"),
            Self::Owner => write!(f, "owner"),
        }
    }
}

/// Global bot settings, read from the settings document.
///
/// The original key names of the document (`owner_qq_account_uid`,
/// `http_service_listening_socke`, ...) are accepted as aliases, and ids may
/// be written either as numbers or as numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// The owner's user id.
    #[serde(alias = "owner_qq_account_uid", deserialize_with = "de_id")]
    pub owner_id: i64,

    /// Manager user ids.
    #[serde(
        alias = "managers_qq_account_uid",
        default,
        deserialize_with = "de_id_set"
    )]
    pub manager_ids: BTreeSet<i64>,

    /// The bot's own user id, used to detect mentions.
    #[serde(alias = "bot_qq_account_uid", deserialize_with = "de_id")]
    pub bot_id: i64,

    /// Display name used in greetings.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    /// `host:port` of the gateway's HTTP API.
    #[serde(alias = "http_service_listening_socke")]
    pub gateway_socket: String,

    /// Host the inbound HTTP server binds to.
    #[serde(alias = "http_app_host", default = "default_listen_host")]
    pub listen_host: String,

    /// Port the inbound HTTP server binds to.
    #[serde(alias = "http_app_port", default = "default_listen_port")]
    pub listen_port: u16,
}

fn default_bot_name() -> String {
    DEFAULT_BOT_NAME.to_string()
}

fn default_listen_host() -> String {
    DEFAULT_LISTEN_HOST.to_string()
}

fn default_listen_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

impl Settings {
    /// Creates settings with no managers and default listen address.
    pub fn new(owner_id: i64, bot_id: i64, gateway_socket: impl Into<String>) -> Self {
        Self {
            owner_id,
            manager_ids: BTreeSet::new(),
            bot_id,
            bot_name: default_bot_name(),
            gateway_socket: gateway_socket.into(),
            listen_host: default_listen_host(),
            listen_port: default_listen_port(),
        }
    }

    /// Adds a manager.
    pub fn with_manager(mut self, user_id: i64) -> Self {
        self.manager_ids.insert(user_id);
        self
    }

    /// Sets the bot name.
    pub fn with_bot_name(mut self, name: impl Into<String>) -> Self {
        self.bot_name = name.into();
        self
    }

    /// Returns `true` if `user_id` is the owner.
    pub fn is_owner(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }

    /// Returns `true` if `user_id` is a manager.
    pub fn is_manager(&self, user_id: i64) -> bool {
        self.manager_ids.contains(&user_id)
    }

    /// Classifies `user_id`. The owner wins over a manager listing.
    pub fn role(&self, user_id: i64) -> Role {
        if self.is_owner(user_id) {
            Role::Owner
        } else if self.is_manager(user_id) {
            Role::Manager
        } else {
            Role::Member
        }
    }

    /// Returns the `host:port` the inbound server listens on.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.listen_port)
    }
}

// =============================================================================
// Lenient id parsing
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Number(i64),
    Text(String),
}

impl IdRepr {
    fn into_id<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            Self::Number(id) => Ok(id),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a numeric id, got \"{text}\""))),
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    IdRepr::deserialize(deserializer)?.into_id()
}

fn de_id_set<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<i64>, D::Error> {
    Vec::<IdRepr>::deserialize(deserializer)?
        .into_iter()
        .map(IdRepr::into_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_original_key_names() {
        let settings: Settings = serde_json::from_value(json!({
            "owner_qq_account_uid": "10001",
            "managers_qq_account_uid": ["10002", 10003],
            "bot_qq_account_uid": 30003,
            "bot_name": "Xiao",
            "http_service_listening_socke": "127.0.0.1:3000",
            "http_app_host": "127.0.0.1",
            "http_app_port": 5000
        }))
        .unwrap();

        assert_eq!(settings.owner_id, 10001);
        assert_eq!(settings.manager_ids, BTreeSet::from([10002, 10003]));
        assert_eq!(settings.bot_id, 30003);
        assert_eq!(settings.bot_name, "Xiao");
        assert_eq!(settings.gateway_socket, "127.0.0.1:3000");
        assert_eq!(settings.listen_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn test_defaults() {
        let settings: Settings = serde_json::from_value(json!({
            "owner_id": 1,
            "bot_id": 2,
            "gateway_socket": "127.0.0.1:3000"
        }))
        .unwrap();
        assert!(settings.manager_ids.is_empty());
        assert_eq!(settings.bot_name, DEFAULT_BOT_NAME);
        assert_eq!(settings.listen_host, DEFAULT_LISTEN_HOST);
        assert_eq!(settings.listen_port, DEFAULT_LISTEN_PORT);
    }

    #[test]
    fn test_non_numeric_id_rejected() {
        let result: Result<Settings, _> = serde_json::from_value(json!({
            "owner_id": "abc",
            "bot_id": 2,
            "gateway_socket": "x"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_roles() {
        let settings = Settings::new(1, 9, "x").with_manager(2).with_manager(1);
        assert_eq!(settings.role(1), Role::Owner);
        assert_eq!(settings.role(2), Role::Manager);
        assert_eq!(settings.role(3), Role::Member);
    }
}
