//! Per-user privilege grants.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Owner-managed exceptions: user id → prefixes the user may invoke
/// regardless of their role.
///
/// Serialized as a JSON object with string keys and array values. Users
/// whose set becomes empty are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrivilegeGrant(BTreeMap<i64, BTreeSet<String>>);

impl PrivilegeGrant {
    /// Creates an empty grant list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `user_id` holds an exact grant for `prefix`.
    pub fn allows(&self, user_id: i64, prefix: &str) -> bool {
        self.0
            .get(&user_id)
            .is_some_and(|prefixes| prefixes.contains(prefix))
    }

    /// Grants `prefix` to `user_id`. Returns `false` if already held.
    pub fn grant(&mut self, user_id: i64, prefix: &str) -> bool {
        self.0.entry(user_id).or_default().insert(prefix.to_string())
    }

    /// Revokes `prefix` from `user_id`. Returns `false` if it was not held.
    pub fn revoke(&mut self, user_id: i64, prefix: &str) -> bool {
        let Some(prefixes) = self.0.get_mut(&user_id) else {
            return false;
        };
        let removed = prefixes.remove(prefix);
        if prefixes.is_empty() {
            self.0.remove(&user_id);
        }
        removed
    }

    /// Returns the prefixes granted to `user_id`.
    pub fn prefixes(&self, user_id: i64) -> impl Iterator<Item = &str> {
        self.0
            .get(&user_id)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Iterates `(user_id, prefixes)` in ascending user order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &BTreeSet<String>)> {
        self.0.iter().map(|(id, set)| (*id, set))
    }

    /// Returns `true` if nobody holds a grant.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_revoke() {
        let mut grants = PrivilegeGrant::new();
        assert!(grants.grant(42, "/system"));
        assert!(!grants.grant(42, "/system"));
        assert!(grants.allows(42, "/system"));
        assert!(!grants.allows(42, "/system2"));
        assert!(!grants.allows(43, "/system"));

        assert!(grants.revoke(42, "/system"));
        assert!(!grants.revoke(42, "/system"));
        assert!(grants.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut grants = PrivilegeGrant::new();
        grants.grant(42, "/b");
        grants.grant(42, "/a");
        let json = serde_json::to_value(&grants).unwrap();
        assert_eq!(json, serde_json::json!({ "42": ["/a", "/b"] }));

        let parsed: PrivilegeGrant = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, grants);
        assert_eq!(parsed.prefixes(42).collect::<Vec<_>>(), vec!["/a", "/b"]);
    }
}
