//! The authorization gate.
//!
//! Decides whether a sender may invoke a command. The enabled switch is
//! checked before anything else, so a disabled command is refused even to
//! the owner. Privilege grants only ever match the exact prefix for the
//! exact user id.

use std::sync::Arc;

use tracing::{error, warn};

use crate::command::CommandDescriptor;
use crate::config::{ConfigHandle, ConfigSnapshot};
use crate::permission::PermissionLevel;

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The command is switched off.
    Disabled,
    /// The sender's role is too low and no grant applies.
    InsufficientPrivilege,
    /// The command declares a malformed level and the sender is not the owner.
    Misconfigured,
}

/// A refusal together with the reply the sender receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    /// The reason.
    pub reason: DenyReason,
    /// The user-facing notice.
    pub notice: String,
}

/// The gate's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Invoke the handler, after sending `notice` if present.
    Allow {
        /// A warning delivered before the handler runs.
        notice: Option<String>,
    },
    /// Do not invoke the handler.
    Deny(Denial),
}

impl Verdict {
    fn allow() -> Self {
        Self::Allow { notice: None }
    }

    fn deny(reason: DenyReason, notice: String) -> Self {
        Self::Deny(Denial { reason, notice })
    }

    /// Returns `true` for [`Allow`](Self::Allow).
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }
}

/// A verdict together with the snapshot it was computed from.
#[derive(Debug, Clone)]
pub struct Checked {
    /// The snapshot the handler should see.
    pub snapshot: Arc<ConfigSnapshot>,
    /// The decision.
    pub verdict: Verdict,
}

/// Evaluates permission levels against the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// Creates a gate.
    pub fn new() -> Self {
        Self
    }

    /// Obtains a (reload-aware) snapshot from `config` and evaluates the
    /// request against it.
    pub fn check(&self, sender: i64, descriptor: &CommandDescriptor, config: &ConfigHandle) -> Checked {
        let snapshot = config.snapshot();
        let verdict = self.evaluate(sender, descriptor, &snapshot);
        Checked { snapshot, verdict }
    }

    /// Evaluates the request against a fixed snapshot.
    pub fn evaluate(
        &self,
        sender: i64,
        descriptor: &CommandDescriptor,
        snapshot: &ConfigSnapshot,
    ) -> Verdict {
        let prefix = descriptor.prefix();

        if !descriptor.is_enabled() {
            warn!(prefix, sender, "Invocation of disabled command");
            return Verdict::deny(DenyReason::Disabled, format!("\"{prefix}\" is disabled"));
        }

        let settings = &snapshot.settings;
        let owner = settings.owner_id;
        let granted = || snapshot.privilege.allows(sender, prefix);

        match descriptor.level() {
            PermissionLevel::Public => Verdict::allow(),
            PermissionLevel::Elevated => {
                if settings.is_owner(sender) || settings.is_manager(sender) || granted() {
                    Verdict::allow()
                } else {
                    warn!(prefix, sender, "Insufficient privilege");
                    Verdict::deny(
                        DenyReason::InsufficientPrivilege,
                        format!(
                            "\"{prefix}\" is restricted to managers. Ask the owner ({owner}) for access."
                        ),
                    )
                }
            }
            PermissionLevel::OwnerOnly => {
                if settings.is_owner(sender) || granted() {
                    Verdict::allow()
                } else {
                    warn!(prefix, sender, "Insufficient privilege");
                    Verdict::deny(
                        DenyReason::InsufficientPrivilege,
                        format!(
                            "\"{prefix}\" is restricted to the owner ({owner}). Ask the owner for access."
                        ),
                    )
                }
            }
            PermissionLevel::Malformed(value) => {
                error!(
                    prefix,
                    level = value,
                    defect = "malformed_permission",
                    "Command declares an invalid permission level"
                );
                let notice = format!(
                    "\"{prefix}\" has a misconfigured permission level ({value}) and is restricted to the owner ({owner})."
                );
                if settings.is_owner(sender) {
                    Verdict::Allow {
                        notice: Some(notice),
                    }
                } else {
                    Verdict::deny(DenyReason::Misconfigured, notice)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PrivilegeGrant, Settings};
    use crate::testing::MemoryStore;

    const OWNER: i64 = 1;
    const MANAGER: i64 = 2;
    const USER: i64 = 42;

    fn snapshot(privilege: PrivilegeGrant) -> ConfigSnapshot {
        ConfigSnapshot {
            version: 1,
            settings: Settings::new(OWNER, 9, "x").with_manager(MANAGER),
            privilege,
        }
    }

    fn descriptor(prefix: &str, level: i64) -> CommandDescriptor {
        CommandDescriptor::new(prefix.into(), level.into(), None, true)
    }

    fn reason(verdict: Verdict) -> Option<DenyReason> {
        match verdict {
            Verdict::Allow { .. } => None,
            Verdict::Deny(d) => Some(d.reason),
        }
    }

    #[test]
    fn test_public_allows_everyone() {
        let gate = AuthorizationGate::new();
        let snap = snapshot(PrivilegeGrant::new());
        let d = descriptor("/echo", 1);
        for sender in [OWNER, MANAGER, USER] {
            assert_eq!(gate.evaluate(sender, &d, &snap), Verdict::allow());
        }
    }

    #[test]
    fn test_elevated() {
        let gate = AuthorizationGate::new();
        let snap = snapshot(PrivilegeGrant::new());
        let d = descriptor("/privileges", 2);
        assert!(gate.evaluate(OWNER, &d, &snap).is_allowed());
        assert!(gate.evaluate(MANAGER, &d, &snap).is_allowed());

        let Verdict::Deny(denial) = gate.evaluate(USER, &d, &snap) else {
            panic!("expected denial");
        };
        assert_eq!(denial.reason, DenyReason::InsufficientPrivilege);
        assert!(denial.notice.contains("managers"));
        assert!(denial.notice.contains(&OWNER.to_string()));
    }

    #[test]
    fn test_owner_only() {
        let gate = AuthorizationGate::new();
        let snap = snapshot(PrivilegeGrant::new());
        let d = descriptor("/system", 3);
        assert!(gate.evaluate(OWNER, &d, &snap).is_allowed());
        assert_eq!(
            reason(gate.evaluate(MANAGER, &d, &snap)),
            Some(DenyReason::InsufficientPrivilege)
        );
        assert_eq!(
            reason(gate.evaluate(USER, &d, &snap)),
            Some(DenyReason::InsufficientPrivilege)
        );
    }

    #[test]
    fn test_grant_is_exact() {
        let gate = AuthorizationGate::new();
        let mut privilege = PrivilegeGrant::new();
        privilege.grant(USER, "/system");
        let snap = snapshot(privilege);

        assert!(gate.evaluate(USER, &descriptor("/system", 3), &snap).is_allowed());
        assert!(!gate.evaluate(USER, &descriptor("/system2", 3), &snap).is_allowed());
        assert!(!gate.evaluate(USER + 1, &descriptor("/system", 3), &snap).is_allowed());
        assert!(gate.evaluate(USER, &descriptor("/system", 2), &snap).is_allowed());
    }

    #[test]
    fn test_disabled_denies_owner() {
        let gate = AuthorizationGate::new();
        let snap = snapshot(PrivilegeGrant::new());
        let d = descriptor("/echo", 1);
        d.set_enabled(false);

        let Verdict::Deny(denial) = gate.evaluate(OWNER, &d, &snap) else {
            panic!("expected denial");
        };
        assert_eq!(denial.reason, DenyReason::Disabled);
        assert_eq!(denial.notice, "\"/echo\" is disabled");
    }

    #[test]
    fn test_malformed_level() {
        let gate = AuthorizationGate::new();
        let snap = snapshot(PrivilegeGrant::new());
        let d = descriptor("/odd", 5);

        match gate.evaluate(OWNER, &d, &snap) {
            Verdict::Allow { notice: Some(n) } => assert!(n.contains("misconfigured")),
            other => panic!("unexpected verdict: {other:?}"),
        }
        assert_eq!(
            reason(gate.evaluate(MANAGER, &d, &snap)),
            Some(DenyReason::Misconfigured)
        );
    }

    #[test]
    fn test_grant_then_revoke_restores() {
        let gate = AuthorizationGate::new();
        let store = Arc::new(MemoryStore::new(Settings::new(OWNER, 9, "x")));
        let config = ConfigHandle::open(store).unwrap();
        let d = descriptor("/system", 3);

        assert!(!gate.check(USER, &d, &config).verdict.is_allowed());

        config.update_privilege(|p| p.grant(USER, "/system")).unwrap();
        let checked = gate.check(USER, &d, &config);
        assert!(checked.verdict.is_allowed());
        assert_eq!(checked.snapshot.version, 2);

        config.update_privilege(|p| p.revoke(USER, "/system")).unwrap();
        assert!(!gate.check(USER, &d, &config).verdict.is_allowed());
    }
}
