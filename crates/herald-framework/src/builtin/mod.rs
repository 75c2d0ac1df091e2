//! Built-in administrative commands.
//!
//! | Prefix    | Level | Purpose                                  |
//! |-----------|-------|------------------------------------------|
//! | `/help`   | 1     | list the commands visible to the sender  |
//! | `/docs`   | 1     | like `/help`, with descriptions          |
//! | `/start`  | 3     | re-enable commands (pinned)              |
//! | `/stop`   | 3     | disable commands (pinned)                |
//! | `/power`  | 3     | grant a command to users                 |
//! | `/recall` | 3     | revoke a granted command                 |

mod help;
mod privilege;
mod toggle;

use crate::command::{RegisteredCommand, command};
use crate::config::Role;
use crate::context::InvocationContext;
use crate::permission::PermissionLevel;
use crate::registry::RegistryBuilder;

pub use help::{docs, help};
pub use privilege::{is_grantable, power, recall};
pub use toggle::{start, stop};

/// `/help`
pub const HELP: &str = "/help";
/// `/docs`
pub const DOCS: &str = "/docs";
/// `/start`
pub const START: &str = "/start";
/// `/stop`
pub const STOP: &str = "/stop";
/// `/power`
pub const POWER: &str = "/power";
/// `/recall`
pub const RECALL: &str = "/recall";

/// Registers every built-in command.
pub fn register_builtins(builder: &mut RegistryBuilder) {
    builder
        .register(
            command(HELP).permission(1).description("/help lists what you can use"),
            help,
        )
        .register(
            command(DOCS).permission(1).description("/docs explains what you can use"),
            docs,
        )
        .register(
            command(START)
                .permission(3)
                .pinned()
                .description("/start /x /y re-enables commands"),
            start,
        )
        .register(
            command(STOP)
                .permission(3)
                .pinned()
                .description("/stop /x /y disables commands"),
            stop,
        )
        .register(
            command(POWER)
                .permission(3)
                .description("/power @someone /x, e.g. /power 10001 /x"),
            power,
        )
        .register(
            command(RECALL)
                .permission(3)
                .description("/recall @someone /x, e.g. /recall 10001 /x"),
            recall,
        );
}

/// Commands the sender may see in `/help` and `/docs`, in registration order.
///
/// Members see public commands, managers also see elevated ones, the owner
/// sees everything. Granted commands are always visible to the grantee.
pub fn visible_commands<'a>(ctx: &InvocationContext<'a>) -> Vec<&'a RegisteredCommand> {
    let role = ctx.role();
    let sender = ctx.sender_id();
    let privilege = &ctx.snapshot().privilege;

    ctx.registry()
        .commands()
        .filter(|cmd| {
            let by_role = match (role, cmd.descriptor().level()) {
                (Role::Owner, _) => true,
                (_, PermissionLevel::Public) => true,
                (Role::Manager, PermissionLevel::Elevated) => true,
                _ => false,
            };
            by_role || privilege.allows(sender, cmd.prefix())
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use herald_core::InboundEvent;

    use super::*;
    use crate::config::{ConfigSnapshot, PrivilegeGrant, Settings};
    use crate::effect::Effect;
    use crate::handler::handler_fn;
    use crate::registry::CommandRegistry;

    pub(crate) const OWNER: i64 = 10001;
    pub(crate) const MANAGER: i64 = 10002;
    pub(crate) const USER: i64 = 42;

    pub(crate) fn registry() -> CommandRegistry {
        let mut builder = RegistryBuilder::new();
        register_builtins(&mut builder);
        builder
            .register(
                command("/echo").permission(1).description("/echo words"),
                handler_fn(|_| Vec::<Effect>::new()),
            )
            .register(command("/privileges").permission(2), handler_fn(|_| Vec::new()))
            .register(command("/system").permission(3), handler_fn(|_| Vec::new()));
        builder.build().unwrap()
    }

    pub(crate) fn snapshot(privilege: PrivilegeGrant) -> ConfigSnapshot {
        ConfigSnapshot {
            version: 1,
            settings: Settings::new(OWNER, 9, "x").with_manager(MANAGER),
            privilege,
        }
    }

    /// Runs the handler registered under the prefix of `text`.
    pub(crate) fn run(
        registry: &CommandRegistry,
        snapshot: &ConfigSnapshot,
        sender: i64,
        text: &str,
    ) -> Vec<Effect> {
        let event = InboundEvent::private(sender, 1, text);
        let prefix = text.split(' ').next().unwrap();
        let command = registry.lookup(prefix).unwrap();
        let args = text[prefix.len()..].trim();
        let ctx = InvocationContext::new(&event, text, args, command, registry, snapshot);
        command.handler().invoke(&ctx)
    }

    fn visible(registry: &CommandRegistry, snapshot: &ConfigSnapshot, sender: i64) -> Vec<String> {
        let event = InboundEvent::private(sender, 1, HELP);
        let command = registry.lookup(HELP).unwrap();
        let ctx = InvocationContext::new(&event, HELP, "", command, registry, snapshot);
        visible_commands(&ctx)
            .into_iter()
            .map(|c| c.prefix().to_string())
            .collect()
    }

    #[test]
    fn test_visibility_by_role() {
        let registry = registry();
        let mut privilege = PrivilegeGrant::new();
        privilege.grant(USER, "/system");
        let snap = snapshot(privilege);

        assert_eq!(visible(&registry, &snap, USER + 1), vec!["/help", "/docs", "/echo"]);
        assert_eq!(
            visible(&registry, &snap, USER),
            vec!["/help", "/docs", "/echo", "/system"]
        );
        assert_eq!(
            visible(&registry, &snap, MANAGER),
            vec!["/help", "/docs", "/echo", "/privileges"]
        );
        assert_eq!(visible(&registry, &snap, OWNER).len(), registry.len());
    }
}
