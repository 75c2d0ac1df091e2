//! `/start` and `/stop`.

use super::{START, STOP};
use crate::context::InvocationContext;
use crate::effect::Effect;

/// Re-enables each listed command.
pub fn start(ctx: &InvocationContext<'_>) -> Vec<Effect> {
    toggle(ctx, true)
}

/// Disables each listed command.
pub fn stop(ctx: &InvocationContext<'_>) -> Vec<Effect> {
    toggle(ctx, false)
}

fn toggle(ctx: &InvocationContext<'_>, enabled: bool) -> Vec<Effect> {
    let mut targets: Vec<&str> = Vec::new();
    for item in ctx.args().split_whitespace() {
        if item != START && item != STOP && !targets.contains(&item) {
            targets.push(item);
        }
    }

    if targets.is_empty() {
        let prompt = if enabled {
            "Which commands should I enable? e.g. /start /echo /num"
        } else {
            "Which commands should I disable? e.g. /stop /echo /num"
        };
        return vec![Effect::reply(prompt)];
    }

    let mut effects = Vec::new();
    let mut lines = Vec::with_capacity(targets.len());
    for prefix in targets {
        match ctx.registry().lookup(prefix) {
            None => lines.push(format!("[!] \"{prefix}\" is not a command")),
            Some(cmd) if !enabled && !cmd.descriptor().is_lockable() => {
                lines.push(format!("[!] \"{prefix}\" cannot be disabled"));
            }
            Some(_) => {
                effects.push(Effect::SetEnabled {
                    prefix: prefix.to_string(),
                    enabled,
                });
                lines.push(if enabled {
                    format!("[+] \"{prefix}\" enabled")
                } else {
                    format!("[-] \"{prefix}\" disabled")
                });
            }
        }
    }

    effects.push(Effect::Reply(lines.join("\n")));
    effects
}

#[cfg(test)]
mod tests {
    use super::super::tests::{OWNER, registry, run, snapshot};
    use crate::config::PrivilegeGrant;
    use crate::effect::Effect;

    #[test]
    fn test_stop_reports() {
        let registry = registry();
        let snap = snapshot(PrivilegeGrant::new());
        let effects = run(&registry, &snap, OWNER, "/stop /echo /nope /echo /stop");

        assert_eq!(
            effects,
            vec![
                Effect::SetEnabled {
                    prefix: "/echo".into(),
                    enabled: false,
                },
                Effect::reply("[-] \"/echo\" disabled\n[!] \"/nope\" is not a command"),
            ]
        );
    }

    #[test]
    fn test_start_enables() {
        let registry = registry();
        let snap = snapshot(PrivilegeGrant::new());
        let effects = run(&registry, &snap, OWNER, "/start /echo");
        assert_eq!(
            effects[0],
            Effect::SetEnabled {
                prefix: "/echo".into(),
                enabled: true,
            }
        );
        assert_eq!(effects[1], Effect::reply("[+] \"/echo\" enabled"));
    }

    #[test]
    fn test_empty_list_prompts() {
        let registry = registry();
        let snap = snapshot(PrivilegeGrant::new());
        let effects = run(&registry, &snap, OWNER, "/stop /start /stop");
        assert_eq!(effects.len(), 1);
        assert!(matches!(&effects[0], Effect::Reply(t) if t.starts_with("Which commands")));
    }

    #[test]
    fn test_pinned_cannot_be_stopped() {
        let mut builder = crate::registry::RegistryBuilder::new();
        super::super::register_builtins(&mut builder);
        builder.register(
            crate::command::command("/keep").permission(1).pinned(),
            crate::handler::handler_fn(|_| Vec::new()),
        );
        let registry = builder.build().unwrap();
        let effects = run(&registry, &snapshot(PrivilegeGrant::new()), OWNER, "/stop /keep");
        assert_eq!(effects, vec![Effect::reply("[!] \"/keep\" cannot be disabled")]);
    }
}
