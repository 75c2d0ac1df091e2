//! `/help` and `/docs`.

use std::fmt::Write;

use super::visible_commands;
use crate::command::CommandDescriptor;
use crate::context::InvocationContext;
use crate::effect::Effect;

fn marker(descriptor: &CommandDescriptor) -> &'static str {
    if descriptor.is_enabled() { "[+]" } else { "[x]" }
}

/// Lists the commands visible to the sender with their enabled markers.
pub fn help(ctx: &InvocationContext<'_>) -> Vec<Effect> {
    let mut text = String::from("Commands you can use:");
    for cmd in visible_commands(ctx) {
        let _ = write!(text, "\n{} {}", marker(cmd.descriptor()), cmd.prefix());
    }
    vec![Effect::Reply(text)]
}

/// Like [`help`], with each command's description.
pub fn docs(ctx: &InvocationContext<'_>) -> Vec<Effect> {
    let mut text = String::from("Command reference ([+] enabled, [x] disabled):");
    for cmd in visible_commands(ctx) {
        let d = cmd.descriptor();
        let _ = write!(text, "\n{} {}\n    e.g. {}", marker(d), d.prefix(), d.description());
    }
    vec![Effect::Reply(text)]
}

#[cfg(test)]
mod tests {
    use super::super::tests::{OWNER, USER, registry, run, snapshot};
    use crate::command::DEFAULT_DESCRIPTION;
    use crate::config::PrivilegeGrant;
    use crate::effect::Effect;

    fn reply(effects: Vec<Effect>) -> String {
        match effects.as_slice() {
            [Effect::Reply(text)] => text.clone(),
            other => panic!("expected one reply, got {other:?}"),
        }
    }

    #[test]
    fn test_help_markers() {
        let registry = registry();
        registry.set_enabled("/echo", false);
        let text = reply(run(&registry, &snapshot(PrivilegeGrant::new()), USER, "/help"));

        assert!(text.contains("[+] /help"));
        assert!(text.contains("[x] /echo"));
        assert!(!text.contains("/system"));
        assert!(!text.contains("/privileges"));
    }

    #[test]
    fn test_docs_for_owner() {
        let registry = registry();
        let text = reply(run(&registry, &snapshot(PrivilegeGrant::new()), OWNER, "/docs"));

        assert!(text.contains("[+] /echo\n    e.g. /echo words"));
        assert!(text.contains(&format!("[+] /system\n    e.g. {DEFAULT_DESCRIPTION}")));
        assert!(text.contains("[+] /stop"));
    }
}
