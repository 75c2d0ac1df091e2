use std::sync::Arc;

use herald_framework::{Effect, InvocationContext};

use super::nickname_of;

pub const PREFIX: &str = "/privileges";

/// Lists every privilege grant, one user per line, with nicknames looked up
/// one user at a time.
pub fn privileges(ctx: &InvocationContext<'_>) -> Vec<Effect> {
    let privilege = &ctx.snapshot().privilege;
    if privilege.is_empty() {
        return vec![Effect::reply("Nobody holds any privileges")];
    }

    let entries: Vec<(i64, String)> = privilege
        .iter()
        .map(|(user, prefixes)| {
            let prefixes: Vec<&str> = prefixes.iter().map(String::as_str).collect();
            (user, prefixes.join(" "))
        })
        .collect();
    describe(Arc::new(entries), 0, Vec::new())
}

fn describe(entries: Arc<Vec<(i64, String)>>, index: usize, lines: Vec<String>) -> Vec<Effect> {
    let (user, prefixes) = match entries.get(index) {
        Some((user, prefixes)) => (*user, prefixes.clone()),
        None => return vec![Effect::reply(format!("Privileges:\n{}", lines.join("\n")))],
    };

    vec![nickname_of(user, move |nick| {
        let who = match nick {
            Some(nick) => format!("{nick} ({user})"),
            None => user.to_string(),
        };
        let mut lines = lines.clone();
        lines.push(format!("  {who}: {prefixes}"));
        describe(entries.clone(), index + 1, lines)
    })]
}

#[cfg(test)]
mod tests {
    use herald_framework::PrivilegeGrant;
    use serde_json::json;

    use super::*;
    use crate::commands::tests::{MANAGER, USER, resolve, run, run_with, snapshot};

    #[test]
    fn test_lists_grants() {
        let mut privilege = PrivilegeGrant::new();
        privilege.grant(USER, "/stop");
        privilege.grant(USER, "/power");
        privilege.grant(7, "/privileges");
        let effects = run_with(&snapshot(privilege), MANAGER, "/privileges");
        let effects = resolve(effects, |_, params| {
            (params["user_id"] == USER).then(|| json!({ "user_id": USER, "nickname": "Ada" }))
        });
        assert_eq!(
            effects,
            vec![Effect::reply("Privileges:\n  7: /privileges\n  Ada (42): /power /stop")]
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            run(MANAGER, "/privileges"),
            vec![Effect::reply("Nobody holds any privileges")]
        );
    }
}
