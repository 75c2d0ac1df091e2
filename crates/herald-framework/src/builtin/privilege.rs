//! `/power` and `/recall`.
//!
//! Both take `<targets> /<prefix>`, where targets are user ids or at-mentions
//! in any mix: `/power 10001 [CQ:at,qq=10002] /echo`. `@all` mentions are
//! ignored.

use std::sync::LazyLock;

use herald_core::mention_id;
use regex::Regex;
use tracing::warn;

use super::{POWER, RECALL, START, STOP};
use crate::context::InvocationContext;
use crate::effect::Effect;
use crate::registry::CommandRegistry;

static GRANT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)\s*/(\w+)\s*").expect("grant pattern compiles")
});

static TARGET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+|\[.*?\]").expect("target pattern compiles")
});

/// Returns `true` if `prefix` is registered and may be granted.
///
/// `/start`, `/stop` and `/power` stay with the owner.
pub fn is_grantable(registry: &CommandRegistry, prefix: &str) -> bool {
    prefix != START && prefix != STOP && prefix != POWER && registry.contains(prefix)
}

enum Parsed {
    Empty,
    Unparsable,
    NoTargets,
    Request { users: Vec<i64>, prefix: String },
}

fn parse(args: &str) -> Parsed {
    let args = args.trim();
    if args.is_empty() {
        return Parsed::Empty;
    }
    let Some(caps) = GRANT_PATTERN.captures(args) else {
        return Parsed::Unparsable;
    };

    let mut users = Vec::new();
    for token in TARGET_PATTERN.find_iter(&caps[1]).map(|m| m.as_str()) {
        let user = if token.starts_with('[') {
            mention_id(token)
        } else {
            token.parse().ok()
        };
        if let Some(user) = user.filter(|u| !users.contains(u)) {
            users.push(user);
        }
    }

    if users.is_empty() {
        return Parsed::NoTargets;
    }
    Parsed::Request {
        users,
        prefix: format!("/{}", &caps[2]),
    }
}

fn user_list(users: &[i64]) -> String {
    users
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Grants a command to the listed users.
pub fn power(ctx: &InvocationContext<'_>) -> Vec<Effect> {
    let (users, prefix) = match parse(ctx.args()) {
        Parsed::Request { users, prefix } => (users, prefix),
        other => return vec![hint(ctx, other, POWER)],
    };

    if !is_grantable(ctx.registry(), &prefix) {
        warn!(sender = ctx.sender_id(), prefix = %prefix, "Refused grant");
        return vec![Effect::Reply(format!("\"{prefix}\" cannot be granted"))];
    }

    let reply = format!("[+] \"{prefix}\" granted to:\n{}", user_list(&users));
    vec![Effect::Grant { users, prefix }, Effect::Reply(reply)]
}

/// Revokes a granted command. Only users that held it are reported.
pub fn recall(ctx: &InvocationContext<'_>) -> Vec<Effect> {
    let (users, prefix) = match parse(ctx.args()) {
        Parsed::Request { users, prefix } => (users, prefix),
        other => return vec![hint(ctx, other, RECALL)],
    };

    if !is_grantable(ctx.registry(), &prefix) {
        warn!(sender = ctx.sender_id(), prefix = %prefix, "Refused revocation");
        return vec![Effect::Reply(format!("\"{prefix}\" cannot be revoked"))];
    }

    let privilege = &ctx.snapshot().privilege;
    let held: Vec<i64> = users
        .into_iter()
        .filter(|u| privilege.allows(*u, &prefix))
        .collect();

    if held.is_empty() {
        return vec![Effect::Reply(format!("[-] Nobody listed holds \"{prefix}\""))];
    }

    let reply = format!("[-] \"{prefix}\" revoked from:\n{}", user_list(&held));
    vec![
        Effect::Revoke {
            users: held,
            prefix,
        },
        Effect::Reply(reply),
    ]
}

fn hint(ctx: &InvocationContext<'_>, parsed: Parsed, invoke: &str) -> Effect {
    warn!(sender = ctx.sender_id(), args = ctx.args(), "Malformed privilege request");
    let example = format!("e.g. {invoke} 10001 /echo");
    let text = match parsed {
        Parsed::Empty if invoke == POWER => format!("Who should get which command? {example}"),
        Parsed::Empty => format!("Who should lose which command? {example}"),
        Parsed::NoTargets => format!("Who is it for? {example}"),
        Parsed::Unparsable | Parsed::Request { .. } => format!("That format is wrong. {example}"),
    };
    Effect::Reply(text)
}
