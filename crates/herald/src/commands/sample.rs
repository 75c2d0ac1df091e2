use herald_framework::{Effect, InvocationContext};
use rand::seq::SliceRandom;
use serde_json::{Value, json};

pub const PREFIX: &str = "/sample";

/// Mentions `n` random members of the current group.
///
/// Stays silent outside groups, on anything but a single non-negative
/// integer, and when the group has fewer than `n` members.
pub fn sample(ctx: &InvocationContext<'_>) -> Vec<Effect> {
    let Some(group_id) = ctx.event().group_id else {
        return Vec::new();
    };
    let Ok(n) = ctx.args().parse::<usize>() else {
        return Vec::new();
    };

    vec![Effect::query(
        "get_group_member_list",
        json!({ "group_id": group_id }),
        move |data| pick(data, n),
    )]
}

fn pick(data: Option<Value>, n: usize) -> Vec<Effect> {
    let members: Vec<i64> = data
        .as_ref()
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(|m| m["user_id"].as_i64()).collect())
        .unwrap_or_default();
    if n > members.len() {
        return Vec::new();
    }

    let mut text = String::from("Randomly picked these members");
    for id in members.choose_multiple(&mut rand::thread_rng(), n) {
        text.push_str(&format!("\n  - [CQ:at,qq={id}] ({id})"));
    }
    vec![Effect::reply(text)]
}
