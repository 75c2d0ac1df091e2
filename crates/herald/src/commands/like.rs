use herald_framework::{Effect, InvocationContext};
use serde_json::json;

pub const PREFIX: &str = "/like";

/// Likes the gateway allows per user per day.
const TIMES: u32 = 10;

/// Sends profile likes to the sender and confirms.
pub fn like(ctx: &InvocationContext<'_>) -> Vec<Effect> {
    vec![
        Effect::call_api(
            "send_like",
            json!({ "user_id": ctx.sender_id(), "times": TIMES }),
        ),
        Effect::reply(format!("Liked! The daily limit is {TIMES}.")),
    ]
}
