use herald_framework::{Effect, InvocationContext};
use tracing::info;

pub const PREFIX: &str = "/echo";

/// Repeats the arguments back. A bare `/echo` is ignored.
pub fn echo(ctx: &InvocationContext<'_>) -> Vec<Effect> {
    let text = ctx.args();
    if text.is_empty() {
        return Vec::new();
    }
    info!(sender = ctx.sender_id(), text, "Echo");
    vec![Effect::reply(text)]
}
