use std::sync::LazyLock;

use herald_framework::{Effect, InvocationContext};
use rand::Rng;
use regex::Regex;

pub const PREFIX: &str = "/num";

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("number pattern compiles")
});

/// Replies a uniform random number: in `[0, 1)` for a bare `/num`, or
/// between the two given bounds.
pub fn num(ctx: &InvocationContext<'_>) -> Vec<Effect> {
    let args = ctx.args();
    if args.is_empty() {
        let value: f64 = rand::thread_rng().r#gen();
        return vec![Effect::reply(value.to_string())];
    }

    match parse_bounds(args) {
        Some((low, high)) => vec![Effect::reply(sample(low, high).to_string())],
        None => vec![Effect::reply(format!("Usage: {PREFIX} 12e3 7.2"))],
    }
}

/// Parses exactly two decimal numbers, in either order, whose span the
/// inclusive sampler can scale without overflowing.
fn parse_bounds(args: &str) -> Option<(f64, f64)> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [a, b] = parts.as_slice() else {
        return None;
    };
    if !NUMBER.is_match(a) || !NUMBER.is_match(b) {
        return None;
    }
    let (a, b): (f64, f64) = (a.parse().ok()?, b.parse().ok()?);
    if !((b - a).abs() / (1.0 - f64::EPSILON)).is_finite() {
        return None;
    }
    Some((a.min(b), a.max(b)))
}

fn sample(low: f64, high: f64) -> f64 {
    if low == high {
        return low;
    }
    rand::thread_rng().gen_range(low..=high)
}
