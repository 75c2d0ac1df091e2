//! Business commands shipped with the binary.

mod echo;
mod info;
mod like;
mod num;
mod privileges;
mod sample;

use herald_framework::{Effect, RegistryBuilder, command};
use serde_json::{Value, json};

/// Registers every business command.
pub fn register(builder: &mut RegistryBuilder) {
    builder
        .register(
            command(echo::PREFIX).permission(1).description("/echo some words"),
            echo::echo,
        )
        .register(
            command(info::PREFIX).permission(1).description("/info tells you about me"),
            info::info,
        )
        .register(
            command(like::PREFIX).permission(1).description("/like gives you ten likes"),
            like::like,
        )
        .register(
            command(num::PREFIX).permission(1).description("/num 2.71828 3.1415"),
            num::num,
        )
        .register(
            command(privileges::PREFIX)
                .permission(2)
                .description("/privileges lists who holds which grants"),
            privileges::privileges,
        )
        .register(
            command(sample::PREFIX)
                .permission(1)
                .description("/sample 5 mentions five random group members"),
            sample::sample,
        );
}

/// Looks up `user_id`'s nickname, then continues with it, or with `None`
/// if the lookup failed or came back empty.
pub(crate) fn nickname_of(
    user_id: i64,
    then: impl Fn(Option<String>) -> Vec<Effect> + Send + Sync + 'static,
) -> Effect {
    Effect::query(
        "get_stranger_info",
        json!({ "user_id": user_id }),
        move |data| then(nickname(data.as_ref())),
    )
}

fn nickname(data: Option<&Value>) -> Option<String> {
    data?
        .get("nickname")?
        .as_str()
        .filter(|nick| !nick.is_empty())
        .map(str::to_string)
}
