use herald_framework::{Effect, InvocationContext};

use super::nickname_of;

pub const PREFIX: &str = "/info";

/// What the introduction says before nicknames are known.
#[derive(Debug, Clone)]
struct Intro {
    nickname: String,
    bot_name: String,
    bot_id: i64,
    owner_id: i64,
    managers: Vec<i64>,
}

impl Intro {
    fn render(&self, bot_nick: Option<&str>, owner_nick: Option<&str>) -> String {
        let mut text = format!("Hi {}!\n\nI'm \"{}\" ({})", self.nickname, self.bot_name, self.bot_id);
        if let Some(nick) = bot_nick {
            text.push_str(&format!(", you can also @{nick} me"));
        }
        text.push_str(".\n\n");

        match owner_nick {
            Some(nick) => text.push_str(&format!("I'm run by \"@{nick}\" ({}).", self.owner_id)),
            None => text.push_str(&format!("I'm run by {}.", self.owner_id)),
        }

        if self.managers.is_empty() {
            text.push_str(" They teach me everything I can do.");
        } else {
            let managers: Vec<String> = self.managers.iter().map(|id| id.to_string()).collect();
            text.push_str(&format!(
                " My managers {} help out with my features.",
                managers.join(", ")
            ));
        }

        text.push_str("\n\nSend /help or /docs to see what I can do, and ask the owner if anything goes wrong.");
        text
    }
}

/// Introduces the bot, its owner and its managers, looking up the bot's and
/// the owner's nicknames first.
pub fn info(ctx: &InvocationContext<'_>) -> Vec<Effect> {
    let settings = ctx.settings();
    let intro = Intro {
        nickname: ctx.event().sender_nickname().to_string(),
        bot_name: settings.bot_name.clone(),
        bot_id: settings.bot_id,
        owner_id: settings.owner_id,
        managers: settings.manager_ids.iter().copied().collect(),
    };

    let owner_id = intro.owner_id;
    vec![nickname_of(intro.bot_id, move |bot_nick| {
        let intro = intro.clone();
        vec![nickname_of(owner_id, move |owner_nick| {
            vec![Effect::reply(intro.render(bot_nick.as_deref(), owner_nick.as_deref()))]
        })]
    })]
}
