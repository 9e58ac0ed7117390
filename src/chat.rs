use lazy_static::lazy_static;
use regex::Regex;

use crate::assets::Pose;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatReply { pub pose: Pose, pub text: String }

struct ChatRule { pattern: Regex, pose: Pose, reply: &'static str }

lazy_static! {
    static ref CHAT_RULES: Vec<ChatRule> = vec![
        ChatRule { pattern: Regex::new(r"love").unwrap(), pose: Pose::Happy,
            reply: "I love you too! Now let's get something done together." },
        ChatRule { pattern: Regex::new(r"joke").unwrap(), pose: Pose::Happy,
            reply: "Why do programmers prefer dark mode? Because light attracts bugs!" },
        ChatRule { pattern: Regex::new(r"hello").unwrap(), pose: Pose::Happy,
            reply: "Hi there! I was hoping you'd say something." },
    ];
}

pub fn respond(input: &str) -> Option<ChatReply> {
    let trimmed = input.trim();
    if trimmed.is_empty() { return None; }
    let normalized = trimmed.to_lowercase();
    for rule in CHAT_RULES.iter() {
        if rule.pattern.is_match(&normalized) {
            return Some(ChatReply { pose: rule.pose, text: rule.reply.to_string() });
        }
    }
    Some(ChatReply { pose: Pose::Idle, text: format!("\"{trimmed}\"... I'll think about that.") })
}
