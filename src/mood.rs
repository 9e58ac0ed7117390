use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::assets::Pose;

pub const DEFAULT_DISTRACTED_KEYWORDS: &[&str] = &["youtube", "netflix", "twitch"];
pub const DEFAULT_CODING_KEYWORDS: &[&str] = &["code", "rust", "python"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodCategory { Idle, Coding, Distracted }
impl MoodCategory {
    pub const ALL: [MoodCategory; 3] = [MoodCategory::Idle, MoodCategory::Coding, MoodCategory::Distracted];

    pub fn pose(self) -> Pose {
        match self {
            MoodCategory::Idle       => Pose::Idle,
            MoodCategory::Coding     => Pose::Happy,
            MoodCategory::Distracted => Pose::Judging,
        }
    }

    pub fn for_pose(pose: Pose) -> Self {
        match pose {
            Pose::Idle    => MoodCategory::Idle,
            Pose::Happy   => MoodCategory::Coding,
            Pose::Judging => MoodCategory::Distracted,
        }
    }
}

struct MoodRule { pattern: Regex, category: MoodCategory }

fn keyword_pattern(keyword: &str) -> Option<Regex> {
    let keyword = keyword.trim();
    if keyword.is_empty() { return None; }
    Regex::new(&format!("(?i){}", regex::escape(keyword))).ok()
}

pub struct MoodClassifier { rules: Vec<MoodRule> }
impl MoodClassifier {
    pub fn new<S: AsRef<str>>(distracted: &[S], coding: &[S]) -> Self {
        let mut rules = Vec::new();
        for (keywords, category) in [(distracted, MoodCategory::Distracted), (coding, MoodCategory::Coding)] {
            for kw in keywords {
                match keyword_pattern(kw.as_ref()) {
                    Some(pattern) => rules.push(MoodRule { pattern, category }),
                    None => log::warn!("ignoring empty {:?} keyword", category),
                }
            }
        }
        Self { rules }
    }

    pub fn classify(&self, title: Option<&str>) -> MoodCategory {
        let title = match title {
            Some(t) if !t.trim().is_empty() => t,
            _ => return MoodCategory::Idle,
        };
        self.rules.iter()
            .find(|rule| rule.pattern.is_match(title))
            .map(|rule| rule.category)
            .unwrap_or(MoodCategory::Idle)
    }

    #[cfg(test)]
    pub fn rule_count(&self) -> usize { self.rules.len() }
}
impl Default for MoodClassifier {
    fn default() -> Self { Self::new(DEFAULT_DISTRACTED_KEYWORDS, DEFAULT_CODING_KEYWORDS) }
}
