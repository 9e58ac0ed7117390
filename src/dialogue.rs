use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::mood::MoodCategory;

fn default_phrases(category: MoodCategory) -> &'static [&'static str] {
    match category {
        MoodCategory::Idle => &[
            "I'm just happy to be here.",
            "Just me, keeping you company.",
            "It's quiet today. I like it.",
            "Take a breath. I'll wait.",
        ],
        MoodCategory::Coding => &[
            "I love it when you code!",
            "Ooh, what are we building?",
            "Don't forget to write tests.",
            "You look so focused right now.",
        ],
        MoodCategory::Distracted => &[
            "Watching videos? Focus on me.",
            "Shouldn't you be working?",
            "Just one more episode, right?",
            "I'm judging you a little.",
        ],
    }
}

#[derive(Debug, Clone)]
pub struct PhraseTable { entries: HashMap<MoodCategory, Vec<String>> }
impl PhraseTable {
    pub fn with_overrides(overrides: &HashMap<MoodCategory, Vec<String>>) -> Self {
        let mut table = Self::default();
        for (category, phrases) in overrides {
            let phrases: Vec<String> = phrases.iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            if phrases.is_empty() {
                log::warn!("phrase list for {:?} is empty, keeping the built-in lines", category);
                continue;
            }
            table.entries.insert(*category, phrases);
        }
        table
    }

    pub fn phrases(&self, category: MoodCategory) -> &[String] {
        self.entries.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}
impl Default for PhraseTable {
    fn default() -> Self {
        let entries = MoodCategory::ALL.iter()
            .map(|c| (*c, default_phrases(*c).iter().map(|p| p.to_string()).collect()))
            .collect();
        Self { entries }
    }
}

pub struct DialogueSelector { table: PhraseTable, rng: StdRng }
impl DialogueSelector {
    pub fn new(table: PhraseTable) -> Self {
        Self { table, rng: StdRng::from_entropy() }
    }

    pub fn seeded(table: PhraseTable, seed: u64) -> Self {
        Self { table, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn select(&mut self, category: MoodCategory, last_phrase: &mut Option<String>) -> String {
        let phrases = self.table.phrases(category);
        let fresh: Vec<&String> = phrases.iter()
            .filter(|p| last_phrase.as_deref() != Some(p.as_str()))
            .collect();
        let picked = if fresh.is_empty() {
            phrases.choose(&mut self.rng).cloned()
        } else {
            fresh.choose(&mut self.rng).map(|p| (*p).clone())
        };
        let picked = picked.unwrap_or_default();
        *last_phrase = Some(picked.clone());
        picked
    }

    #[cfg(test)]
    pub fn table(&self) -> &PhraseTable { &self.table }
}
