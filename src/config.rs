use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as AnyhowCtx, Result};
use serde::{Deserialize, Serialize};

use crate::mood::{MoodCategory, DEFAULT_CODING_KEYWORDS, DEFAULT_DISTRACTED_KEYWORDS};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub companion_name:      String,
    pub greeting:            String,
    pub sprite_dir:          Option<PathBuf>,
    pub sprite_size:         [u32; 2],
    pub key_color:           [u8; 3],
    pub window_size:         [f32; 2],
    pub window_pos:          [f32; 2],
    pub poll_interval_ms:    u64,
    pub idle_timeout_secs:   u64,
    pub reveal_interval_ms:  u64,
    pub distracted_keywords: Vec<String>,
    pub coding_keywords:     Vec<String>,
    pub phrases:             HashMap<MoodCategory, Vec<String>>,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            companion_name:      "Mika".into(),
            greeting:            "Just me. Don't mind me.".into(),
            sprite_dir:          None,
            sprite_size:         [250, 300],
            key_color:           [255, 0, 255],
            window_size:         [300.0, 400.0],
            window_pos:          [1000.0, 400.0],
            poll_interval_ms:    3000,
            idle_timeout_secs:   20,
            reveal_interval_ms:  35,
            distracted_keywords: DEFAULT_DISTRACTED_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            coding_keywords:     DEFAULT_CODING_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            phrases:             HashMap::new(),
        }
    }
}
impl Config {
    pub fn load() -> Self {
        let path = Self::path();
        if !path.exists() { return Self::default(); }
        match Self::read_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{e:#}; using default settings");
                Self::default()
            }
        }
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        let mut c: Config = serde_json::from_str(data)?;
        c.clamp();
        Ok(c)
    }

    fn clamp(&mut self) {
        self.poll_interval_ms   = self.poll_interval_ms.max(250);
        self.reveal_interval_ms = self.reveal_interval_ms.max(5);
        self.idle_timeout_secs  = self.idle_timeout_secs.max(1);
    }

    fn path() -> PathBuf {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("deskmate").join("config.json")
    }

    pub fn sprite_dir(&self) -> PathBuf {
        self.sprite_dir.clone()
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"))
    }

    pub fn poll_interval(&self) -> Duration { Duration::from_millis(self.poll_interval_ms) }
    pub fn idle_timeout(&self) -> Duration { Duration::from_secs(self.idle_timeout_secs) }
    pub fn reveal_interval(&self) -> Duration { Duration::from_millis(self.reveal_interval_ms) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let c = Config::parse(r#"{ "idle_timeout_secs": 25, "coding_keywords": ["vim"] }"#).unwrap();
        assert_eq!(c.idle_timeout(), Duration::from_secs(25));
        assert_eq!(c.coding_keywords, vec!["vim"]);
        assert_eq!(c.distracted_keywords, vec!["youtube", "netflix", "twitch"]);
        assert_eq!(c.poll_interval(), Duration::from_secs(3));
    }

    #[test]
    fn phrases_are_keyed_by_lowercase_category() {
        let c = Config::parse(r#"{ "phrases": { "distracted": ["Hey!"] } }"#).unwrap();
        assert_eq!(c.phrases.get(&MoodCategory::Distracted), Some(&vec!["Hey!".to_string()]));
    }

    #[test]
    fn tiny_timings_are_clamped() {
        let c = Config::parse(r#"{ "poll_interval_ms": 0, "reveal_interval_ms": 0, "idle_timeout_secs": 0 }"#).unwrap();
        assert_eq!(c.poll_interval(), Duration::from_millis(250));
        assert_eq!(c.reveal_interval(), Duration::from_millis(5));
        assert_eq!(c.idle_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(Config::parse("{ not json").is_err());
        assert!(Config::read_from(Path::new("/definitely/not/here/config.json")).is_err());
    }
}
