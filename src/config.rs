use std::{env, path::PathBuf, str::FromStr};

use anyhow::Context;

use crate::{engine::RewardConfig, reveal::RevealTimings, session::SessionSettings};

pub const DEFAULT_LESSONS_DIR: &str = "lessons";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub lessons_dir: PathBuf,
    pub animated: bool,
    pub rewards: RewardConfig,
    pub timings: RevealTimings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lessons_dir: PathBuf::from(DEFAULT_LESSONS_DIR),
            animated: true,
            rewards: RewardConfig::default(),
            timings: RevealTimings::default(),
        }
    }
}

impl Config {
    /// Reads `.env` when present, then the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Config::default();

        let rewards = RewardConfig {
            participation: get_var(&lookup, "XP_PARTICIPATION")?
                .unwrap_or(defaults.rewards.participation),
            quiz_base: get_var(&lookup, "XP_QUIZ_BASE")?.unwrap_or(defaults.rewards.quiz_base),
            combo: get_var(&lookup, "XP_COMBO")?.unwrap_or(defaults.rewards.combo),
            vocabulary: get_var(&lookup, "XP_VOCAB")?.unwrap_or(defaults.rewards.vocabulary),
        };

        let line_gap_ms = get_var(&lookup, "REVEAL_LINE_MS")?;
        let timings = RevealTimings {
            line_gap_ms: line_gap_ms.unwrap_or(defaults.timings.line_gap_ms),
            ..defaults.timings
        };

        Ok(Config {
            lessons_dir: lookup("LESSONS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.lessons_dir),
            animated: get_var(&lookup, "LESSON_ANIMATED")?.unwrap_or(defaults.animated),
            rewards,
            timings,
        })
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            rewards: self.rewards,
            timings: self.timings,
            animated: self.animated,
        }
    }
}

fn get_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .context(format!("{} has an invalid value '{}'", key, raw)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = Config::from_lookup(lookup(&[])).expect("defaults");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            ("LESSONS_DIR", "/srv/lessons"),
            ("LESSON_ANIMATED", "false"),
            ("XP_COMBO", " 25 "),
            ("REVEAL_LINE_MS", "120"),
        ]))
        .expect("valid overrides");

        assert_eq!(config.lessons_dir, PathBuf::from("/srv/lessons"));
        assert!(!config.animated);
        assert_eq!(config.rewards.combo, 25);
        assert_eq!(config.rewards.quiz_base, 50);
        assert_eq!(config.timings.line_gap_ms, 120);
        assert!(!config.session_settings().animated);
    }

    #[test]
    fn invalid_number_names_the_variable() {
        let err = Config::from_lookup(lookup(&[("XP_VOCAB", "lots")])).unwrap_err();
        assert!(err.to_string().contains("XP_VOCAB"));
    }
}
