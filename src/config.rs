//! Game tuning knobs. Every field has a default so a partial JSON document
//! (or none at all) yields a playable configuration.

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_PLAYER_NAMES: &[&str] = &[
    "냥콩이", "몽글냥", "고양별", "냥뭉치", "꼬물이",
    "말랑발바닥", "솜발이", "코코냥", "별냥이", "구름발자국",
    "살랑이", "초코꼬리", "동글냥", "하늘발자국", "달냥이",
    "순둥냥", "눈송이냥", "포포냥", "가을냥", "총총이",
];

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Player count used at startup and restored by a reset.
    pub default_total_players: usize,
    pub max_players: usize,
    /// Catalog is truncated to this many images (sorted by id).
    pub max_channel_images: usize,
    pub scan_duration_ms: u64,
    pub digit_reveal_interval_ms: u64,
    /// Pause between the last revealed digit and the automatic submit.
    pub channel_submit_delay_ms: u64,
    /// Pause between "all cats detected" and the confirm button unlocking.
    pub confirm_grace_ms: u64,
    pub default_player_names: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_total_players: 3,
            max_players: 20,
            max_channel_images: 72,
            scan_duration_ms: 2000,
            digit_reveal_interval_ms: 600,
            channel_submit_delay_ms: 500,
            confirm_grace_ms: 500,
            default_player_names: DEFAULT_PLAYER_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_duration_ms == 0 {
            return Err(ConfigError::Invalid("scan_duration_ms must be positive"));
        }
        if self.digit_reveal_interval_ms == 0 {
            return Err(ConfigError::Invalid("digit_reveal_interval_ms must be positive"));
        }
        if self.max_players == 0 {
            return Err(ConfigError::Invalid("max_players must be at least 1"));
        }
        if self.default_total_players == 0 || self.default_total_players > self.max_players {
            return Err(ConfigError::Invalid("default_total_players must be within 1..=max_players"));
        }
        if self.max_channel_images == 0 {
            return Err(ConfigError::Invalid("max_channel_images must be at least 1"));
        }
        Ok(())
    }

    /// Suggested name for the player at `index` (0-based).
    pub fn default_player_name(&self, index: usize) -> String {
        match self.default_player_names.get(index) {
            Some(name) => name.clone(),
            None => format!("플레이어{}", index + 1),
        }
    }
}
