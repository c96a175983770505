//! Difficulty profiles
//!
//! A profile is read-only during a session; switching it only affects
//! entities spawned afterwards.

use serde::{Deserialize, Serialize};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Spawn cadence and entity speed for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Spawn a hazard every N simulation frames
    pub obstacle_spawn_every_n_frames: u64,
    /// Spawn an item every N simulation frames
    pub item_spawn_every_n_frames: u64,
    /// Base entity speed (pixels/s)
    pub base_speed: f32,
    /// Extra speed drawn uniformly from [0, variation) per entity (pixels/s)
    pub speed_variation: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Parse a difficulty name, falling back to the default for unknown input
    pub fn from_str_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            log::warn!("Unknown difficulty {:?}, using {}", s, Self::default().as_str());
            Self::default()
        })
    }

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                obstacle_spawn_every_n_frames: 35,
                item_spawn_every_n_frames: 150,
                base_speed: 150.0,
                speed_variation: 120.0,
            },
            Difficulty::Normal => DifficultyProfile {
                obstacle_spawn_every_n_frames: 22,
                item_spawn_every_n_frames: 110,
                base_speed: 210.0,
                speed_variation: 150.0,
            },
            Difficulty::Hard => DifficultyProfile {
                obstacle_spawn_every_n_frames: 15,
                item_spawn_every_n_frames: 80,
                base_speed: 270.0,
                speed_variation: 180.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Difficulty::from_str("EASY"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_str(" Hard "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_unknown_falls_back_to_normal() {
        assert_eq!(Difficulty::from_str_or_default("nightmare"), Difficulty::Normal);
        assert_eq!(Difficulty::from_str_or_default(""), Difficulty::Normal);
    }

    #[test]
    fn test_harder_profiles_spawn_faster() {
        let [easy, normal, hard] = Difficulty::ALL.map(|d| d.profile());
        assert!(easy.obstacle_spawn_every_n_frames > normal.obstacle_spawn_every_n_frames);
        assert!(normal.obstacle_spawn_every_n_frames > hard.obstacle_spawn_every_n_frames);
        assert!(easy.base_speed < normal.base_speed && normal.base_speed < hard.base_speed);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Difficulty::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
        let parsed: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(parsed, Difficulty::Easy);
    }
}
