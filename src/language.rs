//! Display language
//!
//! Every user-facing label comes from a [`Strings`] table. Korean is the
//! default; the page can switch languages at any time, including mid-run.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::format_seconds;
use crate::sim::GamePhase;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
}

/// Label table for one language
#[derive(Debug)]
pub struct Strings {
    // HUD labels
    pub health: &'static str,
    pub time: &'static str,
    pub seconds: &'static str,
    pub language: &'static str,
    pub difficulty: &'static str,
    pub music: &'static str,
    pub sfx: &'static str,
    pub easy: &'static str,
    pub normal: &'static str,
    pub hard: &'static str,
    // Buttons
    pub start: &'static str,
    pub pause: &'static str,
    pub resume: &'static str,
    pub reset: &'static str,
    // Overlay
    pub game_start: &'static str,
    pub press_start: &'static str,
    pub paused: &'static str,
    pub press_resume: &'static str,
    pub game_over: &'static str,
    pub survival_time: &'static str,
    // Side panels
    pub controls_title: &'static str,
    pub control_up: &'static str,
    pub control_down: &'static str,
    pub control_left: &'static str,
    pub control_right: &'static str,
    pub items_title: &'static str,
    pub item_godmode: &'static str,
    pub item_health: &'static str,
    pub item_speed_up: &'static str,
    pub item_speed_down: &'static str,
    pub leaderboard_title: &'static str,
    pub no_records: &'static str,
    // Name prompt
    pub enter_name: &'static str,
    pub default_player_name: &'static str,
}

static KO: Strings = Strings {
    health: "❤️ 체력",
    time: "⏱️ 시간",
    seconds: "초",
    language: "언어",
    difficulty: "난이도",
    music: "음악",
    sfx: "효과음",
    easy: "쉬움",
    normal: "보통",
    hard: "어려움",
    start: "시작",
    pause: "일시정지",
    resume: "계속하기",
    reset: "초기화",
    game_start: "게임 시작",
    press_start: "시작 버튼을 눌러주세요",
    paused: "일시정지",
    press_resume: "계속하기 버튼을 눌러주세요",
    game_over: "게임 오버!",
    survival_time: "생존 시간",
    controls_title: "🎮 조작",
    control_up: "위",
    control_down: "아래",
    control_left: "왼쪽",
    control_right: "오른쪽",
    items_title: "💎 아이템",
    item_godmode: "무적",
    item_health: "회복",
    item_speed_up: "가속",
    item_speed_down: "감속",
    leaderboard_title: "🏆 리더보드",
    no_records: "아직 기록이 없습니다",
    enter_name: "이름을 입력하세요:",
    default_player_name: "플레이어",
};

static EN: Strings = Strings {
    health: "❤️ Health",
    time: "⏱️ Time",
    seconds: "sec",
    language: "Language",
    difficulty: "Difficulty",
    music: "Music",
    sfx: "Effects",
    easy: "Easy",
    normal: "Normal",
    hard: "Hard",
    start: "Start",
    pause: "Pause",
    resume: "Resume",
    reset: "Reset",
    game_start: "Game Start",
    press_start: "Press Start Button",
    paused: "Paused",
    press_resume: "Press Resume Button",
    game_over: "Game Over!",
    survival_time: "Survival Time",
    controls_title: "🎮 Controls",
    control_up: "Up",
    control_down: "Down",
    control_left: "Left",
    control_right: "Right",
    items_title: "💎 Items",
    item_godmode: "Godmode",
    item_health: "Heal",
    item_speed_up: "Fast",
    item_speed_down: "Slow",
    leaderboard_title: "🏆 Leaderboard",
    no_records: "No records yet",
    enter_name: "Enter your name:",
    default_player_name: "Player",
};

impl Language {
    pub const ALL: [Language; 2] = [Language::Ko, Language::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ko" | "kr" | "korean" => Some(Language::Ko),
            "en" | "english" => Some(Language::En),
            _ => None,
        }
    }

    /// Parse a language code, falling back to the default for unknown input
    pub fn from_str_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            log::warn!("Unknown language {:?}, using {}", s, Self::default().as_str());
            Self::default()
        })
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::Ko => &KO,
            Language::En => &EN,
        }
    }
}

impl Strings {
    /// Time label without its icon, for the canvas corner
    pub fn time_plain(&self) -> &'static str {
        self.time.trim_start_matches("⏱️ ")
    }

    /// Canvas corner readout, e.g. `Time: 8.3sec`
    pub fn time_readout(&self, elapsed: &str) -> String {
        format!("{}: {}{}", self.time_plain(), elapsed, self.seconds)
    }

    /// Seconds with the unit suffix, e.g. `8.3초`
    pub fn with_unit(&self, secs: &str) -> String {
        format!("{}{}", secs, self.seconds)
    }

    /// Game-over overlay message
    pub fn survival_message(&self, survival_secs: f64) -> String {
        format!(
            "{}: {}",
            self.survival_time,
            self.with_unit(&format_seconds(survival_secs))
        )
    }

    /// Leaderboard name prompt
    pub fn name_prompt(&self, survival_secs: f64) -> String {
        format!("{}\n\n{}", self.survival_message(survival_secs), self.enter_name)
    }

    /// Overlay (title, message) shown in `phase`, if any
    pub fn overlay(&self, phase: GamePhase, survival_secs: f64) -> Option<(&'static str, String)> {
        match phase {
            GamePhase::NotStarted => Some((self.game_start, self.press_start.to_string())),
            GamePhase::Paused => Some((self.paused, self.press_resume.to_string())),
            GamePhase::GameOver => Some((self.game_over, self.survival_message(survival_secs))),
            GamePhase::Playing => None,
        }
    }

    /// Pause button label: "Resume" while paused, "Pause" otherwise
    pub fn pause_button(&self, phase: GamePhase) -> &'static str {
        match phase {
            GamePhase::Paused => self.resume,
            _ => self.pause,
        }
    }

    pub fn difficulty_name(&self, difficulty: Difficulty) -> &'static str {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        }
    }
}
