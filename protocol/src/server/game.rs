//! Session, game and round lifecycle messages

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerHandshake {
    pub session_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub game_types: Vec<String>,
}

/// Rules for the game about to start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSetup {
    pub game_type: String,
    pub arena_width: i32,
    pub arena_height: i32,
    pub number_of_rounds: i32,
    pub gun_cooling_rate: f64,
    #[serde(default)]
    pub max_inactivity_turns: i32,
    /// Microseconds the bot has to answer each tick
    pub turn_timeout: u64,
    #[serde(default)]
    pub ready_timeout: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStartedEventForBot {
    pub my_id: i32,
    #[serde(default)]
    pub teammate_ids: Vec<i32>,
    pub game_setup: GameSetup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundStartedEvent {
    pub round_number: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundEndedEventForBot {
    pub round_number: i32,
    pub turn_number: i32,
    pub results: BotResults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEndedEventForBot {
    pub number_of_rounds: i32,
    pub results: BotResults,
}

/// Score card for this bot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotResults {
    pub rank: i32,
    pub survival: f64,
    pub last_survivor_bonus: f64,
    pub bullet_damage: f64,
    pub bullet_kill_bonus: f64,
    pub ram_damage: f64,
    pub ram_kill_bonus: f64,
    pub total_score: f64,
    pub first_places: i32,
    pub second_places: i32,
    pub third_places: i32,
}
