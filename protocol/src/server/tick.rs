//! Per-turn messages: the tick itself and the events it carries

use serde::{Deserialize, Serialize};

/// The state snapshot a bot receives every turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickEventForBot {
    pub round_number: i32,
    pub turn_number: i32,
    pub bot_state: BotState,
    #[serde(default)]
    pub bullet_states: Vec<BulletState>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotState {
    pub energy: f64,
    pub x: f64,
    pub y: f64,
    pub direction: f64,
    pub gun_direction: f64,
    pub radar_direction: f64,
    #[serde(default)]
    pub radar_sweep: f64,
    pub speed: f64,
    #[serde(default)]
    pub turn_rate: f64,
    #[serde(default)]
    pub gun_turn_rate: f64,
    #[serde(default)]
    pub radar_turn_rate: f64,
    #[serde(default)]
    pub gun_heat: f64,
    #[serde(default)]
    pub enemy_count: i32,
    #[serde(default)]
    pub is_debugging_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletState {
    pub bullet_id: i32,
    pub owner_id: i32,
    pub power: f64,
    pub x: f64,
    pub y: f64,
    pub direction: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Raw events as they appear in a tick's event list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    BotDeathEvent(BotDeathEvent),
    BotHitBotEvent(BotHitBotEvent),
    BotHitWallEvent(BotHitWallEvent),
    BulletFiredEvent(BulletFiredEvent),
    BulletHitBotEvent(BulletHitBotEvent),
    BulletHitBulletEvent(BulletHitBulletEvent),
    BulletHitWallEvent(BulletHitWallEvent),
    ScannedBotEvent(ScannedBotEvent),
    SkippedTurnEvent(SkippedTurnEvent),
    WonRoundEvent(WonRoundEvent),
    TeamMessageEvent(TeamMessageEvent),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotDeathEvent {
    pub turn_number: i32,
    pub victim_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotHitBotEvent {
    pub turn_number: i32,
    pub bot_id: i32,
    pub victim_id: i32,
    pub energy: f64,
    pub x: f64,
    pub y: f64,
    pub rammed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotHitWallEvent {
    pub turn_number: i32,
    pub victim_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletFiredEvent {
    pub turn_number: i32,
    pub bullet: BulletState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletHitBotEvent {
    pub turn_number: i32,
    pub victim_id: i32,
    pub bullet: BulletState,
    pub damage: f64,
    pub energy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletHitBulletEvent {
    pub turn_number: i32,
    pub bullet: BulletState,
    pub hit_bullet: BulletState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletHitWallEvent {
    pub turn_number: i32,
    pub bullet: BulletState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedBotEvent {
    pub turn_number: i32,
    pub scanned_by_bot_id: i32,
    pub scanned_bot_id: i32,
    pub energy: f64,
    pub x: f64,
    pub y: f64,
    pub direction: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedTurnEvent {
    pub turn_number: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WonRoundEvent {
    pub turn_number: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMessageEvent {
    pub turn_number: i32,
    pub message: String,
    pub message_type: String,
    pub sender_id: i32,
}
