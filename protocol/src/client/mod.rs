use serde::{Deserialize, Serialize};

/// Messages that bots send to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Reply to `ServerHandshake`, identifies the bot
    BotHandshake(BotHandshake),

    /// Sent once the bot has processed `GameStartedEventForBot`
    BotReady,

    /// The per-turn command record
    BotIntent(BotIntent),
}

impl ClientMessage {
    /// Serialize to wire format: one JSON object with a `type` discriminator
    pub fn to_wire_format(&self) -> String {
        // Every field is a plain string, number, bool or list of those
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotHandshake {
    pub session_id: String,
    pub name: String,
    pub version: String,
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default)]
    pub is_droid: bool,
}

/// A message addressed to one teammate, or broadcast when `receiver_id` is `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMessage {
    pub message: String,
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<i32>,
}

/// Outbound command record, one per turn.
///
/// Unset fields are omitted from the JSON and the server keeps the value
/// it last received for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotIntent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gun_turn_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radar_turn_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firepower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjust_gun_for_body_turn: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjust_radar_for_body_turn: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjust_radar_for_gun_turn: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rescan: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fire_assist: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turret_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radar_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gun_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_out: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_err: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team_messages: Vec<TeamMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_graphics: Option<String>,
}

impl BotIntent {
    /// Clear the movement and firing commands.
    ///
    /// Colors and the adjust flags are settings rather than commands and survive.
    pub fn reset_commands(&mut self) {
        self.turn_rate = None;
        self.gun_turn_rate = None;
        self.radar_turn_rate = None;
        self.target_speed = None;
        self.firepower = None;
        self.rescan = None;
        self.team_messages.clear();
        self.debug_graphics = None;
        self.std_out = None;
        self.std_err = None;
    }

    /// Clear the fields that only apply to the turn they were sent on
    pub fn clear_one_shot(&mut self) {
        if self.rescan == Some(true) {
            self.rescan = Some(false);
        }
        self.team_messages.clear();
        self.debug_graphics = None;
        self.std_out = None;
        self.std_err = None;
    }
}
