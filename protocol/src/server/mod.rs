mod game;
mod tick;

use crate::ParseError;
use anyhow::Result;
use serde_json::Value;

pub use game::{
    BotResults, GameEndedEventForBot, GameSetup, GameStartedEventForBot, RoundEndedEventForBot,
    RoundStartedEvent, ServerHandshake,
};
pub use tick::{
    BotDeathEvent, BotHitBotEvent, BotHitWallEvent, BotState, BulletFiredEvent, BulletHitBotEvent,
    BulletHitBulletEvent, BulletHitWallEvent, BulletState, Event, ScannedBotEvent,
    SkippedTurnEvent, TeamMessageEvent, TickEventForBot, WonRoundEvent,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    ServerHandshake(ServerHandshake),
    GameStarted(GameStartedEventForBot),
    GameEnded(GameEndedEventForBot),
    GameAborted,
    RoundStarted(RoundStartedEvent),
    RoundEnded(RoundEndedEventForBot),
    Tick(TickEventForBot),
    /// Sent on its own when the bot missed the turn deadline
    SkippedTurn(SkippedTurnEvent),
    /// A message type this client does not know, kept by name
    Unknown(String),
}

/// Parse one websocket text frame into a ServerMessage
pub fn parse_server_message(text: &str) -> Result<ServerMessage> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyMessage.into());
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|e| ParseError::InvalidFormat(e.to_string()))?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::MissingField("type".to_string()))?
        .to_string();

    let message = match kind.as_str() {
        "ServerHandshake" => ServerMessage::ServerHandshake(from_value(value)?),
        "GameStartedEventForBot" => ServerMessage::GameStarted(from_value(value)?),
        "GameEndedEventForBot" => ServerMessage::GameEnded(from_value(value)?),
        "GameAbortedEvent" => ServerMessage::GameAborted,
        "RoundStartedEvent" => ServerMessage::RoundStarted(from_value(value)?),
        "RoundEndedEventForBot" => ServerMessage::RoundEnded(from_value(value)?),
        "TickEventForBot" => ServerMessage::Tick(from_value(value)?),
        "SkippedTurnEvent" => ServerMessage::SkippedTurn(from_value(value)?),
        _ => ServerMessage::Unknown(kind),
    };

    Ok(message)
}

fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ParseError::InvalidFormat(e.to_string()).into())
}
