use thiserror::Error;

pub mod client;
pub mod server;

pub use client::{BotHandshake, BotIntent, ClientMessage, TeamMessage};
pub use server::{
    BotDeathEvent, BotHitBotEvent, BotHitWallEvent, BotResults, BotState, BulletFiredEvent,
    BulletHitBotEvent, BulletHitBulletEvent, BulletHitWallEvent, BulletState, Event,
    GameEndedEventForBot, GameSetup, GameStartedEventForBot, RoundEndedEventForBot,
    RoundStartedEvent, ScannedBotEvent, ServerHandshake, ServerMessage, SkippedTurnEvent,
    TeamMessageEvent, TickEventForBot, WonRoundEvent, parse_server_message,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty message")]
    EmptyMessage,
}
