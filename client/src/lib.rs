//! Blocking, turn-synchronized bot client for the Skirmish battle server.
//!
//! A bot is a [`BotHandler`]: its `run` method is started on a dedicated
//! thread every round and drives the bot with blocking commands such as
//! [`Bot::forward`] or [`Bot::go`], each of which ends the current turn and
//! waits for the next one. Events are dispatched to the `on_*` methods in
//! priority order from inside those calls.
//!
//! ```ignore
//! use skirmish_client::{Bot, BotError, BotHandler, BotInfo, BotRunner, ClientConfig};
//!
//! struct Spinner;
//!
//! impl BotHandler for Spinner {
//!     fn run(&self, bot: &Bot<'_>) -> Result<(), BotError> {
//!         loop {
//!             bot.turn_left(360.0)?;
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     BotRunner::new(ClientConfig::from_env(), BotInfo::new("Spinner", "1.0"), Spinner)
//!         .run()
//!         .await
//! }
//! ```

mod bot;
mod config;
mod connection;
mod console;
mod error;
mod graphics;
mod handler;
mod internals;
mod queue;
mod runner;
mod transport;

#[cfg(test)]
mod test_support;

pub use bot::{Bot, MAX_TEAM_MESSAGE_SIZE, MAX_TEAM_MESSAGES_PER_TURN};
pub use config::{BotInfo, ClientConfig, DEFAULT_SERVER_URL, ReconnectPolicy};
pub use connection::Connection;
pub use console::{BufferedConsole, ConsoleCapture};
pub use error::BotError;
pub use graphics::{GraphicsRenderer, SvgGraphics};
pub use handler::{BotHandler, ConnectionEvent};
pub use internals::{BotInternals, TurnHook};
pub use queue::{EventQueue, MAX_EVENT_AGE, MAX_QUEUE_SIZE};
pub use runner::BotRunner;
pub use transport::{ChannelTransport, Transport};

pub use skirmish_battle::{
    Axis, BotDeathEvent, BotEvent, BulletFiredEvent, BulletHitBotEvent, BulletHitBulletEvent,
    BulletHitWallEvent, Color, Condition, CustomEvent, DeathEvent, EventKind, HitBotEvent,
    HitByBulletEvent, HitWallEvent, ScannedBotEvent, SkippedTurnEvent, TeamMessageEvent,
    TickEvent, TickSnapshot, WonRoundEvent,
};
pub use skirmish_protocol::{
    BotIntent, BotResults, BotState, BulletState, ClientMessage, GameEndedEventForBot, GameSetup,
    GameStartedEventForBot, RoundEndedEventForBot, ServerMessage,
};
