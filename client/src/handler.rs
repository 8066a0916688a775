use skirmish_battle::{
    BotDeathEvent, BulletFiredEvent, BulletHitBotEvent, BulletHitBulletEvent, BulletHitWallEvent,
    CustomEvent, DeathEvent, HitBotEvent, HitByBulletEvent, HitWallEvent, ScannedBotEvent,
    SkippedTurnEvent, TeamMessageEvent, TickEvent, WonRoundEvent,
};
use skirmish_protocol::{GameEndedEventForBot, GameStartedEventForBot, RoundEndedEventForBot};

use crate::bot::Bot;
use crate::error::BotError;

/// Connection lifecycle, delivered outside of any turn
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    Connected { url: String },
    Disconnected { url: String, remote: bool },
    Error { url: String, message: String },
}

/// The bot program.
///
/// `run` is started on a fresh bot thread every round. The `on_*` event
/// methods are called on that same thread from inside `go()` and the other
/// blocking commands, so they may themselves call blocking commands. All
/// methods have default no-op implementations.
///
/// Errors returned from handlers are passed up through the blocking call
/// that dispatched them; `BotError::Interrupted` and `BotError::Aborted`
/// should simply be propagated with `?`.
///
/// # Example
///
/// ```ignore
/// struct Walls;
///
/// impl BotHandler for Walls {
///     fn run(&self, bot: &Bot<'_>) -> Result<(), BotError> {
///         loop {
///             bot.forward(100.0)?;
///             bot.turn_right(90.0)?;
///         }
///     }
///
///     fn on_scanned_bot(&self, bot: &Bot<'_>, _: &ScannedBotEvent) -> Result<(), BotError> {
///         bot.fire(1.0)?;
///         Ok(())
///     }
/// }
/// ```
pub trait BotHandler: Send {
    /// Main loop of the bot for one round
    fn run(&self, bot: &Bot<'_>) -> Result<(), BotError> {
        let _ = bot;
        Ok(())
    }

    fn on_tick(&self, bot: &Bot<'_>, event: &TickEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    /// This bot died
    fn on_death(&self, bot: &Bot<'_>, event: &DeathEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    /// Another bot died
    fn on_bot_death(&self, bot: &Bot<'_>, event: &BotDeathEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    fn on_hit_wall(&self, bot: &Bot<'_>, event: &HitWallEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    fn on_hit_bot(&self, bot: &Bot<'_>, event: &HitBotEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    fn on_bullet_fired(&self, bot: &Bot<'_>, event: &BulletFiredEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    fn on_hit_by_bullet(&self, bot: &Bot<'_>, event: &HitByBulletEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    fn on_bullet_hit(&self, bot: &Bot<'_>, event: &BulletHitBotEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    fn on_bullet_hit_bullet(
        &self,
        bot: &Bot<'_>,
        event: &BulletHitBulletEvent,
    ) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    fn on_bullet_hit_wall(&self, bot: &Bot<'_>, event: &BulletHitWallEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    fn on_scanned_bot(&self, bot: &Bot<'_>, event: &ScannedBotEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    /// The intent for `event.turn_number` did not reach the server in time
    fn on_skipped_turn(&self, bot: &Bot<'_>, event: &SkippedTurnEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    fn on_won_round(&self, bot: &Bot<'_>, event: &WonRoundEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    /// A condition added with `Bot::add_custom_event` held
    fn on_custom_event(&self, bot: &Bot<'_>, event: &CustomEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    fn on_team_message(&self, bot: &Bot<'_>, event: &TeamMessageEvent) -> Result<(), BotError> {
        let _ = (bot, event);
        Ok(())
    }

    /// Called by the runner, outside of any round
    fn on_connection(&self, event: &ConnectionEvent) {
        let _ = event;
    }

    fn on_game_started(&self, event: &GameStartedEventForBot) {
        let _ = event;
    }

    fn on_game_ended(&self, event: &GameEndedEventForBot) {
        let _ = event;
    }

    fn on_round_started(&self, round_number: i32) {
        let _ = round_number;
    }

    fn on_round_ended(&self, event: &RoundEndedEventForBot) {
        let _ = event;
    }
}
