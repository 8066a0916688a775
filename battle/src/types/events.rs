//! Events delivered to bot handlers
//!
//! Event structs are plain data. Once an event is part of a snapshot
//! (behind an `Arc`) or staged in the client's queue, which owns it
//! privately, nothing can change it; handlers only ever get `&` access.

use skirmish_protocol::{BotState, BulletState, Event};

/// Tag of a [`BotEvent`] variant, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    Tick,
    /// This bot died
    Death,
    /// Another bot died
    BotDeath,
    HitWall,
    HitBot,
    BulletFired,
    HitByBullet,
    BulletHitBot,
    BulletHitBullet,
    BulletHitWall,
    ScannedBot,
    SkippedTurn,
    WonRound,
    Custom,
    TeamMessage,
}

impl EventKind {
    pub const COUNT: usize = 15;

    pub const ALL: [EventKind; Self::COUNT] = [
        EventKind::Tick,
        EventKind::Death,
        EventKind::BotDeath,
        EventKind::HitWall,
        EventKind::HitBot,
        EventKind::BulletFired,
        EventKind::HitByBullet,
        EventKind::BulletHitBot,
        EventKind::BulletHitBullet,
        EventKind::BulletHitWall,
        EventKind::ScannedBot,
        EventKind::SkippedTurn,
        EventKind::WonRound,
        EventKind::Custom,
        EventKind::TeamMessage,
    ];

    /// Position in [`EventKind::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Critical events are never dropped for being old
    pub fn is_critical(self) -> bool {
        matches!(
            self,
            EventKind::Death | EventKind::SkippedTurn | EventKind::WonRound
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Tick => "tick",
            EventKind::Death => "death",
            EventKind::BotDeath => "bot-death",
            EventKind::HitWall => "hit-wall",
            EventKind::HitBot => "hit-bot",
            EventKind::BulletFired => "bullet-fired",
            EventKind::HitByBullet => "hit-by-bullet",
            EventKind::BulletHitBot => "bullet-hit-bot",
            EventKind::BulletHitBullet => "bullet-hit-bullet",
            EventKind::BulletHitWall => "bullet-hit-wall",
            EventKind::ScannedBot => "scanned-bot",
            EventKind::SkippedTurn => "skipped-turn",
            EventKind::WonRound => "won-round",
            EventKind::Custom => "custom",
            EventKind::TeamMessage => "team-message",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickEvent {
    pub turn_number: i32,
    pub round_number: i32,
    pub bot_state: BotState,
    pub bullet_states: Vec<BulletState>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeathEvent {
    pub turn_number: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BotDeathEvent {
    pub turn_number: i32,
    pub victim_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitWallEvent {
    pub turn_number: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitBotEvent {
    pub turn_number: i32,
    pub victim_id: i32,
    pub energy: f64,
    pub x: f64,
    pub y: f64,
    /// True if this bot drove into the other one
    pub rammed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulletFiredEvent {
    pub turn_number: i32,
    pub bullet: BulletState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitByBulletEvent {
    pub turn_number: i32,
    pub bullet: BulletState,
    pub damage: f64,
    /// Energy left after the hit
    pub energy: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulletHitBotEvent {
    pub turn_number: i32,
    pub victim_id: i32,
    pub bullet: BulletState,
    pub damage: f64,
    pub energy: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulletHitBulletEvent {
    pub turn_number: i32,
    pub bullet: BulletState,
    pub hit_bullet: BulletState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulletHitWallEvent {
    pub turn_number: i32,
    pub bullet: BulletState,
}

#[derive(Debug, Clone, PartialEq)]
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

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTurnEvent {
    pub turn_number: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WonRoundEvent {
    pub turn_number: i32,
}

/// Raised when a registered [`Condition`](super::Condition) holds
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEvent {
    pub turn_number: i32,
    /// Name of the condition that was met
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamMessageEvent {
    pub turn_number: i32,
    /// JSON payload as sent by the teammate
    pub message: String,
    pub message_type: String,
    pub sender_id: i32,
}

/// An event as seen by the bot.
///
/// The turn number and the critical flag are fixed when the event is
/// constructed and cannot change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    Tick(TickEvent),
    Death(DeathEvent),
    BotDeath(BotDeathEvent),
    HitWall(HitWallEvent),
    HitBot(HitBotEvent),
    BulletFired(BulletFiredEvent),
    HitByBullet(HitByBulletEvent),
    BulletHitBot(BulletHitBotEvent),
    BulletHitBullet(BulletHitBulletEvent),
    BulletHitWall(BulletHitWallEvent),
    ScannedBot(ScannedBotEvent),
    SkippedTurn(SkippedTurnEvent),
    WonRound(WonRoundEvent),
    Custom(CustomEvent),
    TeamMessage(TeamMessageEvent),
}

impl BotEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            BotEvent::Tick(_) => EventKind::Tick,
            BotEvent::Death(_) => EventKind::Death,
            BotEvent::BotDeath(_) => EventKind::BotDeath,
            BotEvent::HitWall(_) => EventKind::HitWall,
            BotEvent::HitBot(_) => EventKind::HitBot,
            BotEvent::BulletFired(_) => EventKind::BulletFired,
            BotEvent::HitByBullet(_) => EventKind::HitByBullet,
            BotEvent::BulletHitBot(_) => EventKind::BulletHitBot,
            BotEvent::BulletHitBullet(_) => EventKind::BulletHitBullet,
            BotEvent::BulletHitWall(_) => EventKind::BulletHitWall,
            BotEvent::ScannedBot(_) => EventKind::ScannedBot,
            BotEvent::SkippedTurn(_) => EventKind::SkippedTurn,
            BotEvent::WonRound(_) => EventKind::WonRound,
            BotEvent::Custom(_) => EventKind::Custom,
            BotEvent::TeamMessage(_) => EventKind::TeamMessage,
        }
    }

    pub fn turn_number(&self) -> i32 {
        match self {
            BotEvent::Tick(e) => e.turn_number,
            BotEvent::Death(e) => e.turn_number,
            BotEvent::BotDeath(e) => e.turn_number,
            BotEvent::HitWall(e) => e.turn_number,
            BotEvent::HitBot(e) => e.turn_number,
            BotEvent::BulletFired(e) => e.turn_number,
            BotEvent::HitByBullet(e) => e.turn_number,
            BotEvent::BulletHitBot(e) => e.turn_number,
            BotEvent::BulletHitBullet(e) => e.turn_number,
            BotEvent::BulletHitWall(e) => e.turn_number,
            BotEvent::ScannedBot(e) => e.turn_number,
            BotEvent::SkippedTurn(e) => e.turn_number,
            BotEvent::WonRound(e) => e.turn_number,
            BotEvent::Custom(e) => e.turn_number,
            BotEvent::TeamMessage(e) => e.turn_number,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.kind().is_critical()
    }

    /// Map a raw tick event, from the point of view of the bot with `my_id`.
    ///
    /// Returns `None` for event types this client does not know.
    pub fn from_wire(event: &Event, my_id: i32) -> Option<Self> {
        let mapped = match event {
            Event::BotDeathEvent(e) if e.victim_id == my_id => BotEvent::Death(DeathEvent {
                turn_number: e.turn_number,
            }),
            Event::BotDeathEvent(e) => BotEvent::BotDeath(BotDeathEvent {
                turn_number: e.turn_number,
                victim_id: e.victim_id,
            }),
            Event::BotHitBotEvent(e) => BotEvent::HitBot(HitBotEvent {
                turn_number: e.turn_number,
                victim_id: e.victim_id,
                energy: e.energy,
                x: e.x,
                y: e.y,
                rammed: e.rammed,
            }),
            Event::BotHitWallEvent(e) => BotEvent::HitWall(HitWallEvent {
                turn_number: e.turn_number,
            }),
            Event::BulletFiredEvent(e) => BotEvent::BulletFired(BulletFiredEvent {
                turn_number: e.turn_number,
                bullet: e.bullet.clone(),
            }),
            Event::BulletHitBotEvent(e) if e.victim_id == my_id => {
                BotEvent::HitByBullet(HitByBulletEvent {
                    turn_number: e.turn_number,
                    bullet: e.bullet.clone(),
                    damage: e.damage,
                    energy: e.energy,
                })
            }
            Event::BulletHitBotEvent(e) => BotEvent::BulletHitBot(BulletHitBotEvent {
                turn_number: e.turn_number,
                victim_id: e.victim_id,
                bullet: e.bullet.clone(),
                damage: e.damage,
                energy: e.energy,
            }),
            Event::BulletHitBulletEvent(e) => BotEvent::BulletHitBullet(BulletHitBulletEvent {
                turn_number: e.turn_number,
                bullet: e.bullet.clone(),
                hit_bullet: e.hit_bullet.clone(),
            }),
            Event::BulletHitWallEvent(e) => BotEvent::BulletHitWall(BulletHitWallEvent {
                turn_number: e.turn_number,
                bullet: e.bullet.clone(),
            }),
            Event::ScannedBotEvent(e) => BotEvent::ScannedBot(ScannedBotEvent {
                turn_number: e.turn_number,
                scanned_by_bot_id: e.scanned_by_bot_id,
                scanned_bot_id: e.scanned_bot_id,
                energy: e.energy,
                x: e.x,
                y: e.y,
                direction: e.direction,
                speed: e.speed,
            }),
            Event::SkippedTurnEvent(e) => BotEvent::SkippedTurn(SkippedTurnEvent {
                turn_number: e.turn_number,
            }),
            Event::WonRoundEvent(e) => BotEvent::WonRound(WonRoundEvent {
                turn_number: e.turn_number,
            }),
            Event::TeamMessageEvent(e) => BotEvent::TeamMessage(TeamMessageEvent {
                turn_number: e.turn_number,
                message: e.message.clone(),
                message_type: e.message_type.clone(),
                sender_id: e.sender_id,
            }),
            Event::Unknown => return None,
        };

        Some(mapped)
    }
}
