//! Domain types shared by the event queue and the bot API

mod color;
mod condition;
mod events;
mod priority;
mod snapshot;

pub use color::Color;
pub use condition::Condition;
pub use events::{
    BotDeathEvent, BotEvent, BulletFiredEvent, BulletHitBotEvent, BulletHitBulletEvent,
    BulletHitWallEvent, CustomEvent, DeathEvent, EventKind, HitBotEvent, HitByBulletEvent,
    HitWallEvent, ScannedBotEvent, SkippedTurnEvent, TeamMessageEvent, TickEvent, WonRoundEvent,
};
pub use priority::EventPriorities;
pub use snapshot::TickSnapshot;
