//! Event model, per-turn snapshots and movement projection for Skirmish bots.
//!
//! This crate holds the pure part of the bot client: no sockets, no threads.
//!
//! # Overview
//!
//! `skirmish-battle` sits between `skirmish-protocol` (wire format) and the client:
//!
//! ```text
//! skirmish-protocol (wire format)
//!        │
//!        ▼
//! skirmish-battle (events + snapshots + movement) ← THIS CRATE
//!        │
//!        ▼
//! skirmish-client (turn coordinator, event queue, blocking bot API)
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`BotEvent`] / [`EventKind`] - Closed set of events a bot reacts to
//! - [`EventPriorities`] - Priority table indexed by event kind
//! - [`Condition`] - Named predicate that produces custom events
//! - [`TickSnapshot`] - Immutable state of one turn
//! - [`Color`] - Bot part colors
//!
//! ## Movement
//! - [`MovementGoal`] - Remaining distance and angles, projected every turn
//! - [`movement::new_target_speed`] - Overshoot-free speed projection
//!
//! # Example Usage
//!
//! ```ignore
//! use skirmish_battle::{MovementGoal, TickSnapshot};
//!
//! let mut goal = MovementGoal::new();
//! goal.set_forward(100.0, snapshot.bot_state.speed, &mut intent);
//!
//! // Once per turn, with the new snapshot
//! goal.process_turn(&snapshot.bot_state, &mut intent);
//! println!("{} units left", goal.distance_remaining());
//! ```

pub mod movement;
pub mod physics;
pub mod types;

pub use movement::{Axis, MovementGoal, MovementLimits};
pub use types::{
    BotDeathEvent, BotEvent, BulletFiredEvent, BulletHitBotEvent, BulletHitBulletEvent,
    BulletHitWallEvent, Color, Condition, CustomEvent, DeathEvent, EventKind, EventPriorities,
    HitBotEvent, HitByBulletEvent, HitWallEvent, ScannedBotEvent, SkippedTurnEvent,
    TeamMessageEvent, TickEvent, TickSnapshot, WonRoundEvent,
};

// Re-export the wire state records the snapshot is built from
pub use skirmish_protocol::{BotState, BulletState};
