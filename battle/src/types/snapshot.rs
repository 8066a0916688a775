//! Per-turn state as seen by the bot

use skirmish_protocol::{BotState, BulletState, TickEventForBot};

use super::{BotEvent, TickEvent};

/// Immutable state of one turn.
///
/// Built once from the wire tick and replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSnapshot {
    pub round_number: i32,
    pub turn_number: i32,
    pub bot_state: BotState,
    pub bullet_states: Vec<BulletState>,
    /// Mapped events, starting with the tick event itself
    pub events: Vec<BotEvent>,
}

impl TickSnapshot {
    /// Build from a wire tick, from the point of view of the bot with `my_id`
    pub fn from_wire(tick: &TickEventForBot, my_id: i32) -> Self {
        let mut events = Vec::with_capacity(tick.events.len() + 1);
        events.push(BotEvent::Tick(TickEvent {
            turn_number: tick.turn_number,
            round_number: tick.round_number,
            bot_state: tick.bot_state.clone(),
            bullet_states: tick.bullet_states.clone(),
        }));
        events.extend(
            tick.events
                .iter()
                .filter_map(|e| BotEvent::from_wire(e, my_id)),
        );

        Self {
            round_number: tick.round_number,
            turn_number: tick.turn_number,
            bot_state: tick.bot_state.clone(),
            bullet_states: tick.bullet_states.clone(),
            events,
        }
    }

    /// A bot with no energy left cannot move, turn or fire
    pub fn is_disabled(&self) -> bool {
        self.bot_state.energy <= 0.0
    }
}
