//! Command facade handed to the bot program.
//!
//! `set_*` methods only record a command and return at once. The blocking
//! methods record the command and then spend turns until it is done; every
//! blocking call ends the current turn, sends the intent and dispatches the
//! events of the following turn to the handler.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use skirmish_battle::physics::{MAX_FIREPOWER, MIN_FIREPOWER, direction_to, normalize_relative_angle};
use skirmish_battle::{Axis, BotEvent, BulletState, Color, Condition, EventKind, TickSnapshot};
use skirmish_protocol::{BotIntent, BotState, GameSetup, TeamMessage};

use crate::error::{BotError, check_finite, check_not_nan};
use crate::handler::BotHandler;
use crate::internals::{BotInternals, TurnHook};

/// Most team messages that can be queued for one turn
pub const MAX_TEAM_MESSAGES_PER_TURN: usize = 10;

/// Largest serialized team message, in bytes
pub const MAX_TEAM_MESSAGE_SIZE: usize = 32768;

pub struct Bot<'a> {
    internals: &'a BotInternals,
    handler: &'a dyn BotHandler,
}

impl<'a> Bot<'a> {
    pub fn new(internals: &'a BotInternals, handler: &'a dyn BotHandler) -> Self {
        Self { internals, handler }
    }

    // Turn state

    /// Latest snapshot
    pub fn tick(&self) -> Result<Arc<TickSnapshot>, BotError> {
        self.internals.snapshot().ok_or(BotError::NoTickYet)
    }

    fn state<T>(&self, read: impl FnOnce(&BotState) -> T) -> Result<T, BotError> {
        Ok(read(&self.tick()?.bot_state))
    }

    pub fn turn_number(&self) -> Result<i32, BotError> {
        Ok(self.tick()?.turn_number)
    }

    pub fn round_number(&self) -> Result<i32, BotError> {
        Ok(self.tick()?.round_number)
    }

    pub fn energy(&self) -> Result<f64, BotError> {
        self.state(|s| s.energy)
    }

    pub fn is_disabled(&self) -> Result<bool, BotError> {
        Ok(self.tick()?.is_disabled())
    }

    pub fn x(&self) -> Result<f64, BotError> {
        self.state(|s| s.x)
    }

    pub fn y(&self) -> Result<f64, BotError> {
        self.state(|s| s.y)
    }

    pub fn direction(&self) -> Result<f64, BotError> {
        self.state(|s| s.direction)
    }

    pub fn gun_direction(&self) -> Result<f64, BotError> {
        self.state(|s| s.gun_direction)
    }

    pub fn radar_direction(&self) -> Result<f64, BotError> {
        self.state(|s| s.radar_direction)
    }

    pub fn speed(&self) -> Result<f64, BotError> {
        self.state(|s| s.speed)
    }

    pub fn gun_heat(&self) -> Result<f64, BotError> {
        self.state(|s| s.gun_heat)
    }

    pub fn enemy_count(&self) -> Result<i32, BotError> {
        self.state(|s| s.enemy_count)
    }

    pub fn bullet_states(&self) -> Result<Vec<BulletState>, BotError> {
        Ok(self.tick()?.bullet_states.clone())
    }

    /// Time left to answer the current turn
    pub fn time_left(&self) -> Duration {
        self.internals.time_left()
    }

    pub fn is_running(&self) -> bool {
        self.internals.is_running()
    }

    // Game

    pub fn my_id(&self) -> Option<i32> {
        self.internals.my_id()
    }

    pub fn teammate_ids(&self) -> Vec<i32> {
        self.internals.teammate_ids()
    }

    pub fn is_teammate(&self, bot_id: i32) -> bool {
        self.internals.teammate_ids().contains(&bot_id)
    }

    pub fn game_setup(&self) -> Option<GameSetup> {
        self.internals.game_setup()
    }

    // Geometry helpers

    /// Absolute direction from this bot to a point
    pub fn direction_to(&self, x: f64, y: f64) -> Result<f64, BotError> {
        self.state(|s| direction_to(s.x, s.y, x, y))
    }

    /// Body turn needed to face a point, in (-180, 180]
    pub fn bearing_to(&self, x: f64, y: f64) -> Result<f64, BotError> {
        self.state(|s| normalize_relative_angle(direction_to(s.x, s.y, x, y) - s.direction))
    }

    pub fn gun_bearing_to(&self, x: f64, y: f64) -> Result<f64, BotError> {
        self.state(|s| normalize_relative_angle(direction_to(s.x, s.y, x, y) - s.gun_direction))
    }

    pub fn radar_bearing_to(&self, x: f64, y: f64) -> Result<f64, BotError> {
        self.state(|s| normalize_relative_angle(direction_to(s.x, s.y, x, y) - s.radar_direction))
    }

    pub fn distance_to(&self, x: f64, y: f64) -> Result<f64, BotError> {
        self.state(|s| (x - s.x).hypot(y - s.y))
    }

    // Remaining movement

    pub fn distance_remaining(&self) -> f64 {
        self.internals.movement().distance_remaining()
    }

    pub fn turn_remaining(&self) -> f64 {
        self.internals.movement().turn_remaining(Axis::Body)
    }

    pub fn gun_turn_remaining(&self) -> f64 {
        self.internals.movement().turn_remaining(Axis::Gun)
    }

    pub fn radar_turn_remaining(&self) -> f64 {
        self.internals.movement().turn_remaining(Axis::Radar)
    }

    pub fn max_speed(&self) -> f64 {
        self.internals.movement().limits().max_speed
    }

    pub fn max_turn_rate(&self) -> f64 {
        self.internals.movement().limits().max_turn_rate
    }

    pub fn max_gun_turn_rate(&self) -> f64 {
        self.internals.movement().limits().max_gun_turn_rate
    }

    pub fn max_radar_turn_rate(&self) -> f64 {
        self.internals.movement().limits().max_radar_turn_rate
    }

    pub fn is_stopped(&self) -> bool {
        self.internals.movement().is_stopped()
    }

    /// Firepower waiting to be fired, if any
    pub fn firepower(&self) -> Option<f64> {
        self.internals.intent().firepower
    }

    // Movement commands

    fn current_speed(&self) -> f64 {
        self.internals.snapshot().map_or(0.0, |s| s.bot_state.speed)
    }

    /// Move `distance` units ahead; infinite keeps moving
    pub fn set_forward(&self, distance: f64) -> Result<(), BotError> {
        let distance = check_not_nan("distance", distance)?;
        // An unprocessed turn is projected by the next `go()` anyway
        if !self.internals.is_turn_processed() {
            self.internals.movement().queue_forward(distance);
            return Ok(());
        }
        let speed = self.current_speed();
        let mut intent = self.internals.intent();
        self.internals
            .movement()
            .set_forward(distance, speed, &mut intent);
        Ok(())
    }

    pub fn set_back(&self, distance: f64) -> Result<(), BotError> {
        self.set_forward(-check_not_nan("distance", distance)?)
    }

    fn set_turn(&self, axis: Axis, degrees: f64) -> Result<(), BotError> {
        let degrees = check_not_nan("degrees", degrees)?;
        if !self.internals.is_turn_processed() {
            self.internals.movement().queue_turn(axis, degrees);
            return Ok(());
        }
        let mut intent = self.internals.intent();
        self.internals.movement().set_turn(axis, degrees, &mut intent);
        Ok(())
    }

    pub fn set_turn_left(&self, degrees: f64) -> Result<(), BotError> {
        self.set_turn(Axis::Body, degrees)
    }

    pub fn set_turn_right(&self, degrees: f64) -> Result<(), BotError> {
        self.set_turn(Axis::Body, -check_not_nan("degrees", degrees)?)
    }

    pub fn set_turn_gun_left(&self, degrees: f64) -> Result<(), BotError> {
        self.set_turn(Axis::Gun, degrees)
    }

    pub fn set_turn_gun_right(&self, degrees: f64) -> Result<(), BotError> {
        self.set_turn(Axis::Gun, -check_not_nan("degrees", degrees)?)
    }

    pub fn set_turn_radar_left(&self, degrees: f64) -> Result<(), BotError> {
        self.set_turn(Axis::Radar, degrees)
    }

    pub fn set_turn_radar_right(&self, degrees: f64) -> Result<(), BotError> {
        self.set_turn(Axis::Radar, -check_not_nan("degrees", degrees)?)
    }

    /// Drive at a raw speed; the remaining distance is no longer projected
    pub fn set_target_speed(&self, speed: f64) -> Result<(), BotError> {
        let speed = check_finite("target speed", speed)?;
        let mut intent = self.internals.intent();
        self.internals.movement().set_target_speed(speed, &mut intent);
        Ok(())
    }

    fn set_rate(&self, axis: Axis, rate: f64) -> Result<(), BotError> {
        let rate = check_finite("turn rate", rate)?;
        let mut intent = self.internals.intent();
        self.internals.movement().set_rate(axis, rate, &mut intent);
        Ok(())
    }

    pub fn set_turn_rate(&self, rate: f64) -> Result<(), BotError> {
        self.set_rate(Axis::Body, rate)
    }

    pub fn set_gun_turn_rate(&self, rate: f64) -> Result<(), BotError> {
        self.set_rate(Axis::Gun, rate)
    }

    pub fn set_radar_turn_rate(&self, rate: f64) -> Result<(), BotError> {
        self.set_rate(Axis::Radar, rate)
    }

    pub fn set_max_speed(&self, max_speed: f64) -> Result<(), BotError> {
        let max_speed = check_finite("max speed", max_speed)?;
        self.internals.movement().set_max_speed(max_speed);
        Ok(())
    }

    fn set_max_rate(&self, axis: Axis, max_rate: f64) -> Result<(), BotError> {
        let max_rate = check_finite("max turn rate", max_rate)?;
        self.internals.movement().set_max_rate(axis, max_rate);
        Ok(())
    }

    pub fn set_max_turn_rate(&self, max_rate: f64) -> Result<(), BotError> {
        self.set_max_rate(Axis::Body, max_rate)
    }

    pub fn set_max_gun_turn_rate(&self, max_rate: f64) -> Result<(), BotError> {
        self.set_max_rate(Axis::Gun, max_rate)
    }

    pub fn set_max_radar_turn_rate(&self, max_rate: f64) -> Result<(), BotError> {
        self.set_max_rate(Axis::Radar, max_rate)
    }

    /// Stop all movement, keeping the rest for `set_resume`.
    /// Returns false if already stopped and `overwrite` is not set.
    pub fn set_stop(&self, overwrite: bool) -> bool {
        let mut intent = self.internals.intent();
        self.internals.movement().stop(&mut intent, overwrite)
    }

    /// Returns false if the bot was not stopped
    pub fn set_resume(&self) -> bool {
        let mut intent = self.internals.intent();
        self.internals.movement().resume(&mut intent)
    }

    // Gun and radar

    /// Fire on the next turn. Returns false if the gun is still hot, the
    /// bot lacks the energy, or the firepower is below the minimum.
    pub fn set_fire(&self, firepower: f64) -> Result<bool, BotError> {
        let firepower = check_finite("firepower", firepower)?;
        let tick = self.tick()?;
        let state = &tick.bot_state;
        if firepower < MIN_FIREPOWER || state.gun_heat > 0.0 || state.energy < firepower {
            return Ok(false);
        }

        self.internals.intent().firepower = Some(firepower.min(MAX_FIREPOWER));
        Ok(true)
    }

    pub fn set_rescan(&self) {
        self.internals.intent().rescan = Some(true);
    }

    pub fn set_fire_assist(&self, enabled: bool) {
        self.internals.intent().fire_assist = Some(enabled);
    }

    pub fn set_adjust_gun_for_body_turn(&self, adjust: bool) {
        self.internals.intent().adjust_gun_for_body_turn = Some(adjust);
    }

    pub fn set_adjust_radar_for_body_turn(&self, adjust: bool) {
        self.internals.intent().adjust_radar_for_body_turn = Some(adjust);
    }

    /// Also turns fire assist off while adjusting
    pub fn set_adjust_radar_for_gun_turn(&self, adjust: bool) {
        let mut intent = self.internals.intent();
        intent.adjust_radar_for_gun_turn = Some(adjust);
        intent.fire_assist = Some(!adjust);
    }

    // Colors, `None` restores the default

    fn set_color(&self, field: fn(&mut BotIntent) -> &mut Option<String>, color: Option<Color>) {
        *field(&mut self.internals.intent()) = color.map(|c| c.to_hex());
    }

    pub fn set_body_color(&self, color: Option<Color>) {
        self.set_color(|i| &mut i.body_color, color);
    }

    pub fn set_turret_color(&self, color: Option<Color>) {
        self.set_color(|i| &mut i.turret_color, color);
    }

    pub fn set_radar_color(&self, color: Option<Color>) {
        self.set_color(|i| &mut i.radar_color, color);
    }

    pub fn set_bullet_color(&self, color: Option<Color>) {
        self.set_color(|i| &mut i.bullet_color, color);
    }

    pub fn set_scan_color(&self, color: Option<Color>) {
        self.set_color(|i| &mut i.scan_color, color);
    }

    pub fn set_tracks_color(&self, color: Option<Color>) {
        self.set_color(|i| &mut i.tracks_color, color);
    }

    pub fn set_gun_color(&self, color: Option<Color>) {
        self.set_color(|i| &mut i.gun_color, color);
    }

    // Team messages

    pub fn send_team_message<T: Serialize>(&self, teammate_id: i32, message: &T) -> Result<(), BotError> {
        self.queue_team_message(Some(teammate_id), message)
    }

    pub fn broadcast_team_message<T: Serialize>(&self, message: &T) -> Result<(), BotError> {
        self.queue_team_message(None, message)
    }

    fn queue_team_message<T: Serialize>(&self, receiver_id: Option<i32>, message: &T) -> Result<(), BotError> {
        let json = serde_json::to_string(message)?;
        if json.len() > MAX_TEAM_MESSAGE_SIZE {
            return Err(BotError::TeamMessageTooLarge {
                size: json.len(),
                max: MAX_TEAM_MESSAGE_SIZE,
            });
        }

        let mut intent = self.internals.intent();
        if intent.team_messages.len() >= MAX_TEAM_MESSAGES_PER_TURN {
            return Err(BotError::TeamMessageLimit {
                max: MAX_TEAM_MESSAGES_PER_TURN,
            });
        }
        intent.team_messages.push(TeamMessage {
            message: json,
            message_type: short_type_name::<T>().to_string(),
            receiver_id,
        });
        Ok(())
    }

    // Events

    pub fn event_priority(&self, kind: EventKind) -> i32 {
        self.internals.queue().priority(kind)
    }

    pub fn set_event_priority(&self, kind: EventKind, priority: i32) {
        self.internals.queue().set_priority(kind, priority);
    }

    /// Let the running handler be unwound by a newer event of the same
    /// priority. Returns false when called outside of a handler.
    pub fn set_interruptible(&self, interruptible: bool) -> bool {
        self.internals.queue().set_interruptible(interruptible)
    }

    /// Raise a custom event every turn the condition holds.
    /// Returns false if a condition with that name is already registered.
    pub fn add_custom_event(&self, condition: Condition) -> bool {
        self.internals.add_condition(condition)
    }

    pub fn remove_custom_event(&self, name: &str) -> bool {
        self.internals.remove_condition(name)
    }

    /// Events dropped so far because the queue was full
    pub fn dropped_event_count(&self) -> u64 {
        self.internals.queue().overflow_count()
    }

    // Output

    /// Captured and shipped to the server with the next intent
    pub fn println(&self, text: impl Display) {
        self.internals.write_out(&text.to_string());
    }

    pub fn eprintln(&self, text: impl Display) {
        self.internals.write_err(&text.to_string());
    }

    /// Add an SVG element to this turn's debug graphics
    pub fn draw(&self, element: &str) {
        self.internals.draw(element);
    }

    // Blocking commands

    /// End the turn and wait for the next one
    pub fn go(&self) -> Result<(), BotError> {
        self.internals.execute(self)
    }

    /// Spend at least one turn, then more until `condition` holds
    pub fn wait_for(&self, mut condition: impl FnMut() -> bool) -> Result<(), BotError> {
        self.go()?;
        loop {
            if !self.internals.is_running() {
                return Err(BotError::Aborted);
            }
            if condition() {
                return Ok(());
            }
            self.go()?;
        }
    }

    fn is_standing_still(&self) -> bool {
        self.distance_remaining() == 0.0 && self.speed().is_ok_and(|speed| speed == 0.0)
    }

    pub fn forward(&self, distance: f64) -> Result<(), BotError> {
        self.set_forward(distance)?;
        self.wait_for(|| self.is_standing_still())
    }

    pub fn back(&self, distance: f64) -> Result<(), BotError> {
        self.set_back(distance)?;
        self.wait_for(|| self.is_standing_still())
    }

    pub fn turn_left(&self, degrees: f64) -> Result<(), BotError> {
        self.set_turn_left(degrees)?;
        self.wait_for(|| self.turn_remaining() == 0.0)
    }

    pub fn turn_right(&self, degrees: f64) -> Result<(), BotError> {
        self.set_turn_right(degrees)?;
        self.wait_for(|| self.turn_remaining() == 0.0)
    }

    pub fn turn_gun_left(&self, degrees: f64) -> Result<(), BotError> {
        self.set_turn_gun_left(degrees)?;
        self.wait_for(|| self.gun_turn_remaining() == 0.0)
    }

    pub fn turn_gun_right(&self, degrees: f64) -> Result<(), BotError> {
        self.set_turn_gun_right(degrees)?;
        self.wait_for(|| self.gun_turn_remaining() == 0.0)
    }

    pub fn turn_radar_left(&self, degrees: f64) -> Result<(), BotError> {
        self.set_turn_radar_left(degrees)?;
        self.wait_for(|| self.radar_turn_remaining() == 0.0)
    }

    pub fn turn_radar_right(&self, degrees: f64) -> Result<(), BotError> {
        self.set_turn_radar_right(degrees)?;
        self.wait_for(|| self.radar_turn_remaining() == 0.0)
    }

    /// Fire and spend the turn. Returns whether the shot was accepted.
    pub fn fire(&self, firepower: f64) -> Result<bool, BotError> {
        let fired = self.set_fire(firepower)?;
        self.go()?;
        Ok(fired)
    }

    pub fn rescan(&self) -> Result<(), BotError> {
        self.set_rescan();
        self.go()
    }

    /// Stop and wait until the bot stands still
    pub fn stop(&self, overwrite: bool) -> Result<(), BotError> {
        self.set_stop(overwrite);
        self.wait_for(|| self.speed().is_ok_and(|speed| speed == 0.0))
    }

    pub fn resume(&self) -> Result<(), BotError> {
        self.set_resume();
        self.go()
    }

    fn dispatch(&self, event: &BotEvent) -> Result<(), BotError> {
        let handler = self.handler;
        match event {
            BotEvent::Tick(e) => handler.on_tick(self, e),
            BotEvent::Death(e) => handler.on_death(self, e),
            BotEvent::BotDeath(e) => handler.on_bot_death(self, e),
            BotEvent::HitWall(e) => handler.on_hit_wall(self, e),
            BotEvent::HitBot(e) => handler.on_hit_bot(self, e),
            BotEvent::BulletFired(e) => handler.on_bullet_fired(self, e),
            BotEvent::HitByBullet(e) => handler.on_hit_by_bullet(self, e),
            BotEvent::BulletHitBot(e) => handler.on_bullet_hit(self, e),
            BotEvent::BulletHitBullet(e) => handler.on_bullet_hit_bullet(self, e),
            BotEvent::BulletHitWall(e) => handler.on_bullet_hit_wall(self, e),
            BotEvent::ScannedBot(e) => handler.on_scanned_bot(self, e),
            BotEvent::SkippedTurn(e) => handler.on_skipped_turn(self, e),
            BotEvent::WonRound(e) => handler.on_won_round(self, e),
            BotEvent::Custom(e) => handler.on_custom_event(self, e),
            BotEvent::TeamMessage(e) => handler.on_team_message(self, e),
        }
    }
}

impl TurnHook for Bot<'_> {
    /// Project the movement goal into the intent, then run the handlers
    fn on_new_turn(&self, snapshot: &TickSnapshot) -> Result<(), BotError> {
        {
            let mut intent = self.internals.intent();
            let mut movement = self.internals.movement();
            for event in &snapshot.events {
                match event {
                    BotEvent::BulletFired(_) => intent.firepower = None,
                    BotEvent::HitWall(_) => movement.clear_distance(),
                    BotEvent::HitBot(e) if e.rammed => movement.clear_distance(),
                    _ => {}
                }
            }
            movement.process_turn(&snapshot.bot_state, &mut intent);
        }

        self.internals
            .dispatch_events(snapshot.turn_number, |event| self.dispatch(event))
    }
}

/// `my_crate::Radar` -> `Radar`
fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use skirmish_battle::{BulletFiredEvent, HitWallEvent, ScannedBotEvent};

    use crate::test_support::{alive, serve_physics, serve_script, serve_turns, setup, snapshot, snapshot_with};

    struct Idle;

    impl BotHandler for Idle {}

    fn scanned(turn_number: i32) -> BotEvent {
        BotEvent::ScannedBot(ScannedBotEvent {
            turn_number,
            scanned_by_bot_id: 1,
            scanned_bot_id: 2,
            energy: 100.0,
            x: 100.0,
            y: 100.0,
            direction: 0.0,
            speed: 0.0,
        })
    }

    #[test]
    fn test_getters_before_tick() {
        let (internals, _) = setup();
        let bot = Bot::new(&internals, &Idle);

        assert!(matches!(bot.energy(), Err(BotError::NoTickYet)));
        assert!(matches!(bot.turn_number(), Err(BotError::NoTickYet)));
        assert!(matches!(bot.set_fire(1.0), Err(BotError::NoTickYet)));
        assert_eq!(bot.distance_remaining(), 0.0);
        assert_eq!(bot.max_speed(), 8.0);
    }

    #[test]
    fn test_invalid_values_leave_intent_untouched() {
        let (internals, _) = setup();
        internals.on_tick_received(snapshot(1));
        let bot = Bot::new(&internals, &Idle);

        assert!(matches!(
            bot.set_forward(f64::NAN),
            Err(BotError::InvalidValue { name: "distance", .. })
        ));
        assert!(bot.set_turn_left(f64::NAN).is_err());
        assert!(bot.set_turn_rate(f64::INFINITY).is_err());
        assert!(bot.set_target_speed(f64::NAN).is_err());
        assert!(bot.set_max_speed(f64::NEG_INFINITY).is_err());
        assert!(bot.set_fire(f64::INFINITY).is_err());

        assert_eq!(internals.pending_intent(), BotIntent::default());
    }

    #[test]
    fn test_infinite_distance_is_continuous() {
        let (internals, _) = setup();
        let bot = Bot::new(&internals, &Idle);

        bot.set_back(f64::INFINITY).unwrap();
        bot.set_turn_right(f64::INFINITY).unwrap();
        // Projected when the turn is processed
        assert_eq!(internals.pending_intent().target_speed, None);
        bot.on_new_turn(&snapshot(1)).unwrap();

        let intent = internals.pending_intent();
        assert_eq!(intent.target_speed, Some(-8.0));
        assert_eq!(intent.turn_rate, Some(-10.0));
        assert_eq!(bot.distance_remaining(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_set_fire_rules() {
        let (internals, _) = setup();
        let bot = Bot::new(&internals, &Idle);

        let hot = BotState {
            gun_heat: 0.4,
            ..alive()
        };
        internals.on_tick_received(snapshot_with(1, hot, Vec::new()));
        assert!(!bot.set_fire(1.0).unwrap());

        let weak = BotState {
            energy: 0.5,
            ..alive()
        };
        internals.on_tick_received(snapshot_with(2, weak, Vec::new()));
        assert!(!bot.set_fire(1.0).unwrap());
        assert_eq!(bot.firepower(), None);

        internals.on_tick_received(snapshot(3));
        assert!(!bot.set_fire(0.05).unwrap());
        assert!(bot.set_fire(5.0).unwrap());
        assert_eq!(bot.firepower(), Some(3.0));
    }

    #[test]
    fn test_own_bullet_clears_firepower() {
        let (internals, _) = setup();
        internals.on_tick_received(snapshot(1));
        let bot = Bot::new(&internals, &Idle);
        bot.set_fire(2.0).unwrap();

        let fired = BotEvent::BulletFired(BulletFiredEvent {
            turn_number: 2,
            bullet: Default::default(),
        });
        bot.on_new_turn(&snapshot_with(2, alive(), vec![fired])).unwrap();

        assert_eq!(bot.firepower(), None);
    }

    #[test]
    fn test_hit_wall_clears_distance() {
        let (internals, _) = setup();
        let bot = Bot::new(&internals, &Idle);
        bot.set_forward(100.0).unwrap();
        bot.set_turn_left(30.0).unwrap();

        let hit = BotEvent::HitWall(HitWallEvent { turn_number: 1 });
        bot.on_new_turn(&snapshot_with(1, alive(), vec![hit])).unwrap();

        assert_eq!(bot.distance_remaining(), 0.0);
        assert_eq!(bot.turn_remaining(), 30.0);
    }

    #[derive(Serialize)]
    struct Target {
        x: f64,
        y: f64,
    }

    #[test]
    fn test_team_messages() {
        let (internals, _) = setup();
        let bot = Bot::new(&internals, &Idle);

        bot.send_team_message(3, &Target { x: 1.0, y: 2.0 }).unwrap();
        let intent = internals.pending_intent();
        assert_eq!(intent.team_messages[0].message_type, "Target");
        assert_eq!(intent.team_messages[0].message, r#"{"x":1.0,"y":2.0}"#);
        assert_eq!(intent.team_messages[0].receiver_id, Some(3));

        for _ in 1..MAX_TEAM_MESSAGES_PER_TURN {
            bot.broadcast_team_message(&"hello").unwrap();
        }
        assert!(matches!(
            bot.broadcast_team_message(&"one too many"),
            Err(BotError::TeamMessageLimit { max: 10 })
        ));
    }

    #[test]
    fn test_team_message_too_large() {
        let (internals, _) = setup();
        let bot = Bot::new(&internals, &Idle);

        let big = "x".repeat(MAX_TEAM_MESSAGE_SIZE);
        assert!(matches!(
            bot.broadcast_team_message(&big),
            Err(BotError::TeamMessageTooLarge { .. })
        ));
        assert!(internals.pending_intent().team_messages.is_empty());
    }

    #[test]
    fn test_colors_and_adjust_flags() {
        let (internals, _) = setup();
        let bot = Bot::new(&internals, &Idle);

        bot.set_body_color(Some(Color::RED));
        bot.set_gun_color(Some(Color::rgb(1, 2, 3)));
        bot.set_adjust_radar_for_gun_turn(true);

        let intent = internals.pending_intent();
        assert_eq!(intent.body_color.as_deref(), Some("#FF0000"));
        assert_eq!(intent.gun_color.as_deref(), Some("#010203"));
        assert_eq!(intent.adjust_radar_for_gun_turn, Some(true));
        assert_eq!(intent.fire_assist, Some(false));

        bot.set_body_color(None);
        assert_eq!(internals.pending_intent().body_color, None);
    }

    #[test]
    fn test_set_interruptible_outside_handler() {
        let (internals, _) = setup();
        let bot = Bot::new(&internals, &Idle);
        assert!(!bot.set_interruptible(true));
    }

    #[test]
    fn test_wait_for_spends_one_turn_when_already_true() {
        let (internals, transport) = setup();
        let server = serve_turns(&internals, &transport, 3);
        let bot = Bot::new(&internals, &Idle);

        bot.wait_for(|| true).unwrap();
        assert_eq!(bot.turn_number().unwrap(), 1);
        bot.wait_for(|| true).unwrap();
        assert_eq!(bot.turn_number().unwrap(), 2);

        internals.stop_round();
        server.join().unwrap();
    }

    #[test]
    fn test_forward_drives_exact_distance() {
        let (internals, transport) = setup();
        let server = serve_physics(&internals, &transport, 60);
        let bot = Bot::new(&internals, &Idle);

        bot.forward(100.0).unwrap();

        assert!((bot.x().unwrap() - 100.0).abs() < 1e-6);
        assert_eq!(bot.speed().unwrap(), 0.0);
        assert_eq!(bot.distance_remaining(), 0.0);

        internals.stop_round();
        server.join().unwrap();
    }

    #[test]
    fn test_turn_left_reaches_angle() {
        let (internals, transport) = setup();
        let server = serve_physics(&internals, &transport, 30);
        let bot = Bot::new(&internals, &Idle);

        bot.turn_left(45.0).unwrap();

        assert!((bot.direction().unwrap() - 45.0).abs() < 1e-9);
        assert_eq!(bot.turn_remaining(), 0.0);

        internals.stop_round();
        server.join().unwrap();
    }

    #[test]
    fn test_stop_and_resume() {
        let (internals, transport) = setup();
        let server = serve_physics(&internals, &transport, 60);
        let bot = Bot::new(&internals, &Idle);

        bot.set_forward(1000.0).unwrap();
        for _ in 0..5 {
            bot.go().unwrap();
        }
        let left = bot.distance_remaining();

        bot.stop(false).unwrap();
        assert!(bot.is_stopped());
        assert_eq!(bot.speed().unwrap(), 0.0);
        assert!(!bot.set_stop(false));

        assert!(bot.set_resume());
        assert!(!bot.is_stopped());
        assert_eq!(bot.distance_remaining(), left);

        internals.stop_round();
        server.join().unwrap();
    }

    #[test]
    fn test_blocking_call_after_round_end() {
        let (internals, _) = setup();
        let bot = Bot::new(&internals, &Idle);
        internals.stop_round();

        assert!(matches!(bot.forward(10.0), Err(BotError::Aborted)));
        assert!(matches!(bot.wait_for(|| true), Err(BotError::Aborted)));
    }

    /// Spends extra turns inside the handler of the first scan
    struct Scanner {
        interruptible: bool,
        log: Mutex<Vec<String>>,
    }

    impl Scanner {
        fn new(interruptible: bool) -> Self {
            Self {
                interruptible,
                log: Mutex::new(Vec::new()),
            }
        }

        fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl BotHandler for Scanner {
        fn on_scanned_bot(&self, bot: &Bot<'_>, event: &ScannedBotEvent) -> Result<(), BotError> {
            self.log.lock().unwrap().push(format!("start {}", event.turn_number));
            if event.turn_number == 1 {
                if self.interruptible {
                    assert!(bot.set_interruptible(true));
                    loop {
                        bot.go()?;
                    }
                }
                bot.go()?;
                bot.go()?;
            }
            self.log.lock().unwrap().push(format!("end {}", event.turn_number));
            Ok(())
        }
    }

    #[test]
    fn test_interruptible_handler_is_unwound() {
        let (internals, transport) = setup();
        let server = serve_script(
            &internals,
            &transport,
            vec![
                snapshot_with(1, alive(), vec![scanned(1)]),
                snapshot_with(2, alive(), vec![scanned(2)]),
                snapshot(3),
            ],
        );
        let scanner = Scanner::new(true);
        let bot = Bot::new(&internals, &scanner);

        bot.go().unwrap();
        bot.go().unwrap();

        assert_eq!(scanner.log(), vec!["start 1", "start 2", "end 2"]);
        assert_eq!(bot.turn_number().unwrap(), 3);
        // Bootstrap, turn 1, turn 2
        assert_eq!(transport.len(), 3);

        internals.stop_round();
        server.join().unwrap();
    }

    #[test]
    fn test_equal_priority_waits_for_running_handler() {
        let (internals, transport) = setup();
        let server = serve_script(
            &internals,
            &transport,
            vec![
                snapshot_with(1, alive(), vec![scanned(1)]),
                snapshot_with(2, alive(), vec![scanned(2)]),
                snapshot(3),
                snapshot(4),
            ],
        );
        let scanner = Scanner::new(false);
        let bot = Bot::new(&internals, &scanner);

        bot.go().unwrap();
        bot.go().unwrap();

        assert_eq!(scanner.log(), vec!["start 1", "end 1", "start 2", "end 2"]);
        assert_eq!(bot.turn_number().unwrap(), 4);
        assert_eq!(transport.len(), 4);

        internals.stop_round();
        server.join().unwrap();
    }
}
