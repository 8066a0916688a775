//! Remaining movement and the per-turn projection of it into the intent

use skirmish_protocol::{BotIntent, BotState};

use super::projection::{distance_until_stop, new_target_speed};
use crate::physics::{
    MAX_GUN_TURN_RATE, MAX_RADAR_TURN_RATE, MAX_SPEED, MAX_TURN_RATE, calc_delta_angle,
    is_near_zero,
};

/// One of the three independently rotating parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Body,
    Gun,
    Radar,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Body, Axis::Gun, Axis::Radar];

    fn index(self) -> usize {
        self as usize
    }

    fn direction(self, state: &BotState) -> f64 {
        match self {
            Axis::Body => state.direction,
            Axis::Gun => state.gun_direction,
            Axis::Radar => state.radar_direction,
        }
    }

    fn rate_mut(self, intent: &mut BotIntent) -> &mut Option<f64> {
        match self {
            Axis::Body => &mut intent.turn_rate,
            Axis::Gun => &mut intent.gun_turn_rate,
            Axis::Radar => &mut intent.radar_turn_rate,
        }
    }
}

/// Speed and turn-rate ceilings chosen by the bot, never above the physical ones
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementLimits {
    pub max_speed: f64,
    pub max_turn_rate: f64,
    pub max_gun_turn_rate: f64,
    pub max_radar_turn_rate: f64,
}

impl MovementLimits {
    pub fn max_rate(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Body => self.max_turn_rate,
            Axis::Gun => self.max_gun_turn_rate,
            Axis::Radar => self.max_radar_turn_rate,
        }
    }
}

impl Default for MovementLimits {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            max_turn_rate: MAX_TURN_RATE,
            max_gun_turn_rate: MAX_GUN_TURN_RATE,
            max_radar_turn_rate: MAX_RADAR_TURN_RATE,
        }
    }
}

/// What `stop` put aside for `resume`
#[derive(Debug, Clone, PartialEq)]
struct SavedMovement {
    distance_remaining: f64,
    turn_remaining: [f64; 3],
    previous_directions: Option<[f64; 3]>,
    overdrive: bool,
    target_speed: Option<f64>,
    rates: [Option<f64>; 3],
}

/// Movement still to be done, projected into the intent every turn.
///
/// Distances are in units, angles in degrees; positive angles turn left.
/// Infinite values mean "keep going" until a new finite command replaces them.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementGoal {
    distance_remaining: f64,
    turn_remaining: [f64; 3],
    /// Directions seen on the previous turn, to measure what was achieved
    previous_directions: Option<[f64; 3]>,
    /// Raw speed / rates set directly by the bot, not projected
    override_target_speed: bool,
    override_rate: [bool; 3],
    /// Turn goals set since the last `process_turn`; the rotation measured
    /// next belongs to the previous goal
    fresh_turn: [bool; 3],
    overdrive: bool,
    limits: MovementLimits,
    saved: Option<SavedMovement>,
}

impl MovementGoal {
    pub fn new() -> Self {
        Self {
            distance_remaining: 0.0,
            turn_remaining: [0.0; 3],
            previous_directions: None,
            override_target_speed: false,
            override_rate: [false; 3],
            fresh_turn: [false; 3],
            overdrive: false,
            limits: MovementLimits::default(),
            saved: None,
        }
    }

    pub fn distance_remaining(&self) -> f64 {
        self.distance_remaining
    }

    pub fn turn_remaining(&self, axis: Axis) -> f64 {
        self.turn_remaining[axis.index()]
    }

    pub fn limits(&self) -> &MovementLimits {
        &self.limits
    }

    pub fn is_stopped(&self) -> bool {
        self.saved.is_some()
    }

    pub fn is_overdriving(&self) -> bool {
        self.overdrive
    }

    pub fn set_max_speed(&mut self, max_speed: f64) {
        self.limits.max_speed = max_speed.abs().min(MAX_SPEED);
    }

    pub fn set_max_rate(&mut self, axis: Axis, max_rate: f64) {
        let max_rate = max_rate.abs();
        match axis {
            Axis::Body => self.limits.max_turn_rate = max_rate.min(MAX_TURN_RATE),
            Axis::Gun => self.limits.max_gun_turn_rate = max_rate.min(MAX_GUN_TURN_RATE),
            Axis::Radar => self.limits.max_radar_turn_rate = max_rate.min(MAX_RADAR_TURN_RATE),
        }
    }

    /// Travel `distance` (negative for backwards); the first step is projected now
    pub fn set_forward(&mut self, distance: f64, speed: f64, intent: &mut BotIntent) {
        self.override_target_speed = false;
        self.overdrive = false;
        self.distance_remaining = distance;
        self.project_distance(speed, intent);
    }

    /// Like `set_forward`, for a turn that has not been processed yet: the
    /// first step is projected by the next `process_turn`
    pub fn queue_forward(&mut self, distance: f64) {
        self.override_target_speed = false;
        self.overdrive = false;
        self.distance_remaining = distance;
    }

    /// Turn `axis` by `degrees` (positive is left)
    pub fn set_turn(&mut self, axis: Axis, degrees: f64, intent: &mut BotIntent) {
        self.override_rate[axis.index()] = false;
        self.fresh_turn[axis.index()] = false;
        self.turn_remaining[axis.index()] = degrees;
        self.apply_rate(axis, intent);
    }

    /// Like `set_turn`, for a turn that has not been processed yet
    pub fn queue_turn(&mut self, axis: Axis, degrees: f64) {
        self.override_rate[axis.index()] = false;
        self.fresh_turn[axis.index()] = true;
        self.turn_remaining[axis.index()] = degrees;
    }

    /// Request a raw speed; distance is then only tracked, not projected
    pub fn set_target_speed(&mut self, target_speed: f64, intent: &mut BotIntent) {
        self.override_target_speed = true;
        let max = self.limits.max_speed;
        intent.target_speed = Some(target_speed.clamp(-max, max));
    }

    /// Request a raw turn rate; the axis is not projected until the next `set_turn`
    pub fn set_rate(&mut self, axis: Axis, rate: f64, intent: &mut BotIntent) {
        self.override_rate[axis.index()] = true;
        self.turn_remaining[axis.index()] = 0.0;
        let max = self.limits.max_rate(axis);
        *axis.rate_mut(intent) = Some(rate.clamp(-max, max));
    }

    /// Advance the goal by what the last turn achieved and project the next turn.
    ///
    /// Call exactly once per turn with the newest state.
    pub fn process_turn(&mut self, state: &BotState, intent: &mut BotIntent) {
        let current = Axis::ALL.map(|axis| axis.direction(state));
        let previous = self.previous_directions.replace(current).unwrap_or(current);

        if state.energy <= 0.0 {
            self.clear_remaining();
            return;
        }

        for axis in Axis::ALL {
            let delta = calc_delta_angle(current[axis.index()], previous[axis.index()]);
            self.update_turn_remaining(axis, delta, intent);
        }
        self.update_distance_remaining(state.speed, intent);
    }

    /// Zero all speeds and rates, keeping what is left for `resume`.
    ///
    /// The goal itself is cleared, so projection keeps running and brakes the
    /// bot; new commands given while stopped apply normally until `resume`
    /// brings the saved goal back. A second stop is ignored unless
    /// `overwrite` is set. Returns whether the goal was saved.
    pub fn stop(&mut self, intent: &mut BotIntent, overwrite: bool) -> bool {
        if self.is_stopped() && !overwrite {
            return false;
        }

        self.saved = Some(SavedMovement {
            distance_remaining: self.distance_remaining,
            turn_remaining: self.turn_remaining,
            previous_directions: self.previous_directions,
            overdrive: self.overdrive,
            target_speed: intent.target_speed,
            rates: Axis::ALL.map(|axis| *axis.rate_mut(intent)),
        });
        self.clear_remaining();

        intent.target_speed = Some(0.0);
        for axis in Axis::ALL {
            *axis.rate_mut(intent) = Some(0.0);
        }
        true
    }

    /// Restore what `stop` saved. Returns false if the goal was not stopped.
    pub fn resume(&mut self, intent: &mut BotIntent) -> bool {
        let Some(saved) = self.saved.take() else {
            return false;
        };

        self.distance_remaining = saved.distance_remaining;
        self.turn_remaining = saved.turn_remaining;
        self.previous_directions = saved.previous_directions;
        self.overdrive = saved.overdrive;
        intent.target_speed = saved.target_speed;
        for axis in Axis::ALL {
            *axis.rate_mut(intent) = saved.rates[axis.index()];
        }
        true
    }

    /// Drop the remaining distance, e.g. after running into a wall
    pub fn clear_distance(&mut self) {
        self.distance_remaining = 0.0;
        self.overdrive = false;
    }

    /// Forget all remaining movement
    pub fn clear_remaining(&mut self) {
        self.distance_remaining = 0.0;
        self.turn_remaining = [0.0; 3];
        self.overdrive = false;
    }

    /// Start of a new round; limits survive
    pub fn reset(&mut self) {
        *self = Self {
            limits: self.limits,
            ..Self::new()
        };
    }

    fn update_turn_remaining(&mut self, axis: Axis, delta: f64, intent: &mut BotIntent) {
        if self.override_rate[axis.index()] {
            return;
        }
        let delta = if std::mem::take(&mut self.fresh_turn[axis.index()]) {
            0.0
        } else {
            delta
        };

        let remaining = self.turn_remaining[axis.index()];
        let remaining = if remaining.abs() <= delta.abs() {
            0.0
        } else {
            let left = remaining - delta;
            if is_near_zero(left) { 0.0 } else { left }
        };

        self.turn_remaining[axis.index()] = remaining;
        self.apply_rate(axis, intent);
    }

    fn update_distance_remaining(&mut self, speed: f64, intent: &mut BotIntent) {
        if self.override_target_speed {
            if self.distance_remaining.abs() < speed.abs() {
                self.distance_remaining = 0.0;
            } else {
                self.distance_remaining -= speed;
            }
            return;
        }

        self.project_distance(speed, intent);
    }

    fn project_distance(&mut self, speed: f64, intent: &mut BotIntent) {
        let max_speed = self.limits.max_speed;

        if self.distance_remaining.is_infinite() {
            intent.target_speed = Some(max_speed.copysign(self.distance_remaining));
            return;
        }

        let mut distance = self.distance_remaining;
        let mut new_speed = new_target_speed(speed, distance, max_speed);

        // Braking through zero while overshooting: stop here instead of coming back
        if self.overdrive && is_near_zero(new_speed) {
            distance = 0.0;
            new_speed = 0.0;
            self.overdrive = false;
        }

        if distance * new_speed >= 0.0 {
            self.overdrive = distance_until_stop(new_speed) > distance.abs();
        }

        let left = distance - new_speed;
        self.distance_remaining = if is_near_zero(left) { 0.0 } else { left };
        intent.target_speed = Some(new_speed);
    }

    fn apply_rate(&self, axis: Axis, intent: &mut BotIntent) {
        let max = self.limits.max_rate(axis);
        *axis.rate_mut(intent) = Some(self.turn_remaining[axis.index()].clamp(-max, max));
    }
}

impl Default for MovementGoal {
    fn default() -> Self {
        Self::new()
    }
}
