//! Per-turn speed projection.
//!
//! Picks the fastest speed that still lets the bot brake to a standstill
//! exactly on the remaining distance, within the acceleration limits.

use crate::physics::{ACCELERATION, DECELERATION, MAX_SPEED};

/// Speed to request for the next turn.
///
/// `speed` is the current speed, `distance` the signed distance left to
/// travel (may be infinite), `max_speed` the bot's own speed limit.
pub fn new_target_speed(speed: f64, distance: f64, max_speed: f64) -> f64 {
    if distance < 0.0 {
        return -new_target_speed(-speed, -distance, max_speed);
    }

    let target = if distance.is_infinite() {
        max_speed
    } else {
        max_speed_for_distance(distance).min(max_speed)
    };

    if speed >= 0.0 {
        target.clamp(speed - DECELERATION, speed + ACCELERATION)
    } else {
        target.clamp(speed - ACCELERATION, speed + max_deceleration(-speed))
    }
}

/// Distance covered while braking from `speed` to a standstill
pub fn distance_until_stop(speed: f64) -> f64 {
    let mut speed = speed.abs();
    let mut distance = 0.0;
    while speed > 0.0 {
        speed = new_target_speed(speed, 0.0, MAX_SPEED);
        distance += speed;
    }
    distance
}

/// Highest speed from which `distance` can still be braked away in whole turns
fn max_speed_for_distance(distance: f64) -> f64 {
    let decel_time =
        (((8.0 * distance / DECELERATION + 1.0).sqrt() - 1.0) / 2.0).ceil().max(1.0);
    if decel_time.is_infinite() {
        return MAX_SPEED;
    }

    let decel_distance = (decel_time / 2.0) * (decel_time - 1.0) * DECELERATION;
    (decel_time - 1.0) * DECELERATION + (distance - decel_distance) / decel_time
}

/// Largest speed change available when braking from `speed` through zero
fn max_deceleration(speed: f64) -> f64 {
    let decel_time = speed / DECELERATION;
    let accel_time = 1.0 - decel_time;

    decel_time.min(1.0) * DECELERATION + accel_time.max(0.0) * ACCELERATION
}
