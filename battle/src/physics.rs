//! Physical rules of the arena and angle arithmetic

/// Maximum absolute speed, units per turn
pub const MAX_SPEED: f64 = 8.0;

/// Speed gained per turn when accelerating
pub const ACCELERATION: f64 = 1.0;

/// Speed lost per turn when braking (magnitude)
pub const DECELERATION: f64 = 2.0;

/// Maximum body turn rate at rest, degrees per turn
pub const MAX_TURN_RATE: f64 = 10.0;

/// Maximum gun turn rate, degrees per turn
pub const MAX_GUN_TURN_RATE: f64 = 20.0;

/// Maximum radar turn rate, degrees per turn
pub const MAX_RADAR_TURN_RATE: f64 = 45.0;

pub const MIN_FIREPOWER: f64 = 0.1;
pub const MAX_FIREPOWER: f64 = 3.0;

/// Radius of the bot's bounding circle
pub const BOUNDING_CIRCLE_RADIUS: f64 = 18.0;

/// Maximum length of the radar scan arc
pub const SCAN_RADIUS: f64 = 1200.0;

/// Values closer to zero than this are treated as zero
pub const NEAR_ZERO: f64 = 1e-5;

pub fn is_near_zero(value: f64) -> bool {
    value.abs() < NEAR_ZERO
}

/// Normalize into (-180, 180]
pub fn normalize_relative_angle(angle: f64) -> f64 {
    let angle = angle.rem_euclid(360.0);
    if angle > 180.0 { angle - 360.0 } else { angle }
}

/// Normalize into [0, 360)
pub fn normalize_absolute_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Signed shortest rotation that takes `source` to `target`
pub fn calc_delta_angle(target: f64, source: f64) -> f64 {
    normalize_relative_angle(target - source)
}

/// Body turn rate limit at the given speed
pub fn max_turn_rate_at(speed: f64) -> f64 {
    MAX_TURN_RATE - 0.75 * speed.abs()
}

pub fn bullet_speed(firepower: f64) -> f64 {
    20.0 - 3.0 * firepower
}

/// Heat the gun gains from firing with the given power
pub fn gun_heat(firepower: f64) -> f64 {
    1.0 + firepower / 5.0
}

pub fn bullet_damage(firepower: f64) -> f64 {
    let damage = 4.0 * firepower;
    if firepower > 1.0 { damage + 2.0 * (firepower - 1.0) } else { damage }
}

/// Absolute direction in degrees from one point to another
pub fn direction_to(from_x: f64, from_y: f64, to_x: f64, to_y: f64) -> f64 {
    normalize_absolute_angle((to_y - from_y).atan2(to_x - from_x).to_degrees())
}
