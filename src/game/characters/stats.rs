// Movement tuning for characters
// The player reads its values from the config file, enemies use the base set

/// Horizontal and vertical movement parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStats {
    // Horizontal
    /// Speed cap while standing (pixels/second)
    pub run_speed: f32,
    pub walk_speed: f32,
    /// Speed cap while crouched
    pub crouch_speed: f32,
    /// Horizontal acceleration while a direction is held (pixels/second²)
    pub acceleration: f32,
    /// Horizontal deceleration with no direction held
    pub deceleration: f32,
    /// Acceleration divisor while crouched
    pub crouch_lag: f32,

    // Vertical
    /// Jump impulse; applied upward regardless of sign
    pub jump_force: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub crouch_height_offset: f32,
}

/// Movement used when a character config has no physics block
pub const BASE_STATS: MovementStats = MovementStats {
    run_speed: 150.0,
    walk_speed: 80.0,
    crouch_speed: 60.0,
    acceleration: 900.0,
    deceleration: 1200.0,
    crouch_lag: 2.0,

    jump_force: 250.0,
    gravity: 600.0,
    max_fall_speed: 1100.0,
    crouch_height_offset: 0.0,
};

impl Default for MovementStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl MovementStats {
    /// Upward jump velocity (negative y)
    pub fn jump_velocity(&self) -> f32 {
        -self.jump_force.abs()
    }

    /// Horizontal acceleration, reduced while crouched
    pub fn accel(&self, crouching: bool) -> f32 {
        if crouching && self.crouch_lag > 0.0 {
            self.acceleration / self.crouch_lag
        } else {
            self.acceleration
        }
    }

    pub fn speed_cap(&self, crouching: bool) -> f32 {
        if crouching {
            self.crouch_speed
        } else {
            self.run_speed
        }
    }
}
