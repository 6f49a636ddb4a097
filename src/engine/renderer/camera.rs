// Dead-zone follow camera

use crate::core::Rect;
use crate::engine::physics::PhysicsBody;
use glam::Vec2;

/// Dead-zone half extents are this fraction of the viewport
pub const DEAD_ZONE_DIVISOR: f32 = 12.0;
pub const DEFAULT_FOLLOW_SPEED: f32 = 0.15;

/// 2D side-scrolling camera.
///
/// `position` is the top-left corner of the viewport in world space.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec2,
    viewport: Vec2,
    /// Half extents of the region the target may move in without moving the camera
    dead_zone: Vec2,
    /// Fraction of the excess distance covered per update
    pub follow_speed: f32,
    /// Look-ahead target from the last update (center plus a facing offset)
    look_ahead_target: Vec2,
}

impl Camera {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        let viewport = Vec2::new(viewport_width, viewport_height);
        Self {
            position: Vec2::ZERO,
            viewport,
            dead_zone: viewport / DEAD_ZONE_DIVISOR,
            follow_speed: DEFAULT_FOLLOW_SPEED,
            look_ahead_target: Vec2::ZERO,
        }
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.dead_zone = self.viewport / DEAD_ZONE_DIVISOR;
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn dead_zone(&self) -> Vec2 {
        self.dead_zone
    }

    pub fn look_ahead_target(&self) -> Vec2 {
        self.look_ahead_target
    }

    /// Follow a body inside a map of `map_size` world pixels.
    ///
    /// On each axis the camera only moves when the body center leaves the dead
    /// zone, and then by the excess times `follow_speed`.
    pub fn update(&mut self, body: &PhysicsBody, map_size: Vec2) {
        let target = body.center();
        self.look_ahead_target = Vec2::new(
            target.x + body.facing.sign() * self.dead_zone.x,
            target.y,
        );

        let delta = target - self.center();
        self.position.x += follow_step(delta.x, self.dead_zone.x, self.follow_speed);
        self.position.y += follow_step(delta.y, self.dead_zone.y, self.follow_speed);

        self.clamp_to(map_size);
    }

    /// Jump straight to the body (level start, respawn)
    pub fn center_on(&mut self, body: &PhysicsBody, map_size: Vec2) {
        self.position = body.center() - self.viewport / 2.0;
        self.clamp_to(map_size);
    }

    /// Keep the viewport inside `[0, map - viewport]`; pinned at 0 when the map is smaller
    pub fn clamp_to(&mut self, map_size: Vec2) {
        let max = (map_size - self.viewport).max(Vec2::ZERO);
        self.position = self.position.clamp(Vec2::ZERO, max);
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.viewport / 2.0
    }

    /// Visible world rectangle
    pub fn view_rect(&self) -> Rect {
        Rect::from_position_size(self.position, self.viewport)
    }

    pub fn world_to_screen(&self, world_pos: Vec2) -> Vec2 {
        world_pos - self.position
    }

    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        screen_pos + self.position
    }
}

fn follow_step(delta: f32, dead_zone: f32, speed: f32) -> f32 {
    if delta.abs() > dead_zone {
        (delta - dead_zone.copysign(delta)) * speed
    } else {
        0.0
    }
}
