// Multi-stage attack definitions

use super::animation::Animation;
use crate::core::Rect;
use crate::engine::physics::Facing;
use glam::Vec2;

/// Hitbox template of an attack stage, relative to the attacker's collision
/// rectangle and written for a right-facing attacker
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttackHitbox {
    pub w: f32,
    pub h: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl AttackHitbox {
    /// World rectangle anchored on `anchor` (the collision rectangle's top-left).
    ///
    /// Facing left mirrors the box to the other side of the anchor.
    pub fn world_rect(&self, anchor: Vec2, facing: Facing) -> Rect {
        let x = match facing {
            Facing::Right => anchor.x + self.offset_x,
            Facing::Left => anchor.x - self.offset_x - self.w,
        };
        Rect::new(x, anchor.y + self.offset_y, self.w, self.h)
    }
}

/// One hit of a combo
#[derive(Debug, Clone)]
pub struct AttackStage {
    pub name: String,
    pub animation: Animation,
    /// Whether a combo request may chain into the next stage
    pub can_be_comboed: bool,
    pub damage: i32,
    pub hitbox: AttackHitbox,
}

/// A named combo: stage 0 opens, later stages extend it
#[derive(Debug, Clone)]
pub struct AttackDef {
    pub name: String,
    pub stages: Vec<AttackStage>,
    pub base_damage: i32,
}

impl AttackDef {
    pub fn stage(&self, index: usize) -> Option<&AttackStage> {
        self.stages.get(index)
    }

    pub fn has_stage_after(&self, index: usize) -> bool {
        index + 1 < self.stages.len()
    }
}
