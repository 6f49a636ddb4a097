// Physics bodies

use crate::core::Rect;
use glam::Vec2;

/// Horizontal facing, used for mirroring sprites and hitboxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// +1 for right, -1 for left
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn is_left(self) -> bool {
        self == Facing::Left
    }
}

/// Axis-aligned body moved by the tile collision resolver.
///
/// `position` is the top-left corner of the collision rectangle; `size` follows
/// the current animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicsBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub on_ground: bool,
}

impl PhysicsBody {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            ..Default::default()
        }
    }

    /// Collision rectangle in world space
    pub fn collision_rect(&self) -> Rect {
        Rect::from_position_size(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }

    /// Bottom edge (feet) in world space
    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }
}
