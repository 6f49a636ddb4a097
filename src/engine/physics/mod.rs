// Tile collision physics
//
// Bodies are axis-aligned rectangles moved through the collidable layers of a
// level one axis at a time: X is integrated and resolved, then Y. No rotation,
// slopes or body-vs-body contacts.

pub mod body;
mod collision;
mod debug;

pub use body::{Facing, PhysicsBody};
pub use collision::{has_ceiling_above, integrate, resolve_x, resolve_y};
pub use debug::{DebugRenderer, DebugShape, BODY_COLOR, GRID_COLOR, HITBOX_COLOR, TILE_COLOR};
