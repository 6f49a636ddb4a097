// Render geometry
//
// The frame is described as a `DrawList` of textured quads and debug shapes in
// screen space. Rasterizing it is left to the window backend.

mod camera;
mod sprite;

pub use camera::{Camera, DEAD_ZONE_DIVISOR, DEFAULT_FOLLOW_SPEED};
pub use sprite::{entity_dest_rect, DrawList, Sprite};
