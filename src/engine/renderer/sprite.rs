// Sprite geometry and the per-frame draw list

use super::Camera;
use crate::core::Rect;
use crate::engine::assets::TextureHandle;
use crate::engine::physics::{DebugShape, Facing};
use crate::engine::tilemap::Level;
use glam::Vec2;

/// A textured quad in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub texture: TextureHandle,
    /// Source rectangle in texture pixels (`None` = whole texture)
    pub source: Option<Rect>,
    /// Destination rectangle in screen pixels
    pub dest: Rect,
    /// Mirror horizontally
    pub flip_x: bool,
}

/// Everything to draw this frame, back to front
#[derive(Debug, Default)]
pub struct DrawList {
    sprites: Vec<Sprite>,
    debug: Vec<DebugShape>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
        self.debug.clear();
    }

    pub fn push(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Debug overlay, drawn after every sprite
    pub fn debug_shapes(&self) -> &[DebugShape] {
        &self.debug
    }

    pub fn extend_debug(&mut self, shapes: &[DebugShape]) {
        self.debug.extend_from_slice(shapes);
    }

    pub fn len(&self) -> usize {
        self.sprites.len() + self.debug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty() && self.debug.is_empty()
    }

    /// Parallax backgrounds: each layer tiles a 3x3 block of viewport-sized
    /// copies, offset by the camera position times its scroll speed
    pub fn push_backgrounds(&mut self, level: &Level, camera: &Camera) {
        for bg in level.backgrounds() {
            let size = camera.viewport() * bg.scale;
            if size.x <= 0.0 || size.y <= 0.0 {
                continue;
            }

            let offset = Vec2::new(
                (camera.position.x * bg.scroll_speed).rem_euclid(size.x),
                (camera.position.y * bg.scroll_speed).rem_euclid(size.y),
            );

            for tx in 0..3 {
                for ty in 0..3 {
                    self.sprites.push(Sprite {
                        texture: bg.texture,
                        source: None,
                        dest: Rect::new(
                            tx as f32 * size.x - offset.x,
                            ty as f32 * size.y - offset.y + bg.offset_y,
                            size.x,
                            size.y,
                        ),
                        flip_x: false,
                    });
                }
            }
        }
    }

    /// Tile layers in level order, culled to the viewport
    pub fn push_tile_layers(&mut self, level: &Level, camera: &Camera) {
        let view = camera.view_rect();

        for (layer, tileset) in level.layers_with_tilesets() {
            let tile = tileset.scaled_tile_size();
            if tile <= 0.0 {
                continue;
            }

            let first_col = (view.x / tile).floor().max(0.0) as usize;
            let first_row = (view.y / tile).floor().max(0.0) as usize;
            let end_col = ((view.right() / tile).ceil().max(0.0) as usize).min(layer.columns());
            let end_row = ((view.bottom() / tile).ceil().max(0.0) as usize).min(layer.rows());

            for row in first_row..end_row {
                for col in first_col..end_col {
                    let Some(source) = layer.get(row, col).and_then(|i| tileset.source_rect(i))
                    else {
                        continue;
                    };

                    self.sprites.push(Sprite {
                        texture: tileset.texture,
                        source: Some(source),
                        dest: Rect::new(
                            col as f32 * tile - view.x,
                            row as f32 * tile - view.y,
                            tile,
                            tile,
                        ),
                        flip_x: false,
                    });
                }
            }
        }
    }
}

/// Screen rectangle of an entity sprite anchored on its collision rectangle.
///
/// The scaled frame is centered horizontally on the collision rectangle with
/// its bottom edge on the rectangle's bottom, then shifted by the collision
/// profile offset (scaled, mirrored by facing).
pub fn entity_dest_rect(
    collision: Rect,
    frame_size: Vec2,
    scale: f32,
    profile_offset: Vec2,
    facing: Facing,
    camera: Vec2,
) -> Rect {
    let size = frame_size * scale;
    let offset = profile_offset * scale;

    let mut x = collision.x - camera.x + (collision.w - size.x) / 2.0;
    let y = collision.y - camera.y + (collision.h - size.y) + offset.y;
    x += match facing {
        Facing::Right => -offset.x,
        Facing::Left => offset.x,
    };

    Rect::new(x, y, size.x, size.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::TextureCache;
    use crate::engine::tilemap::test_support::{level_from_ascii, tileset};
    use crate::engine::tilemap::{BackgroundLayer, Layer};

    #[test]
    fn test_entity_dest_centered_on_feet() {
        let collision = Rect::new(100.0, 200.0, 20.0, 40.0);
        let dest = entity_dest_rect(
            collision,
            Vec2::new(32.0, 32.0),
            2.0,
            Vec2::ZERO,
            Facing::Right,
            Vec2::new(50.0, 100.0),
        );

        assert_eq!(dest, Rect::new(100.0 - 50.0 - 22.0, 200.0 - 100.0 - 24.0, 64.0, 64.0));
        assert_eq!(dest.bottom(), collision.bottom() - 100.0);
    }

    #[test]
    fn test_profile_offset_mirrors_with_facing() {
        let collision = Rect::new(0.0, 0.0, 32.0, 32.0);
        let offset = Vec2::new(4.0, 2.0);

        let right = entity_dest_rect(collision, Vec2::splat(16.0), 2.0, offset, Facing::Right, Vec2::ZERO);
        let left = entity_dest_rect(collision, Vec2::splat(16.0), 2.0, offset, Facing::Left, Vec2::ZERO);

        assert_eq!(right.x, -8.0);
        assert_eq!(left.x, 8.0);
        assert_eq!(right.y, 4.0);
        assert_eq!(left.y, 4.0);
    }

    #[test]
    fn test_tiles_culled_to_view() {
        // 8 columns of 32px, only the bottom row filled
        let level = level_from_ascii(&["........", "########"]);
        let mut camera = Camera::new(64.0, 64.0);
        camera.position = Vec2::new(32.0, 0.0);

        let mut list = DrawList::new();
        list.push_tile_layers(&level, &camera);

        assert_eq!(list.sprites().len(), 2);
        assert_eq!(list.sprites()[0].dest, Rect::new(0.0, 32.0, 32.0, 32.0));
        assert_eq!(list.sprites()[0].source, Some(Rect::new(0.0, 0.0, 16.0, 16.0)));
    }

    #[test]
    fn test_partial_tiles_are_drawn() {
        let level = level_from_ascii(&["####", "####"]);
        let mut camera = Camera::new(40.0, 32.0);
        camera.position = Vec2::new(10.0, 0.0);

        let mut list = DrawList::new();
        list.push_tile_layers(&level, &camera);

        // Columns 0 and 1 are both partly visible
        assert_eq!(list.sprites().len(), 2);
        assert_eq!(list.sprites()[0].dest.x, -10.0);
    }

    #[test]
    fn test_backgrounds_tile_three_by_three() {
        let mut cache = TextureCache::new();
        let bg = BackgroundLayer {
            image: "sky.png".to_string(),
            texture: cache.acquire("sky.png"),
            scroll_speed: 0.5,
            scale: 1.0,
            offset_y: 0.0,
        };
        let layer = Layer::new("ground", 1, 1, vec![-1], false, []);
        let level = Level::new(
            "bg",
            1,
            1,
            0,
            vec![tileset("ground", 16, 2.0)],
            vec![layer],
            vec![bg],
        )
        .unwrap();

        let mut camera = Camera::new(100.0, 50.0);
        camera.position = Vec2::new(260.0, 0.0);

        let mut list = DrawList::new();
        list.push_backgrounds(&level, &camera);

        assert_eq!(list.sprites().len(), 9);
        // 260 * 0.5 = 130, wrapped to 30
        assert_eq!(list.sprites()[0].dest, Rect::new(-30.0, 0.0, 100.0, 50.0));
        assert!(list.sprites().iter().all(|s| s.source.is_none()));
    }

    #[test]
    fn test_clear() {
        let mut list = DrawList::new();
        list.extend_debug(&[DebugShape::Line {
            from: Vec2::ZERO,
            to: Vec2::ONE,
            color: [1.0; 4],
        }]);
        assert_eq!(list.len(), 1);
        list.clear();
        assert!(list.is_empty());
    }
}
