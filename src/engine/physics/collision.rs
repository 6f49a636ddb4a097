// Body vs tile-grid collision resolution

use super::PhysicsBody;
use crate::core::Rect;
use crate::engine::tilemap::{Layer, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Inclusive range of tile indices covering `[min, max)`, clamped to `count`
fn tile_span(min: f32, max: f32, tile: f32, count: usize) -> Option<(usize, usize)> {
    if tile <= 0.0 || count == 0 {
        return None;
    }

    let first = (min / tile).floor().max(0.0);
    let last = ((max / tile).ceil() - 1.0).min(count as f32 - 1.0);
    if last < first {
        return None;
    }

    Some((first as usize, last as usize))
}

/// World rectangles of the solid tiles of `layer` under `area`
fn solid_tiles_under(layer: &Layer, tile: f32, area: Rect) -> Vec<Rect> {
    let (Some((col_start, col_end)), Some((row_start, row_end))) = (
        tile_span(area.x, area.right(), tile, layer.columns()),
        tile_span(area.y, area.bottom(), tile, layer.rows()),
    ) else {
        return Vec::new();
    };

    let mut tiles = Vec::new();
    for row in row_start..=row_end {
        for col in col_start..=col_end {
            if layer.is_solid_cell(row, col) {
                tiles.push(Rect::new(col as f32 * tile, row as f32 * tile, tile, tile));
            }
        }
    }
    tiles
}

fn resolve(body: &mut PhysicsBody, level: &Level, axis: Axis) {
    for (layer, tile) in level.collidable_layers() {
        // The covered range is taken once per layer; each tile is tested
        // against the rectangle as moved by earlier tiles.
        for tile_rect in solid_tiles_under(layer, tile, body.collision_rect()) {
            if !body.collision_rect().intersects(&tile_rect) {
                continue;
            }

            match axis {
                Axis::X => {
                    if body.velocity.x > 0.0 {
                        body.position.x = tile_rect.x - body.size.x;
                    } else if body.velocity.x < 0.0 {
                        body.position.x = tile_rect.right();
                    }
                    body.velocity.x = 0.0;
                }
                Axis::Y => {
                    if body.velocity.y > 0.0 {
                        body.position.y = tile_rect.y - body.size.y;
                        body.velocity.y = 0.0;
                        body.on_ground = true;
                    } else if body.velocity.y < 0.0 {
                        body.position.y = tile_rect.bottom();
                        body.velocity.y = 0.0;
                    }
                }
            }
        }
    }
}

/// Push the body out of solid tiles horizontally after an X move.
///
/// Snaps against the tile's near edge in the direction of travel and stops
/// horizontal motion.
pub fn resolve_x(body: &mut PhysicsBody, level: &Level) {
    resolve(body, level, Axis::X);
}

/// Push the body out of solid tiles vertically after a Y move.
///
/// A downward contact lands the body (`on_ground`); an upward one bumps its head.
pub fn resolve_y(body: &mut PhysicsBody, level: &Level) {
    resolve(body, level, Axis::Y);
}

/// Whether growing the body upward by `extra` pixels would hit a solid tile.
///
/// Uses the body's current size, so query before applying a new height.
pub fn has_ceiling_above(body: &PhysicsBody, level: &Level, extra: f32) -> bool {
    if extra <= 0.0 {
        return false;
    }

    let grown = Rect::new(
        body.position.x,
        body.position.y - extra,
        body.size.x,
        body.size.y + extra,
    );

    level.collidable_layers().any(|(layer, tile)| {
        solid_tiles_under(layer, tile, grown)
            .iter()
            .any(|tile_rect| grown.intersects(tile_rect))
    })
}

/// Advance the body by its velocity: X move and resolve, then Y move and resolve.
///
/// `on_ground` is cleared before the vertical pass and only a downward contact
/// sets it again.
pub fn integrate(body: &mut PhysicsBody, dt: f32, level: &Level) {
    body.position.x += body.velocity.x * dt;
    resolve_x(body, level);

    body.on_ground = false;
    body.position.y += body.velocity.y * dt;
    resolve_y(body, level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tilemap::test_support::level_from_ascii;
    use glam::Vec2;

    // 32px tiles
    fn room() -> Level {
        level_from_ascii(&[
            "######", //
            "#....#", //
            "#....#", //
            "#....#", //
            "######",
        ])
    }

    fn overlaps_solid(body: &PhysicsBody, level: &Level) -> bool {
        level.collidable_layers().any(|(layer, tile)| {
            solid_tiles_under(layer, tile, body.collision_rect())
                .iter()
                .any(|t| body.collision_rect().intersects(t))
        })
    }

    #[test]
    fn test_tile_span() {
        assert_eq!(tile_span(0.0, 32.0, 32.0, 10), Some((0, 0)));
        assert_eq!(tile_span(10.0, 40.0, 32.0, 10), Some((0, 1)));
        assert_eq!(tile_span(-50.0, 10.0, 32.0, 10), Some((0, 0)));
        assert_eq!(tile_span(300.0, 400.0, 32.0, 10), Some((9, 9)));
        assert_eq!(tile_span(400.0, 500.0, 32.0, 10), None);
        assert_eq!(tile_span(-100.0, -50.0, 32.0, 10), None);
    }

    #[test]
    fn test_resolve_x_moving_right() {
        let level = room();
        let mut body = PhysicsBody::new(Vec2::new(150.0, 40.0), Vec2::new(20.0, 20.0));
        body.velocity.x = 100.0;

        resolve_x(&mut body, &level);

        assert_eq!(body.position.x, 160.0 - 20.0);
        assert_eq!(body.velocity.x, 0.0);
        assert!(!overlaps_solid(&body, &level));
    }

    #[test]
    fn test_resolve_x_moving_left() {
        let level = room();
        let mut body = PhysicsBody::new(Vec2::new(20.0, 40.0), Vec2::new(20.0, 20.0));
        body.velocity.x = -100.0;

        resolve_x(&mut body, &level);

        assert_eq!(body.position.x, 32.0);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_resolve_x_free_space_untouched() {
        let level = room();
        let mut body = PhysicsBody::new(Vec2::new(64.0, 64.0), Vec2::new(20.0, 20.0));
        body.velocity.x = 50.0;

        resolve_x(&mut body, &level);

        assert_eq!(body.position.x, 64.0);
        assert_eq!(body.velocity.x, 50.0);
    }

    #[test]
    fn test_resolve_y_landing() {
        let level = room();
        let mut body = PhysicsBody::new(Vec2::new(64.0, 120.0), Vec2::new(20.0, 20.0));
        body.velocity.y = 200.0;

        resolve_y(&mut body, &level);

        assert_eq!(body.position.y, 128.0 - 20.0);
        assert_eq!(body.velocity.y, 0.0);
        assert!(body.on_ground);
    }

    #[test]
    fn test_resolve_y_head_bump() {
        let level = room();
        let mut body = PhysicsBody::new(Vec2::new(64.0, 25.0), Vec2::new(20.0, 20.0));
        body.velocity.y = -200.0;

        resolve_y(&mut body, &level);

        assert_eq!(body.position.y, 32.0);
        assert_eq!(body.velocity.y, 0.0);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_touching_floor_is_not_a_collision() {
        let level = room();
        let mut body = PhysicsBody::new(Vec2::new(64.0, 108.0), Vec2::new(20.0, 20.0));
        body.velocity.y = 10.0;

        resolve_y(&mut body, &level);

        assert_eq!(body.velocity.y, 10.0);
        assert!(!body.on_ground);
    }

    #[test]
    fn test_layers_with_different_tile_sizes() {
        use crate::engine::tilemap::test_support::tileset;
        use crate::engine::tilemap::Layer;

        // Same 2x2 grid: a 32px layer with nothing solid, and an 8px layer
        // whose bottom-right cell is solid (world 8..16)
        let coarse = Layer::new("big", 2, 2, vec![-1; 4], true, []);
        let fine = Layer::new("small", 2, 2, vec![-1, -1, -1, 0], true, []);
        let level = Level::new(
            "mixed",
            2,
            2,
            0,
            vec![tileset("big", 16, 2.0), tileset("small", 8, 1.0)],
            vec![coarse, fine],
            Vec::new(),
        )
        .unwrap();

        let mut body = PhysicsBody::new(Vec2::new(9.0, 4.0), Vec2::new(4.0, 6.0));
        body.velocity.y = 30.0;
        resolve_y(&mut body, &level);

        assert_eq!(body.position.y, 8.0 - 6.0);
        assert!(body.on_ground);
    }

    #[test]
    fn test_ceiling_above() {
        let level = room();
        // Crouched body with its head 10px below the ceiling tile
        let body = PhysicsBody::new(Vec2::new(64.0, 42.0), Vec2::new(20.0, 20.0));

        assert!(!has_ceiling_above(&body, &level, 8.0));
        assert!(has_ceiling_above(&body, &level, 12.0));
        assert!(!has_ceiling_above(&body, &level, 0.0));
    }

    #[test]
    fn test_integrate_falls_and_lands() {
        let level = room();
        let mut body = PhysicsBody::new(Vec2::new(64.0, 100.0), Vec2::new(20.0, 20.0));
        body.velocity = Vec2::new(0.0, 600.0);

        integrate(&mut body, 1.0 / 60.0, &level);

        assert!(body.on_ground);
        assert_eq!(body.bottom(), 128.0);
    }

    #[test]
    fn test_integrate_clears_ground_when_leaving_floor() {
        let level = room();
        let mut body = PhysicsBody::new(Vec2::new(64.0, 108.0), Vec2::new(20.0, 20.0));
        body.on_ground = true;
        body.velocity = Vec2::new(0.0, -100.0);

        integrate(&mut body, 1.0 / 60.0, &level);

        assert!(!body.on_ground);
        assert!(body.position.y < 108.0);
    }

    #[test]
    fn test_integrate_slides_along_wall() {
        let level = room();
        let mut body = PhysicsBody::new(Vec2::new(138.0, 60.0), Vec2::new(20.0, 20.0));
        body.velocity = Vec2::new(300.0, 60.0);

        integrate(&mut body, 1.0 / 60.0, &level);

        assert_eq!(body.position.x, 140.0);
        assert_eq!(body.velocity.x, 0.0);
        assert!((body.position.y - 61.0).abs() < 1e-4);
    }
}
