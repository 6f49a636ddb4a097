use crate::core::Rect;
use crate::engine::tilemap::Level;
use glam::Vec2;

pub const GRID_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.15];
pub const TILE_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 0.6];
pub const BODY_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
pub const HITBOX_COLOR: [f32; 4] = [1.0, 0.9, 0.0, 1.0];

/// Camera-relative debug primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugShape {
    Line {
        from: Vec2,
        to: Vec2,
        color: [f32; 4],
    },
    Outline {
        rect: Rect,
        color: [f32; 4],
    },
}

/// Debug overlay for collision data
/// Collects the tile grid, solid tiles, collision rectangles and hitboxes as
/// screen-space shapes for the renderer backend to stroke.
#[derive(Debug, Default)]
pub struct DebugRenderer {
    shapes: Vec<DebugShape>,
    enabled: bool,
}

impl DebugRenderer {
    pub fn new(enabled: bool) -> Self {
        Self {
            shapes: Vec::new(),
            enabled,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.shapes.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Start a new frame of debug geometry
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Grid lines and solid-tile outlines of the visible part of the level
    pub fn prepare_level(&mut self, level: &Level, view: Rect) {
        if !self.enabled {
            return;
        }

        let tile = level.tile_width();
        if tile <= 0.0 {
            return;
        }

        let size = level.pixel_size();
        let first_col = (view.x / tile).floor().max(0.0) as usize;
        let last_col = ((view.right() / tile).ceil() as usize).min(level.columns());
        let first_row = (view.y / tile).floor().max(0.0) as usize;
        let last_row = ((view.bottom() / tile).ceil() as usize).min(level.rows());

        for col in first_col..=last_col {
            let x = col as f32 * tile - view.x;
            self.shapes.push(DebugShape::Line {
                from: Vec2::new(x, -view.y),
                to: Vec2::new(x, size.y - view.y),
                color: GRID_COLOR,
            });
        }
        for row in first_row..=last_row {
            let y = row as f32 * tile - view.y;
            self.shapes.push(DebugShape::Line {
                from: Vec2::new(-view.x, y),
                to: Vec2::new(size.x - view.x, y),
                color: GRID_COLOR,
            });
        }

        for (layer, layer_tile) in level.collidable_layers() {
            for row in 0..layer.rows() {
                for col in 0..layer.columns() {
                    if !layer.is_solid_cell(row, col) {
                        continue;
                    }
                    let rect = Rect::new(
                        col as f32 * layer_tile,
                        row as f32 * layer_tile,
                        layer_tile,
                        layer_tile,
                    );
                    if rect.intersects(&view) {
                        self.shapes.push(DebugShape::Outline {
                            rect: rect.translated(-view.position()),
                            color: TILE_COLOR,
                        });
                    }
                }
            }
        }
    }

    /// Outline a world-space rectangle relative to the camera
    pub fn draw_rect(&mut self, rect: Rect, camera: Vec2, color: [f32; 4]) {
        if self.enabled {
            self.shapes.push(DebugShape::Outline {
                rect: rect.translated(-camera),
                color,
            });
        }
    }

    pub fn shapes(&self) -> &[DebugShape] {
        &self.shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tilemap::test_support::level_from_ascii;

    #[test]
    fn test_disabled_collects_nothing() {
        let level = level_from_ascii(&["..", "##"]);
        let mut debug = DebugRenderer::new(false);
        debug.prepare_level(&level, Rect::new(0.0, 0.0, 64.0, 64.0));
        debug.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Vec2::ZERO, BODY_COLOR);
        assert!(debug.shapes().is_empty());
    }

    #[test]
    fn test_level_overlay() {
        let level = level_from_ascii(&["..", "##"]);
        let mut debug = DebugRenderer::new(true);
        debug.prepare_level(&level, Rect::new(0.0, 0.0, 64.0, 64.0));

        let outlines = debug
            .shapes()
            .iter()
            .filter(|s| matches!(s, DebugShape::Outline { .. }))
            .count();
        let lines = debug.shapes().len() - outlines;

        assert_eq!(outlines, 2);
        // 3 vertical + 3 horizontal grid lines
        assert_eq!(lines, 6);
    }

    #[test]
    fn test_rect_is_camera_relative() {
        let mut debug = DebugRenderer::new(true);
        debug.draw_rect(
            Rect::new(100.0, 50.0, 10.0, 10.0),
            Vec2::new(40.0, 20.0),
            HITBOX_COLOR,
        );
        assert_eq!(
            debug.shapes()[0],
            DebugShape::Outline {
                rect: Rect::new(60.0, 30.0, 10.0, 10.0),
                color: HITBOX_COLOR
            }
        );
    }

    #[test]
    fn test_toggle_clears() {
        let mut debug = DebugRenderer::new(true);
        debug.draw_rect(Rect::default(), Vec2::ZERO, BODY_COLOR);
        assert!(!debug.toggle());
        assert!(debug.shapes().is_empty());
    }
}
