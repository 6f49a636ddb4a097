// Tilesets

use crate::core::Rect;
use crate::engine::assets::TextureHandle;

/// A tile sheet: its texture, the source tile size and the render scale
#[derive(Debug, Clone)]
pub struct Tileset {
    pub id: String,
    /// Image path the texture was acquired with
    pub image: String,
    pub texture: TextureHandle,
    /// Tile edge in source pixels
    pub tile_size: u32,
    pub tiles_per_row: u32,
    pub scale: f32,
}

impl Tileset {
    /// Edge of one tile in world pixels (tiles are square)
    pub fn scaled_tile_size(&self) -> f32 {
        (self.tile_size as f32 * self.scale).floor()
    }

    /// Source rectangle of a tile index inside the sheet, `None` for empty cells
    pub fn source_rect(&self, index: i32) -> Option<Rect> {
        if index < 0 {
            return None;
        }

        let per_row = self.tiles_per_row.max(1) as i32;
        let size = self.tile_size as f32;
        Some(Rect::new(
            (index % per_row) as f32 * size,
            (index / per_row) as f32 * size,
            size,
            size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::TextureCache;

    fn tileset(tile_size: u32, scale: f32) -> Tileset {
        let mut cache = TextureCache::new();
        Tileset {
            id: "ground".to_string(),
            image: "ground.png".to_string(),
            texture: cache.acquire("ground.png"),
            tile_size,
            tiles_per_row: 8,
            scale,
        }
    }

    #[test]
    fn test_scaled_tile_size() {
        assert_eq!(tileset(16, 2.0).scaled_tile_size(), 32.0);
        // Truncated like an integer pixel size
        assert_eq!(tileset(16, 1.5).scaled_tile_size(), 24.0);
        assert_eq!(tileset(10, 1.25).scaled_tile_size(), 12.0);
    }

    #[test]
    fn test_source_rect() {
        let ts = tileset(16, 2.0);
        assert_eq!(ts.source_rect(0), Some(Rect::new(0.0, 0.0, 16.0, 16.0)));
        assert_eq!(ts.source_rect(9), Some(Rect::new(16.0, 16.0, 16.0, 16.0)));
        assert_eq!(ts.source_rect(-1), None);
    }
}
