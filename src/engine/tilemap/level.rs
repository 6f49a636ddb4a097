// Level: tilesets, tile layers, backgrounds and spawn data

use super::{BackgroundLayer, Layer, LevelError, Tileset};
use crate::engine::assets::TextureHandle;
use glam::Vec2;

/// Enemy placement declared by a level manifest
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySpawn {
    /// Character config path
    pub config: String,
    /// Behavior name, resolved when the enemy is built
    pub behavior: String,
    pub column: i32,
}

/// A fully validated level.
///
/// Every layer matches the level grid and references an existing tileset;
/// collision and rendering rely on this without re-checking.
#[derive(Debug, Clone)]
pub struct Level {
    name: String,
    rows: usize,
    columns: usize,
    spawn_column: i32,
    tilesets: Vec<Tileset>,
    layers: Vec<Layer>,
    backgrounds: Vec<BackgroundLayer>,
    enemy_spawns: Vec<EnemySpawn>,
    /// Tileset index of each layer
    layer_tilesets: Vec<usize>,
}

impl Level {
    pub fn new(
        name: impl Into<String>,
        rows: usize,
        columns: usize,
        spawn_column: i32,
        tilesets: Vec<Tileset>,
        layers: Vec<Layer>,
        backgrounds: Vec<BackgroundLayer>,
    ) -> Result<Self, LevelError> {
        let name = name.into();

        if rows == 0 || columns == 0 {
            return Err(LevelError::EmptyGrid { rows, columns });
        }

        let mut layer_tilesets = Vec::with_capacity(layers.len());
        for (index, layer) in layers.iter().enumerate() {
            if layer.rows() != rows
                || layer.columns() != columns
                || layer.tiles().len() != rows * columns
            {
                return Err(LevelError::GridSize {
                    context: format!("layer {} of '{}'", index, name),
                    expected_rows: rows,
                    expected_columns: columns,
                    rows: layer.rows(),
                    columns: layer.columns(),
                });
            }

            let tileset = tilesets
                .iter()
                .position(|ts| ts.id == layer.tileset_id)
                .ok_or_else(|| LevelError::UnknownTileset {
                    layer: index,
                    tileset: layer.tileset_id.clone(),
                })?;
            layer_tilesets.push(tileset);
        }

        let level = Self {
            name,
            rows,
            columns,
            spawn_column,
            tilesets,
            layers,
            backgrounds,
            enemy_spawns: Vec::new(),
            layer_tilesets,
        };

        level.warn_mixed_tile_sizes();
        Ok(level)
    }

    pub fn with_enemy_spawns(mut self, spawns: Vec<EnemySpawn>) -> Self {
        self.enemy_spawns = spawns;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn spawn_column(&self) -> i32 {
        self.spawn_column
    }

    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn backgrounds(&self) -> &[BackgroundLayer] {
        &self.backgrounds
    }

    pub fn enemy_spawns(&self) -> &[EnemySpawn] {
        &self.enemy_spawns
    }

    /// Tileset bound to the layer at `index`
    pub fn layer_tileset(&self, index: usize) -> Option<&Tileset> {
        self.layer_tilesets
            .get(index)
            .and_then(|&ts| self.tilesets.get(ts))
    }

    /// Layers paired with their tilesets, in level order
    pub fn layers_with_tilesets(&self) -> impl Iterator<Item = (&Layer, &Tileset)> {
        self.layers
            .iter()
            .zip(&self.layer_tilesets)
            .map(|(layer, &ts)| (layer, &self.tilesets[ts]))
    }

    /// Collidable layers with their scaled tile size, in level order
    pub fn collidable_layers(&self) -> impl Iterator<Item = (&Layer, f32)> {
        self.layers_with_tilesets()
            .filter(|(layer, _)| layer.collidable)
            .map(|(layer, ts)| (layer, ts.scaled_tile_size()))
    }

    /// Level-wide tile width: the first tileset's scaled size
    pub fn tile_width(&self) -> f32 {
        self.tilesets
            .first()
            .map(Tileset::scaled_tile_size)
            .unwrap_or(0.0)
    }

    fn warn_mixed_tile_sizes(&self) {
        let first = self.tile_width();
        for ts in self.tilesets.iter().skip(1) {
            let width = ts.scaled_tile_size();
            if width != first {
                log::warn!(
                    "Tileset {} has a different scaled width ({} vs {}) in level '{}'",
                    ts.id,
                    width,
                    first,
                    self.name
                );
            }
        }
    }

    /// Level extent in world pixels
    pub fn pixel_size(&self) -> Vec2 {
        let tile = self.tile_width();
        Vec2::new(self.columns as f32 * tile, self.rows as f32 * tile)
    }

    /// Whether any collidable layer has a solid tile at a grid cell
    pub fn is_solid_cell(&self, row: usize, column: usize) -> bool {
        self.layers
            .iter()
            .any(|layer| layer.is_solid_cell(row, column))
    }

    /// Whether the world point lies inside a solid tile; outside the grid is open
    pub fn is_solid_at(&self, point: Vec2) -> bool {
        let tile = self.tile_width();
        if tile <= 0.0 || point.x < 0.0 || point.y < 0.0 {
            return false;
        }

        let column = (point.x / tile) as usize;
        let row = (point.y / tile) as usize;
        self.is_solid_cell(row, column)
    }

    /// Position for a body of `size` standing on the first floor found in `column`.
    ///
    /// Scans top-down (or bottom-up) for an empty cell resting on a solid one and
    /// centers the body on the column with its feet on that tile. Falls back to
    /// the top of the first column.
    pub fn find_spawn(&self, column: i32, size: Vec2, from_top: bool) -> Vec2 {
        let tile = self.tile_width();
        let column = column.clamp(0, self.columns as i32 - 1) as usize;
        let x = column as f32 * tile + (tile - size.x) / 2.0;

        let standing = |row: usize| !self.is_solid_cell(row, column) && self.is_solid_cell(row + 1, column);
        let last = self.rows.saturating_sub(1);

        let found = if from_top {
            (0..last).find(|&row| standing(row))
        } else {
            (0..last).rev().find(|&row| standing(row))
        };

        match found {
            Some(row) => Vec2::new(x, (row + 1) as f32 * tile - size.y),
            None => Vec2::new((tile - size.x) / 2.0, 0.0),
        }
    }

    /// Every texture this level holds, for releasing on unload
    pub fn textures(&self) -> impl Iterator<Item = TextureHandle> + '_ {
        self.tilesets
            .iter()
            .map(|ts| ts.texture)
            .chain(self.backgrounds.iter().map(|bg| bg.texture))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_layer_size_mismatch_rejected() {
        let layer = Layer::new("ground", 2, 3, vec![0; 6], true, []);
        let err = Level::new("lvl", 3, 3, 1, vec![tileset("ground", 16, 2.0)], vec![layer], Vec::new())
            .unwrap_err();
        assert!(matches!(err, LevelError::GridSize { .. }));
    }

    #[test]
    fn test_tile_count_mismatch_rejected() {
        let layer = Layer::new("ground", 3, 3, vec![0; 8], true, []);
        let err = Level::new("lvl", 3, 3, 1, vec![tileset("ground", 16, 2.0)], vec![layer], Vec::new())
            .unwrap_err();
        assert!(matches!(err, LevelError::GridSize { .. }));
    }

    #[test]
    fn test_unknown_tileset_rejected() {
        let layer = Layer::new("cave", 1, 1, vec![0], true, []);
        let err = Level::new("lvl", 1, 1, 1, vec![tileset("ground", 16, 2.0)], vec![layer], Vec::new())
            .unwrap_err();
        assert!(matches!(err, LevelError::UnknownTileset { layer: 0, .. }));
    }

    #[test]
    fn test_empty_grid_rejected() {
        let err = Level::new("lvl", 0, 4, 1, Vec::new(), Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, LevelError::EmptyGrid { .. }));
    }

    #[test]
    fn test_layer_tileset_lookup() {
        let a = Layer::new("b", 1, 1, vec![0], false, []);
        let level = Level::new(
            "lvl",
            1,
            1,
            0,
            vec![tileset("a", 16, 2.0), tileset("b", 8, 1.0)],
            vec![a],
            Vec::new(),
        )
        .unwrap();

        assert_eq!(level.layer_tileset(0).map(|ts| ts.id.as_str()), Some("b"));
        assert_eq!(level.collidable_layers().count(), 0);
    }

    #[test]
    fn test_collidable_layers_use_own_tile_size() {
        let a = Layer::new("a", 1, 1, vec![0], true, []);
        let b = Layer::new("b", 1, 1, vec![0], true, []);
        let level = Level::new(
            "lvl",
            1,
            1,
            0,
            vec![tileset("a", 16, 2.0), tileset("b", 8, 1.0)],
            vec![a, b],
            Vec::new(),
        )
        .unwrap();

        let sizes: Vec<f32> = level.collidable_layers().map(|(_, size)| size).collect();
        assert_eq!(sizes, vec![32.0, 8.0]);
        assert_eq!(level.tile_width(), 32.0);
    }

    #[test]
    fn test_pixel_size() {
        let level = level_from_ascii(&["....", "####"]);
        assert_eq!(level.pixel_size(), Vec2::new(128.0, 64.0));
    }

    #[test]
    fn test_is_solid_at() {
        let level = level_from_ascii(&["....", "..#."]);
        assert!(level.is_solid_at(Vec2::new(70.0, 40.0)));
        assert!(!level.is_solid_at(Vec2::new(10.0, 40.0)));
        assert!(!level.is_solid_at(Vec2::new(-5.0, 40.0)));
        assert!(!level.is_solid_at(Vec2::new(70.0, 400.0)));
    }

    #[test]
    fn test_find_spawn_from_top() {
        let level = level_from_ascii(&[
            "....", //
            ".#..", //
            "....", //
            "####",
        ]);

        let size = Vec2::new(20.0, 48.0);
        let spawn = level.find_spawn(1, size, true);
        // Lands on the floating tile in row 1
        assert_eq!(spawn, Vec2::new(32.0 + 6.0, 32.0 - 48.0));

        let spawn = level.find_spawn(1, size, false);
        // Bottom-up finds the ground first
        assert_eq!(spawn, Vec2::new(38.0, 96.0 - 48.0));
    }

    #[test]
    fn test_find_spawn_clamps_column() {
        let level = level_from_ascii(&["..", "##"]);
        let spawn = level.find_spawn(99, Vec2::new(32.0, 32.0), true);
        assert_eq!(spawn, Vec2::new(32.0, 0.0));
    }

    #[test]
    fn test_find_spawn_fallback() {
        let level = level_from_ascii(&["...", "..."]);
        let spawn = level.find_spawn(2, Vec2::new(16.0, 16.0), true);
        assert_eq!(spawn, Vec2::new(8.0, 0.0));
    }
}
