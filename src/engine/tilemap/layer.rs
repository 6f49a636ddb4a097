// Tile and background layers

use crate::engine::assets::TextureHandle;
use std::collections::HashSet;

/// Dense grid of tile indices bound to one tileset (row-major, -1 = empty)
#[derive(Debug, Clone)]
pub struct Layer {
    pub tileset_id: String,
    rows: usize,
    columns: usize,
    tiles: Vec<i32>,
    pub collidable: bool,
    solid_tiles: HashSet<i32>,
}

impl Layer {
    pub fn new(
        tileset_id: impl Into<String>,
        rows: usize,
        columns: usize,
        tiles: Vec<i32>,
        collidable: bool,
        solid_tiles: impl IntoIterator<Item = i32>,
    ) -> Self {
        Self {
            tileset_id: tileset_id.into(),
            rows,
            columns,
            tiles,
            collidable,
            solid_tiles: solid_tiles.into_iter().collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn tiles(&self) -> &[i32] {
        &self.tiles
    }

    /// Tile index at a cell, `None` outside the grid
    pub fn get(&self, row: usize, column: usize) -> Option<i32> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.tiles.get(row * self.columns + column).copied()
    }

    /// Whether this layer blocks movement on a tile index.
    ///
    /// Without an explicit solid set every non-negative index blocks.
    pub fn is_solid_index(&self, index: i32) -> bool {
        if !self.collidable {
            return false;
        }

        if self.solid_tiles.is_empty() {
            index >= 0
        } else {
            self.solid_tiles.contains(&index)
        }
    }

    pub fn is_solid_cell(&self, row: usize, column: usize) -> bool {
        self.get(row, column)
            .is_some_and(|index| self.is_solid_index(index))
    }
}

/// Parallax backdrop drawn behind the tile layers
#[derive(Debug, Clone)]
pub struct BackgroundLayer {
    pub image: String,
    pub texture: TextureHandle,
    /// Fraction of the camera movement this layer follows
    pub scroll_speed: f32,
    pub scale: f32,
    pub offset_y: f32,
}
