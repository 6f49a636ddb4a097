// Tile-based levels
//
// A level is a stack of equally sized tile grids. Each grid layer draws from
// one tileset, which also defines the physical size of its tiles, so layers
// with different tilesets may collide at different granularities.

mod layer;
mod level;
mod loader;
mod tileset;

pub use layer::{BackgroundLayer, Layer};
pub use level::{EnemySpawn, Level};
pub use loader::{load_level, parse_layer_csv, LevelPathEntry, LevelPaths};
pub use tileset::Tileset;

#[cfg(test)]
pub(crate) use level::test_support;

use crate::engine::assets::AssetError;

/// Level loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Level grid must not be empty ({rows}x{columns})")]
    EmptyGrid { rows: usize, columns: usize },

    #[error(
        "Grid size mismatch in {context}: expected {expected_rows}x{expected_columns}, found {rows}x{columns}"
    )]
    GridSize {
        context: String,
        expected_rows: usize,
        expected_columns: usize,
        rows: usize,
        columns: usize,
    },

    #[error("Layer {layer} references unknown tileset '{tileset}'")]
    UnknownTileset { layer: usize, tileset: String },

    #[error("Malformed CSV {path} at line {line}: {message}")]
    Csv {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Unknown level: {0}")]
    UnknownLevel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_error_display() {
        let err = LevelError::UnknownTileset {
            layer: 2,
            tileset: "cave".to_string(),
        };
        assert_eq!(err.to_string(), "Layer 2 references unknown tileset 'cave'");
    }

    #[test]
    fn test_asset_error_passthrough() {
        let err: LevelError = AssetError::NotFound("a.json".to_string()).into();
        assert_eq!(err.to_string(), "Asset not found: a.json");
    }
}
