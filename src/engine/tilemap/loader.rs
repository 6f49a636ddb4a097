// Level manifests, layer CSV files and the level index

use super::{BackgroundLayer, EnemySpawn, Layer, Level, LevelError, Tileset};
use crate::engine::assets::{AssetLoader, TextureCache, TextureHandle};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LevelManifest {
    #[serde(default = "default_level_name")]
    level_name: String,
    #[serde(default = "default_spawn_column")]
    spawn_column: i32,
    level_columns: usize,
    level_rows: usize,
    #[serde(default)]
    tilesets: Vec<TilesetEntry>,
    #[serde(default)]
    layers: Vec<LayerEntry>,
    #[serde(default)]
    backgrounds: Vec<BackgroundEntry>,
    #[serde(default)]
    enemies: Vec<EnemyEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TilesetEntry {
    id: String,
    image: String,
    #[serde(default = "default_tile_size")]
    tile_size: u32,
    #[serde(default = "default_tiles_per_row")]
    tiles_per_row: u32,
    #[serde(default = "default_tileset_scale")]
    scale: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayerEntry {
    csv: String,
    tileset: String,
    #[serde(default)]
    collidable: bool,
    #[serde(default)]
    solid_tiles: Vec<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackgroundEntry {
    image: String,
    #[serde(default = "default_scroll_speed")]
    scroll_speed: f32,
    #[serde(default = "one")]
    scale: f32,
    #[serde(default)]
    offset_y: f32,
}

#[derive(Deserialize)]
struct EnemyEntry {
    config: String,
    #[serde(default = "default_behavior")]
    behavior: String,
    column: i32,
}

fn default_level_name() -> String {
    "UNKNOWN".to_string()
}
fn default_spawn_column() -> i32 {
    1
}
fn default_tile_size() -> u32 {
    16
}
fn default_tiles_per_row() -> u32 {
    8
}
fn default_tileset_scale() -> f32 {
    2.0
}
fn default_scroll_speed() -> f32 {
    0.3
}
fn one() -> f32 {
    1.0
}
fn default_behavior() -> String {
    "idle".to_string()
}

/// Parse a layer CSV into a row-major grid of exactly `rows` x `columns`
pub fn parse_layer_csv(
    path: &str,
    text: &str,
    rows: usize,
    columns: usize,
) -> Result<Vec<i32>, LevelError> {
    let mut tiles = Vec::with_capacity(rows * columns);
    let mut row_count = 0;

    for (line_index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let csv_error = |message: String| LevelError::Csv {
            path: path.to_string(),
            line: line_index + 1,
            message,
        };

        let row: Vec<i32> = line
            .trim_end_matches(',')
            .split(',')
            .map(|cell| {
                cell.trim()
                    .parse::<i32>()
                    .map_err(|e| csv_error(format!("'{}': {}", cell.trim(), e)))
            })
            .collect::<Result<_, _>>()?;

        if row.len() != columns {
            return Err(csv_error(format!(
                "expected {} columns, found {}",
                columns,
                row.len()
            )));
        }

        tiles.extend(row);
        row_count += 1;
    }

    if row_count != rows {
        return Err(LevelError::GridSize {
            context: path.to_string(),
            expected_rows: rows,
            expected_columns: columns,
            rows: row_count,
            columns,
        });
    }

    Ok(tiles)
}

/// Load and validate a level manifest with its layer files.
///
/// Textures are registered in `textures`; on failure every texture acquired
/// so far is released again and nothing else changes.
pub fn load_level(
    loader: &AssetLoader,
    textures: &mut TextureCache,
    path: &str,
) -> Result<Level, LevelError> {
    log::info!("Loading level from {}", path);

    let text = loader.read_to_string(path)?;
    let manifest: LevelManifest = serde_json::from_str(&text).map_err(|source| LevelError::Json {
        path: path.to_string(),
        source,
    })?;

    let rows = manifest.level_rows;
    let columns = manifest.level_columns;

    let mut layers = Vec::with_capacity(manifest.layers.len());
    for entry in &manifest.layers {
        let csv = loader.read_to_string(&entry.csv)?;
        let tiles = parse_layer_csv(&entry.csv, &csv, rows, columns)?;
        let solid = if entry.collidable {
            entry.solid_tiles.clone()
        } else {
            Vec::new()
        };
        layers.push(Layer::new(
            entry.tileset.clone(),
            rows,
            columns,
            tiles,
            entry.collidable,
            solid,
        ));
    }

    let mut acquired: Vec<TextureHandle> = Vec::new();
    let mut acquire = |textures: &mut TextureCache, image: &str| {
        let handle = textures.acquire(image);
        acquired.push(handle);
        handle
    };

    let tilesets = manifest
        .tilesets
        .iter()
        .map(|entry| Tileset {
            id: entry.id.clone(),
            image: entry.image.clone(),
            texture: acquire(textures, &entry.image),
            tile_size: entry.tile_size,
            tiles_per_row: entry.tiles_per_row,
            scale: entry.scale,
        })
        .collect();

    let backgrounds = manifest
        .backgrounds
        .iter()
        .map(|entry| BackgroundLayer {
            image: entry.image.clone(),
            texture: acquire(textures, &entry.image),
            scroll_speed: entry.scroll_speed,
            scale: entry.scale,
            offset_y: entry.offset_y,
        })
        .collect();

    let enemies = manifest
        .enemies
        .into_iter()
        .map(|entry| EnemySpawn {
            config: entry.config,
            behavior: entry.behavior,
            column: entry.column,
        })
        .collect();

    match Level::new(
        manifest.level_name,
        rows,
        columns,
        manifest.spawn_column,
        tilesets,
        layers,
        backgrounds,
    ) {
        Ok(level) => {
            log::info!(
                "Loaded level '{}' ({}x{}, {} layers)",
                level.name(),
                columns,
                rows,
                level.layers().len()
            );
            Ok(level.with_enemy_spawns(enemies))
        }
        Err(err) => {
            for handle in acquired {
                textures.release(handle);
            }
            Err(err)
        }
    }
}

/// One entry of the level index
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelPathEntry {
    pub name: String,
    pub path: String,
}

/// Level index: names mapped to manifest paths
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelPaths {
    pub levels: Vec<LevelPathEntry>,
    #[serde(default)]
    pub default_level: Option<String>,
    #[serde(default)]
    pub last_loaded_level: Option<String>,
}

impl LevelPaths {
    pub fn load(loader: &AssetLoader, path: &str) -> Result<Self, LevelError> {
        let text = loader.read_to_string(path)?;
        let paths: Self = serde_json::from_str(&text).map_err(|source| LevelError::Json {
            path: path.to_string(),
            source,
        })?;
        log::info!("Loaded {} level paths", paths.levels.len());
        Ok(paths)
    }

    /// Manifest path of a named level
    pub fn find(&self, name: &str) -> Result<&str, LevelError> {
        self.levels
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.path.as_str())
            .ok_or_else(|| LevelError::UnknownLevel(name.to_string()))
    }

    /// The declared default level, otherwise the first listed one
    pub fn default_level(&self) -> Option<&str> {
        self.default_level
            .as_deref()
            .or_else(|| self.levels.first().map(|entry| entry.name.as_str()))
    }
}
