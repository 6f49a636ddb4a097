// Character config files: sprite sheets, animations, attacks and physics

use super::animation::{
    Animation, AnimationEvent, CharacterAnimations, CollisionProfile, SpriteSheet, HITBOX_EVENT,
};
use super::attack::{AttackDef, AttackHitbox, AttackStage};
use super::stats::MovementStats;
use crate::core::Rect;
use crate::engine::assets::{AssetError, AssetLoader, TextureCache};
use serde::Deserialize;

/// Character config loading errors
#[derive(Debug, thiserror::Error)]
pub enum CharacterConfigError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Sheet '{0}' must have a non-zero frame size")]
    InvalidSheet(String),

    #[error("Animation '{animation}' references unknown sheet '{sheet}'")]
    UnknownSheet { animation: String, sheet: String },

    #[error("Animation '{animation}' has an invalid frame at index {index}")]
    InvalidFrame { animation: String, index: usize },

    #[error("Hitbox event on '{animation}' frame {frame} needs numeric w, h, offsetX and offsetY")]
    InvalidHitbox { animation: String, frame: usize },

    #[error("Missing physics block in {0}")]
    MissingPhysics(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterFile {
    #[serde(default = "one")]
    sprite_scale: f32,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
    #[serde(default)]
    animations: AnimationsEntry,
    physics: Option<PhysicsEntry>,
    health: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetEntry {
    name: String,
    path: String,
    frame_width: u32,
    frame_height: u32,
}

#[derive(Deserialize, Default)]
struct AnimationsEntry {
    #[serde(default)]
    movements: Vec<MovementEntry>,
    #[serde(default)]
    attacks: Vec<AttackEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovementEntry {
    name: String,
    sheet: String,
    #[serde(default = "default_frame_duration")]
    frame_duration: f32,
    #[serde(rename = "loop", default = "yes")]
    looping: bool,
    #[serde(default)]
    frames: Vec<FrameEntry>,
    collision_box: Option<CollisionBoxEntry>,
    #[serde(default)]
    events: Vec<EventEntry>,
    #[serde(default)]
    invulnerable: bool,
    #[serde(default = "yes")]
    can_be_interrupted: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttackEntry {
    name: String,
    #[serde(default)]
    base_damage: i32,
    #[serde(default)]
    stages: Vec<StageEntry>,
}

// Stage flags keep their snake_case spelling from the data files
#[derive(Deserialize)]
struct StageEntry {
    name: String,
    sheet: String,
    #[serde(rename = "frameDuration", default = "default_frame_duration")]
    frame_duration: f32,
    #[serde(rename = "loop", default)]
    looping: bool,
    damage: Option<i32>,
    #[serde(default)]
    can_be_comboed: bool,
    #[serde(default)]
    can_be_interupted: bool,
    #[serde(default)]
    frames: Vec<FrameEntry>,
    #[serde(rename = "collisionBox")]
    collision_box: Option<CollisionBoxEntry>,
    #[serde(default)]
    events: Vec<EventEntry>,
}

/// Frame position in cells of the sheet's frame size
#[derive(Deserialize)]
struct FrameEntry {
    x: i64,
    y: i64,
}

/// Collision box in unscaled frame pixels
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollisionBoxEntry {
    w: f32,
    h: f32,
    #[serde(default)]
    offset_x: f32,
    #[serde(default)]
    offset_y: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventEntry {
    frame_index: usize,
    #[serde(rename = "type")]
    kind: String,
    value: Option<String>,
    w: Option<f32>,
    h: Option<f32>,
    offset_x: Option<f32>,
    offset_y: Option<f32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhysicsEntry {
    run_speed: f32,
    walk_speed: f32,
    jump_force: f32,
    gravity: f32,
    max_fall_speed: f32,
    crouch_height_offset: f32,
    acceleration: f32,
    decceleration: f32,
    crouch_lag: f32,
    crouch_speed: f32,
}

impl From<PhysicsEntry> for MovementStats {
    fn from(p: PhysicsEntry) -> Self {
        Self {
            run_speed: p.run_speed,
            walk_speed: p.walk_speed,
            crouch_speed: p.crouch_speed,
            acceleration: p.acceleration,
            deceleration: p.decceleration,
            crouch_lag: p.crouch_lag,
            jump_force: p.jump_force,
            gravity: p.gravity,
            max_fall_speed: p.max_fall_speed,
            crouch_height_offset: p.crouch_height_offset,
        }
    }
}

fn one() -> f32 {
    1.0
}
fn yes() -> bool {
    true
}
fn default_frame_duration() -> f32 {
    0.1
}

/// A parsed character: its animation catalogue and, if given, its physics
#[derive(Debug, Clone)]
pub struct CharacterConfig {
    pub path: String,
    pub animations: CharacterAnimations,
    pub stats: Option<MovementStats>,
    /// Starting health, used by enemies
    pub health: Option<i32>,
}

impl CharacterConfig {
    /// Physics for the player, which must define them
    pub fn player_stats(&self) -> Result<MovementStats, CharacterConfigError> {
        self.stats
            .ok_or_else(|| CharacterConfigError::MissingPhysics(self.path.clone()))
    }

    /// Physics for enemies, falling back to the base set
    pub fn stats_or_default(&self) -> MovementStats {
        self.stats.unwrap_or_default()
    }
}

/// Raw sheet data needed while building animations
struct SheetInfo<'a> {
    name: &'a str,
    frame_size: (f32, f32),
}

fn find_sheet(sheets: &[SheetInfo], animation: &str, sheet: &str) -> Result<usize, CharacterConfigError> {
    sheets
        .iter()
        .position(|s| s.name == sheet)
        .ok_or_else(|| CharacterConfigError::UnknownSheet {
            animation: animation.to_string(),
            sheet: sheet.to_string(),
        })
}

fn build_frames(
    animation: &str,
    frames: &[FrameEntry],
    (fw, fh): (f32, f32),
) -> Result<Vec<Rect>, CharacterConfigError> {
    frames
        .iter()
        .enumerate()
        .map(|(index, f)| {
            if f.x < 0 || f.y < 0 {
                return Err(CharacterConfigError::InvalidFrame {
                    animation: animation.to_string(),
                    index,
                });
            }
            Ok(Rect::new(f.x as f32 * fw, f.y as f32 * fh, fw, fh))
        })
        .collect()
}

/// Scale factors relative to the frame; offsets stay in frame pixels and are
/// scaled once when drawing
fn build_profile(entry: &CollisionBoxEntry, (fw, fh): (f32, f32)) -> CollisionProfile {
    CollisionProfile {
        width_scale: entry.w / fw,
        height_scale: entry.h / fh,
        offset_x: entry.offset_x,
        offset_y: entry.offset_y,
    }
}

fn build_events(events: &[EventEntry]) -> Vec<AnimationEvent> {
    events
        .iter()
        .map(|e| AnimationEvent {
            frame_index: e.frame_index,
            name: e.kind.clone(),
            value: e.value.clone(),
        })
        .collect()
}

fn build_hitbox(
    stage: &StageEntry,
    sprite_scale: f32,
) -> Result<AttackHitbox, CharacterConfigError> {
    let mut hitbox = AttackHitbox::default();
    for event in stage.events.iter().filter(|e| e.kind == HITBOX_EVENT) {
        let (Some(w), Some(h), Some(offset_x), Some(offset_y)) =
            (event.w, event.h, event.offset_x, event.offset_y)
        else {
            return Err(CharacterConfigError::InvalidHitbox {
                animation: stage.name.clone(),
                frame: event.frame_index,
            });
        };
        hitbox = AttackHitbox {
            w: w * sprite_scale,
            h: h * sprite_scale,
            offset_x: offset_x * sprite_scale,
            offset_y: offset_y * sprite_scale,
        };
    }
    Ok(hitbox)
}

/// Parse a character config; textures are only acquired once the whole file is valid
pub fn parse_character_config(
    path: &str,
    text: &str,
    textures: &mut TextureCache,
) -> Result<CharacterConfig, CharacterConfigError> {
    let file: CharacterFile = serde_json::from_str(text).map_err(|source| CharacterConfigError::Json {
        path: path.to_string(),
        source,
    })?;

    let sheet_info = file
        .sheets
        .iter()
        .map(|s| {
            if s.frame_width == 0 || s.frame_height == 0 {
                return Err(CharacterConfigError::InvalidSheet(s.name.clone()));
            }
            Ok(SheetInfo {
                name: &s.name,
                frame_size: (s.frame_width as f32, s.frame_height as f32),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut movements = Vec::with_capacity(file.animations.movements.len());
    for entry in &file.animations.movements {
        let sheet = find_sheet(&sheet_info, &entry.name, &entry.sheet)?;
        let frame_size = sheet_info[sheet].frame_size;
        movements.push(Animation {
            name: entry.name.clone(),
            sheet,
            frames: build_frames(&entry.name, &entry.frames, frame_size)?,
            frame_duration: entry.frame_duration,
            looping: entry.looping,
            collision_profile: entry.collision_box.as_ref().map(|b| build_profile(b, frame_size)),
            events: build_events(&entry.events),
            invulnerable: entry.invulnerable,
            can_be_interrupted: entry.can_be_interrupted,
        });
    }

    let mut attacks = Vec::with_capacity(file.animations.attacks.len());
    for entry in &file.animations.attacks {
        let mut stages = Vec::with_capacity(entry.stages.len());
        for stage in &entry.stages {
            let sheet = find_sheet(&sheet_info, &stage.name, &stage.sheet)?;
            let frame_size = sheet_info[sheet].frame_size;
            stages.push(AttackStage {
                name: stage.name.clone(),
                animation: Animation {
                    name: stage.name.clone(),
                    sheet,
                    frames: build_frames(&stage.name, &stage.frames, frame_size)?,
                    frame_duration: stage.frame_duration,
                    looping: stage.looping,
                    collision_profile: stage.collision_box.as_ref().map(|b| build_profile(b, frame_size)),
                    events: build_events(&stage.events),
                    invulnerable: false,
                    can_be_interrupted: stage.can_be_interupted,
                },
                can_be_comboed: stage.can_be_comboed,
                damage: stage.damage.unwrap_or(entry.base_damage),
                hitbox: build_hitbox(stage, file.sprite_scale)?,
            });
        }
        attacks.push(AttackDef {
            name: entry.name.clone(),
            stages,
            base_damage: entry.base_damage,
        });
    }

    let sheets = file
        .sheets
        .iter()
        .map(|s| SpriteSheet {
            name: s.name.clone(),
            path: s.path.clone(),
            texture: textures.acquire(&s.path),
            frame_width: s.frame_width,
            frame_height: s.frame_height,
        })
        .collect();

    log::info!(
        "Loaded character {} ({} movements, {} attacks)",
        path,
        movements.len(),
        attacks.len()
    );

    Ok(CharacterConfig {
        path: path.to_string(),
        animations: CharacterAnimations {
            sheets,
            sprite_scale: file.sprite_scale,
            movements,
            attacks,
        },
        stats: file.physics.map(MovementStats::from),
        health: file.health,
    })
}

/// Read and parse a character config through the asset loader
pub fn load_character_config(
    loader: &AssetLoader,
    textures: &mut TextureCache,
    path: &str,
) -> Result<CharacterConfig, CharacterConfigError> {
    let text = loader.read_to_string(path)?;
    parse_character_config(path, &text, textures)
}
