// Player settings: controls, video, audio and gameplay toggles

use crate::engine::input::{Action, InputConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use winit::keyboard::KeyCode;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Key per gameplay action, stored as winit `KeyCode` names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlSettings {
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub jump: KeyCode,
    pub crouch: KeyCode,
    pub attack: KeyCode,
    pub dash: KeyCode,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            move_left: KeyCode::ArrowLeft,
            move_right: KeyCode::ArrowRight,
            jump: KeyCode::Space,
            crouch: KeyCode::ShiftLeft,
            attack: KeyCode::KeyZ,
            dash: KeyCode::KeyX,
        }
    }
}

impl ControlSettings {
    pub fn bindings(&self) -> Vec<(KeyCode, Action)> {
        vec![
            (self.move_left, Action::MoveLeft),
            (self.move_right, Action::MoveRight),
            (self.jump, Action::Jump),
            (self.crouch, Action::Crouch),
            (self.attack, Action::Attack),
            (self.dash, Action::Dash),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoSettings {
    pub resolution_width: u32,
    pub resolution_height: u32,
    pub fullscreen: bool,
    #[serde(rename = "vSync")]
    pub vsync: bool,
    pub scale: f32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            resolution_width: 1280,
            resolution_height: 720,
            fullscreen: false,
            vsync: true,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioSettings {
    pub master_volume: f32,
    pub music_volume: f32,
    pub sfx_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            music_volume: 0.5,
            sfx_volume: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameplaySettings {
    pub debug_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GameSettings {
    pub controls: ControlSettings,
    #[serde(rename = "videoSettings")]
    pub video: VideoSettings,
    pub audio: AudioSettings,
    #[serde(rename = "gameplaySettings")]
    pub gameplay: GameplaySettings,
}

// Key names are checked one by one so a bad entry only loses itself
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ControlsFile {
    move_left: Option<String>,
    move_right: Option<String>,
    jump: Option<String>,
    crouch: Option<String>,
    attack: Option<String>,
    dash: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    controls: ControlsFile,
    #[serde(rename = "videoSettings")]
    video: VideoSettings,
    audio: AudioSettings,
    #[serde(rename = "gameplaySettings")]
    gameplay: GameplaySettings,
}

/// Parse a winit `KeyCode` variant name such as "ArrowLeft" or "KeyZ"
pub fn parse_key(name: &str) -> Option<KeyCode> {
    serde_json::from_value(serde_json::Value::String(name.to_string())).ok()
}

pub fn key_name(key: KeyCode) -> String {
    format!("{:?}", key)
}

fn resolve_key(field: &str, name: Option<&str>, default: KeyCode) -> KeyCode {
    let Some(name) = name else {
        return default;
    };

    parse_key(name).unwrap_or_else(|| {
        log::warn!(
            "'{}' is not a valid key for '{}', using default '{}'",
            name,
            field,
            key_name(default)
        );
        default
    })
}

impl ControlsFile {
    fn resolve(&self) -> ControlSettings {
        let defaults = ControlSettings::default();
        ControlSettings {
            move_left: resolve_key("moveLeft", self.move_left.as_deref(), defaults.move_left),
            move_right: resolve_key("moveRight", self.move_right.as_deref(), defaults.move_right),
            jump: resolve_key("jump", self.jump.as_deref(), defaults.jump),
            crouch: resolve_key("crouch", self.crouch.as_deref(), defaults.crouch),
            attack: resolve_key("attack", self.attack.as_deref(), defaults.attack),
            dash: resolve_key("dash", self.dash.as_deref(), defaults.dash),
        }
    }
}

impl GameSettings {
    /// Parse settings JSON; missing sections and fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let file: SettingsFile = serde_json::from_str(text)?;
        Ok(Self {
            controls: file.controls.resolve(),
            video: file.video,
            audio: file.audio,
            gameplay: file.gameplay,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let settings = Self::from_json(&text).map_err(|source| SettingsError::Json {
            path: path.display().to_string(),
            source,
        })?;

        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.display().to_string(),
            source,
        })?;

        std::fs::write(path, text).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;

        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Load the settings file, replacing a missing or corrupt one with defaults
    pub fn load_or_init(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{}; writing default settings", err);
                let settings = Self::default();
                if let Err(err) = settings.save(path) {
                    log::warn!("{}", err);
                }
                settings
            }
        }
    }

    /// Key bindings for the input manager (global keys included)
    pub fn to_input_config(&self) -> InputConfig {
        InputConfig::from_bindings(self.controls.bindings())
    }
}
