// Game layer: characters, enemies, settings and the session tying them to a level

pub mod characters;
pub mod enemies;
pub mod session;
pub mod settings;

pub use session::GameSession;
pub use settings::{GameSettings, SettingsError};
