// Character system
//
// This module contains everything related to the player character:
// - Animation catalogue and playback cursor
// - Multi-stage attack definitions
// - State machine and movement stats
// - Config file loading

pub mod animation;
pub mod attack;
pub mod config;
pub mod player;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use animation::{
    Animation, AnimationCursor, AnimationEvent, CharacterAnimations, CollisionProfile, SpriteSheet,
    HITBOX_EVENT,
};
pub use attack::{AttackDef, AttackHitbox, AttackStage};
pub use config::{load_character_config, parse_character_config, CharacterConfig, CharacterConfigError};
pub use player::{FiredEvent, Player, Strike, COMBO_WINDOW_FRAMES};
pub use state::{PlayerState, StateInputs};
pub use stats::{MovementStats, BASE_STATS};
