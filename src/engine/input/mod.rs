// Input handling system
//
// Keyboard events are mapped through remappable bindings to game actions. The
// player reads a level-triggered `InputSnapshot` once per simulation step;
// session controls (quit, debug overlay, fullscreen) are edge-triggered.
//
// - `action`: game actions and default key bindings
// - `config`: binding configuration and remapping
// - `manager`: held/just-pressed tracking and snapshots

pub mod action;
pub mod config;
pub mod manager;

pub use action::Action;
pub use config::InputConfig;
pub use manager::{InputManager, InputSnapshot};
