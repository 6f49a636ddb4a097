//! Runtime core of a 2D side-scrolling action platformer.
//!
//! - `engine`: tile maps, axis-by-axis tile collision, camera, draw geometry,
//!   input bindings, asset plumbing and the fixed-step clock
//! - `game`: the player's combat/animation state machine, enemies, settings
//!   and the session that runs one frame of the pipeline

pub mod core;
pub mod engine;
pub mod game;
