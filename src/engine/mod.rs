// Engine modules: assets, input, tilemap, physics, renderer geometry

pub mod assets;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod renderer;
pub mod tilemap;
