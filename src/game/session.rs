// Game session: level lifecycle and the per-frame pipeline

use super::characters::{load_character_config, CharacterAnimations, FiredEvent, MovementStats, Player};
use super::enemies::{behavior_by_name, Enemy, DEFAULT_ENEMY_HEALTH};
use super::settings::GameSettings;
use crate::engine::assets::{AssetLoader, TextureCache, TextureHandle};
use crate::engine::input::InputSnapshot;
use crate::engine::physics::{DebugRenderer, BODY_COLOR, HITBOX_COLOR};
use crate::engine::renderer::{Camera, DrawList};
use crate::engine::tilemap::{self, Level, LevelPaths};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// One loaded enemy config, shared by every enemy that uses it
struct EnemyArchetype {
    animations: Arc<CharacterAnimations>,
    stats: MovementStats,
    health: i32,
}

/// Owns everything one running game needs: assets, the current level, the
/// player, its enemies, the camera and the frame's draw list.
#[derive(Debug)]
pub struct GameSession {
    loader: AssetLoader,
    textures: TextureCache,
    settings: GameSettings,
    level_paths: LevelPaths,
    level: Option<Level>,
    player: Player,
    enemies: Vec<Enemy>,
    /// Textures held by the current level's enemy configs
    enemy_textures: Vec<TextureHandle>,
    camera: Camera,
    debug: DebugRenderer,
    draw_list: DrawList,
    events: Vec<FiredEvent>,
}

impl GameSession {
    /// Load the player config and the level index; no level is loaded yet
    pub fn new(
        loader: AssetLoader,
        settings: GameSettings,
        player_config: &str,
        level_paths: &str,
    ) -> Result<Self> {
        let mut textures = TextureCache::new();

        let config = load_character_config(&loader, &mut textures, player_config)
            .with_context(|| format!("Failed to load player config {}", player_config))?;
        let stats = config.player_stats()?;
        log::info!(
            "Loaded player from {} ({} movements, {} attacks)",
            config.path,
            config.animations.movements.len(),
            config.animations.attacks.len()
        );
        let player = Player::new(Arc::new(config.animations), stats);

        let level_paths = LevelPaths::load(&loader, level_paths)
            .with_context(|| format!("Failed to load level index {}", level_paths))?;

        let video = settings.video;
        let scale = if video.scale > 0.0 { video.scale } else { 1.0 };
        let camera = Camera::new(
            video.resolution_width as f32 / scale,
            video.resolution_height as f32 / scale,
        );

        Ok(Self {
            loader,
            textures,
            debug: DebugRenderer::new(settings.gameplay.debug_mode),
            settings,
            level_paths,
            level: None,
            player,
            enemies: Vec::new(),
            enemy_textures: Vec::new(),
            camera,
            draw_list: DrawList::new(),
            events: Vec::new(),
        })
    }

    /// Load `name`, or the index's default level when `None`
    pub fn start(&mut self, name: Option<&str>) -> Result<()> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self
                .level_paths
                .default_level()
                .map(str::to_string)
                .context("Level index lists no levels")?,
        };
        self.load_level(&name)
    }

    /// Switch to a named level.
    ///
    /// On failure the current level, player and enemies stay as they were.
    pub fn load_level(&mut self, name: &str) -> Result<()> {
        let path = self.level_paths.find(name)?.to_string();
        let level = tilemap::load_level(&self.loader, &mut self.textures, &path)
            .with_context(|| format!("Failed to load level '{}'", name))?;
        let (enemies, enemy_textures) = spawn_enemies(&self.loader, &mut self.textures, &level);

        self.unload_level();

        self.player.spawn(&level);
        self.camera.center_on(&self.player.body, level.pixel_size());
        self.enemies = enemies;
        self.enemy_textures = enemy_textures;
        self.level_paths.last_loaded_level = Some(name.to_string());

        log::info!(
            "Level '{}' ready with {} enemies ({} textures cached)",
            level.name(),
            self.enemies.len(),
            self.textures.stats().texture_count
        );
        self.level = Some(level);
        Ok(())
    }

    fn unload_level(&mut self) {
        if let Some(old) = self.level.take() {
            for handle in old.textures() {
                self.textures.release(handle);
            }
            log::info!("Unloaded level '{}'", old.name());
        }

        for handle in self.enemy_textures.drain(..) {
            self.textures.release(handle);
        }
        self.enemies.clear();
    }

    /// Advance one simulation step
    pub fn update(&mut self, dt: f32, input: &InputSnapshot) {
        self.events.clear();
        let Some(level) = self.level.as_ref() else {
            return;
        };

        self.player.handle_input(input);
        self.player.update(dt, level);

        let target = Some(self.player.body.center());
        for enemy in &mut self.enemies {
            enemy.update(dt, level, target);
        }

        if let Some(strike) = self.player.strike() {
            for enemy in &mut self.enemies {
                if enemy.apply_strike(&strike) {
                    log::debug!(
                        "Strike {} hit {} enemy for {} ({} left)",
                        strike.id,
                        enemy.behavior_name(),
                        strike.damage,
                        enemy.health()
                    );
                }
            }
        }

        self.events.extend(self.player.drain_events());
        for enemy in &mut self.enemies {
            self.events.extend(enemy.drain_events());
        }
        for event in &self.events {
            log::debug!(
                "Event '{}' ({}) on {} frame {}",
                event.name,
                event.value.as_deref().unwrap_or("-"),
                event.animation,
                event.frame
            );
        }

        self.camera.update(&self.player.body, level.pixel_size());
    }

    /// Build this frame's draw list: backgrounds, tiles, enemies, player, debug overlay
    pub fn draw_list(&mut self) -> &DrawList {
        self.draw_list.clear();
        self.debug.clear();

        let Some(level) = self.level.as_ref() else {
            return &self.draw_list;
        };
        let camera = self.camera.position;

        self.draw_list.push_backgrounds(level, &self.camera);
        self.draw_list.push_tile_layers(level, &self.camera);

        for enemy in &self.enemies {
            if let Some(sprite) = enemy.sprite(camera) {
                self.draw_list.push(sprite);
            }
        }
        if let Some(sprite) = self.player.sprite(camera) {
            self.draw_list.push(sprite);
        }

        if self.debug.is_enabled() {
            self.debug.prepare_level(level, self.camera.view_rect());
            for enemy in &self.enemies {
                self.debug.draw_rect(enemy.collision_rect(), camera, BODY_COLOR);
            }
            self.debug
                .draw_rect(self.player.body.collision_rect(), camera, BODY_COLOR);
            if let Some(hitbox) = self.player.active_hitbox() {
                self.debug.draw_rect(hitbox, camera, HITBOX_COLOR);
            }
            self.draw_list.extend_debug(self.debug.shapes());
        }

        log::trace!(
            "Draw list: {} sprites, {} debug shapes",
            self.draw_list.sprites().len(),
            self.draw_list.debug_shapes().len()
        );
        &self.draw_list
    }

    pub fn toggle_debug(&mut self) -> bool {
        let enabled = self.debug.toggle();
        self.settings.gameplay.debug_mode = enabled;
        log::info!("Debug overlay {}", if enabled { "enabled" } else { "disabled" });
        enabled
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let scale = if self.settings.video.scale > 0.0 {
            self.settings.video.scale
        } else {
            1.0
        };
        self.camera.resize(width / scale, height / scale);
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GameSettings {
        &mut self.settings
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    pub fn level_paths(&self) -> &LevelPaths {
        &self.level_paths
    }

    /// Animation events fired during the last update
    pub fn events(&self) -> &[FiredEvent] {
        &self.events
    }
}

/// Build the enemies a level declares, loading each config once.
///
/// A broken enemy config only drops the enemies that use it.
fn spawn_enemies(
    loader: &AssetLoader,
    textures: &mut TextureCache,
    level: &Level,
) -> (Vec<Enemy>, Vec<TextureHandle>) {
    let mut archetypes: HashMap<String, Option<EnemyArchetype>> = HashMap::new();
    let mut handles = Vec::new();
    let mut enemies = Vec::new();

    for spawn in level.enemy_spawns() {
        let archetype = archetypes.entry(spawn.config.clone()).or_insert_with(|| {
            match load_character_config(loader, textures, &spawn.config) {
                Ok(config) => {
                    handles.extend(config.animations.textures());
                    Some(EnemyArchetype {
                        stats: config.stats_or_default(),
                        health: config.health.unwrap_or(DEFAULT_ENEMY_HEALTH),
                        animations: Arc::new(config.animations),
                    })
                }
                Err(err) => {
                    log::warn!("Skipping enemies using {}: {}", spawn.config, err);
                    None
                }
            }
        });

        let Some(archetype) = archetype else {
            continue;
        };

        let mut enemy = Enemy::new(
            Arc::clone(&archetype.animations),
            archetype.stats,
            behavior_by_name(&spawn.behavior),
            archetype.health,
        );
        enemy.spawn(level, spawn.column);
        enemies.push(enemy);
    }

    (enemies, handles)
}
