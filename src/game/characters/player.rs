// Player entity: movement physics, combat state machine and animation playback

use super::animation::{Animation, AnimationCursor, CharacterAnimations, HITBOX_EVENT};
use super::attack::{AttackDef, AttackStage};
use super::state::{PlayerState, StateInputs};
use super::stats::MovementStats;
use crate::core::Rect;
use crate::engine::input::InputSnapshot;
use crate::engine::physics::{has_ceiling_above, integrate, Facing, PhysicsBody};
use crate::engine::renderer::Sprite;
use crate::engine::tilemap::Level;
use glam::Vec2;
use std::sync::Arc;

/// Trailing frames of an attack stage in which a combo request is accepted
pub const COMBO_WINDOW_FRAMES: usize = 2;

/// Extra gravity while in the falling state
const FALL_MULTIPLIER: f32 = 1.15;

/// Horizontal damping divisor applied each frame of an air attack
const AIR_ATTACK_DAMPING: f32 = 1.3;

/// An animation event that fired this frame, for audio/effects consumers
#[derive(Debug, Clone, PartialEq)]
pub struct FiredEvent {
    pub animation: String,
    pub frame: usize,
    pub name: String,
    pub value: Option<String>,
}

/// An armed attack hitbox
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    /// Increases on every activation; a target is hit at most once per id
    pub id: u64,
    pub rect: Rect,
    pub damage: i32,
}

/// The player character.
///
/// Owns its body and playback state; the animation catalogue is shared and
/// never mutated.
#[derive(Debug)]
pub struct Player {
    pub body: PhysicsBody,
    animations: Arc<CharacterAnimations>,
    stats: MovementStats,
    state: PlayerState,

    // Playback
    movement_index: Option<usize>,
    attack_index: Option<usize>,
    attack_stage: usize,
    cursor: AnimationCursor,
    /// Stage length at stage start, counted down; informational only
    attack_timer: f32,
    combo_requested: bool,
    can_be_interrupted: bool,

    // Hitbox
    hitbox: Rect,
    hitbox_active: bool,
    hitbox_frame: Option<usize>,
    strike_id: u64,

    // Intents
    moving_left: bool,
    moving_right: bool,
    crouching: bool,
    dashing: bool,
    jump_requested: bool,
    attacking: bool,

    fired_events: Vec<FiredEvent>,
}

fn stage_of(
    animations: &CharacterAnimations,
    attack: Option<usize>,
    stage: usize,
) -> Option<(&AttackDef, &AttackStage)> {
    let def = animations.attack(attack?)?;
    Some((def, def.stage(stage)?))
}

impl Player {
    pub fn new(animations: Arc<CharacterAnimations>, stats: MovementStats) -> Self {
        let mut player = Self {
            body: PhysicsBody::default(),
            animations,
            stats,
            state: PlayerState::Idle,
            movement_index: None,
            attack_index: None,
            attack_stage: 0,
            cursor: AnimationCursor::new(),
            attack_timer: 0.0,
            combo_requested: false,
            can_be_interrupted: true,
            hitbox: Rect::default(),
            hitbox_active: false,
            hitbox_frame: None,
            strike_id: 0,
            moving_left: false,
            moving_right: false,
            crouching: false,
            dashing: false,
            jump_requested: false,
            attacking: false,
            fired_events: Vec::new(),
        };
        player.play_animation(PlayerState::Idle.animation_name());
        if let Some(size) = player.frame_collision_size() {
            player.body.size = size;
        }
        player
    }

    /// Reset to idle and place the body on the level's spawn column
    pub fn spawn(&mut self, level: &Level) {
        self.reset_attack();
        self.attacking = false;
        self.moving_left = false;
        self.moving_right = false;
        self.crouching = false;
        self.dashing = false;
        self.jump_requested = false;
        self.fired_events.clear();

        self.state = PlayerState::Idle;
        self.movement_index = None;
        self.play_animation(PlayerState::Idle.animation_name());
        if let Some(size) = self.frame_collision_size() {
            self.body.size = size;
        }

        self.body.velocity = Vec2::ZERO;
        self.body.on_ground = false;
        self.body.position = level.find_spawn(level.spawn_column(), self.body.size, true);

        log::info!(
            "Player spawned in '{}' at ({:.1}, {:.1})",
            level.name(),
            self.body.position.x,
            self.body.position.y
        );
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn stats(&self) -> &MovementStats {
        &self.stats
    }

    pub fn animations(&self) -> &Arc<CharacterAnimations> {
        &self.animations
    }

    pub fn current_frame(&self) -> usize {
        self.cursor.frame()
    }

    pub fn attack_index(&self) -> Option<usize> {
        self.attack_index
    }

    pub fn attack_stage(&self) -> usize {
        self.attack_stage
    }

    pub fn attack_timer(&self) -> f32 {
        self.attack_timer
    }

    pub fn combo_requested(&self) -> bool {
        self.combo_requested
    }

    pub fn can_be_interrupted(&self) -> bool {
        self.can_be_interrupted
    }

    pub fn is_crouching(&self) -> bool {
        self.crouching
    }

    pub fn is_dashing(&self) -> bool {
        self.dashing
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }

    /// World rectangle of the hitbox while it is active
    pub fn active_hitbox(&self) -> Option<Rect> {
        self.hitbox_active.then_some(self.hitbox)
    }

    /// The active hitbox with its activation id and stage damage
    pub fn strike(&self) -> Option<Strike> {
        if !self.hitbox_active {
            return None;
        }
        let (_, stage) = stage_of(&self.animations, self.attack_index, self.attack_stage)?;
        Some(Strike {
            id: self.strike_id,
            rect: self.hitbox,
            damage: stage.damage,
        })
    }

    /// Events fired since the last call
    pub fn drain_events(&mut self) -> Vec<FiredEvent> {
        std::mem::take(&mut self.fired_events)
    }

    /// Animation driving playback: the attack stage while attacking, else the movement
    pub fn current_animation(&self) -> Option<&Animation> {
        if self.state.is_attacking() {
            if let Some((_, stage)) = stage_of(&self.animations, self.attack_index, self.attack_stage) {
                return Some(&stage.animation);
            }
        }
        self.animations.movement(self.movement_index?)
    }

    /// Sprite for the current frame, camera-relative
    pub fn sprite(&self, camera: Vec2) -> Option<Sprite> {
        let animation = self.current_animation()?;
        self.animations
            .sprite(animation, self.cursor.frame(), &self.body, camera)
    }

    /// Read the held keys into intent flags.
    ///
    /// During an uninterruptible attack only the combo request is considered.
    pub fn handle_input(&mut self, input: &InputSnapshot) {
        if self.state.is_attacking() && !self.can_be_interrupted {
            let animations = Arc::clone(&self.animations);
            if let Some((_, stage)) = stage_of(&animations, self.attack_index, self.attack_stage) {
                let frames_left = self.cursor.frames_left(&stage.animation);
                if frames_left <= COMBO_WINDOW_FRAMES && stage.can_be_comboed && input.attack {
                    if !self.combo_requested {
                        log::debug!("Combo requested on stage '{}'", stage.name);
                    }
                    self.combo_requested = true;
                }
            }
            return;
        }

        self.moving_left = input.move_left;
        self.moving_right = input.move_right;
        self.crouching = input.crouch;
        self.dashing = input.dash;

        // Level-triggered; cleared while airborne so holding jump cannot re-jump mid-air
        self.jump_requested = input.jump && self.body.on_ground;

        if input.attack {
            self.attacking = true;
            let next = if self.body.on_ground {
                PlayerState::GroundAttacking
            } else {
                PlayerState::AirAttacking
            };
            self.set_state(next);
        }
    }

    /// One simulation step: physics, state resolution, animation, collision box, hitbox
    pub fn update(&mut self, dt: f32, level: &Level) {
        if self.state == PlayerState::GroundAttacking {
            self.body.velocity.x = 0.0;
        }

        self.update_physics(dt, level);

        let next = PlayerState::resolve(StateInputs {
            on_ground: self.body.on_ground,
            velocity_y: self.body.velocity.y,
            moving: self.moving_left || self.moving_right,
            crouching: self.crouching,
            attacking: self.attacking,
        });
        if next == PlayerState::GroundAttacking {
            self.moving_left = false;
            self.moving_right = false;
            self.body.velocity.x = 0.0;
        }
        self.set_state(next);

        self.update_animation(dt);
        self.update_collision_box(level);
        self.update_attack_hitbox();
    }

    fn update_physics(&mut self, dt: f32, level: &Level) {
        if self.moving_left {
            self.body.facing = Facing::Left;
        }
        if self.moving_right {
            self.body.facing = Facing::Right;
        }

        let accel = self.stats.accel(self.crouching);
        let decel = self.stats.deceleration;
        let velocity = &mut self.body.velocity;

        if self.moving_right {
            velocity.x += accel * dt;
        } else if self.moving_left {
            velocity.x -= accel * dt;
        } else if velocity.x > 0.0 {
            velocity.x = (velocity.x - decel * dt).max(0.0);
        } else if velocity.x < 0.0 {
            velocity.x = (velocity.x + decel * dt).min(0.0);
        }

        let cap = self.stats.speed_cap(self.crouching);
        velocity.x = velocity.x.clamp(-cap, cap);

        if !self.body.on_ground && self.state == PlayerState::AirAttacking {
            self.body.velocity.x /= AIR_ATTACK_DAMPING;
        }

        if self.jump_requested && self.body.on_ground {
            self.body.velocity.y = self.stats.jump_velocity();
            self.body.on_ground = false;
            self.jump_requested = false;
        }

        let gravity = if self.state == PlayerState::Falling {
            self.stats.gravity * FALL_MULTIPLIER
        } else {
            self.stats.gravity
        };
        self.body.velocity.y = (self.body.velocity.y + gravity * dt).min(self.stats.max_fall_speed);

        integrate(&mut self.body, dt, level);
    }

    /// Switch state, running exit and entry effects.
    ///
    /// Rejected without side effects while the current animation cannot be
    /// interrupted.
    pub fn set_state(&mut self, next: PlayerState) {
        if next == self.state || !self.can_be_interrupted {
            return;
        }

        if self.state.is_attacking() && !next.is_attacking() {
            self.reset_attack();
            self.attacking = false;
        }

        log::debug!("Player state {:?} -> {:?}", self.state, next);
        self.state = next;

        match next.attack_name() {
            Some(name) => match self.animations.find_attack(name) {
                Some(index) => self.start_attack_stage(index, 0),
                None => {
                    let fallback = next.attack_fallback();
                    log::warn!("Attack '{}' not defined, falling back to {:?}", name, fallback);
                    self.state = fallback;
                    self.attacking = false;
                    self.play_animation(fallback.animation_name());
                }
            },
            None => {
                self.play_animation(next.animation_name());
            }
        }
    }

    /// Play a movement animation from frame 0.
    ///
    /// Returns false when it does not exist or is already playing.
    pub fn play_animation(&mut self, name: &str) -> bool {
        let Some(index) = self.animations.find_movement(name) else {
            return false;
        };
        if self.movement_index == Some(index) {
            return false;
        }

        self.movement_index = Some(index);
        self.cursor.reset();
        self.can_be_interrupted = self
            .animations
            .movement(index)
            .map_or(true, |a| a.can_be_interrupted);
        true
    }

    fn start_attack_stage(&mut self, attack_index: usize, stage_index: usize) {
        let animations = Arc::clone(&self.animations);
        let Some((attack, stage)) = stage_of(&animations, Some(attack_index), stage_index) else {
            return;
        };

        self.attack_index = Some(attack_index);
        self.attack_stage = stage_index;
        self.movement_index = None;
        self.cursor.reset();
        self.attack_timer = stage.animation.total_duration();

        self.hitbox = Rect::new(0.0, 0.0, stage.hitbox.w, stage.hitbox.h);
        self.hitbox_active = false;
        self.hitbox_frame = None;

        self.can_be_interrupted = stage.animation.can_be_interrupted;

        log::debug!(
            "Attack '{}' stage {} ('{}', {} frames)",
            attack.name,
            stage_index,
            stage.name,
            stage.animation.frame_count()
        );
    }

    fn reset_attack(&mut self) {
        self.attack_index = None;
        self.attack_stage = 0;
        self.attack_timer = 0.0;
        self.combo_requested = false;
        self.hitbox_active = false;
        self.hitbox_frame = None;
        self.can_be_interrupted = true;
    }

    fn update_animation(&mut self, dt: f32) {
        let animations = Arc::clone(&self.animations);

        if self.state.is_attacking() {
            if let Some((attack, stage)) = stage_of(&animations, self.attack_index, self.attack_stage) {
                self.attack_timer = (self.attack_timer - dt).max(0.0);
                self.cursor.step(&stage.animation, dt);
                self.queue_events(&stage.animation);

                if self.cursor.frame() >= stage.animation.frame_count() {
                    self.finish_stage(attack, stage);
                }
                return;
            }
        }

        if let Some(animation) = self.movement_index.and_then(|i| animations.movement(i)) {
            self.cursor.advance(animation, dt);
            self.queue_events(animation);
        }
    }

    fn finish_stage(&mut self, attack: &AttackDef, stage: &AttackStage) {
        let grounded = self.body.on_ground;

        if self.combo_requested && stage.can_be_comboed && attack.has_stage_after(self.attack_stage) {
            self.combo_requested = false;
            if let Some(index) = self.attack_index {
                log::debug!("Combo '{}' -> stage {}", attack.name, self.attack_stage + 1);
                self.start_attack_stage(index, self.attack_stage + 1);
            }
            return;
        }

        self.reset_attack();
        self.attacking = false;

        let next = if self.state == PlayerState::AirAttacking && !grounded {
            PlayerState::Falling
        } else {
            PlayerState::Idle
        };
        self.set_state(next);
    }

    fn queue_events(&mut self, animation: &Animation) {
        for event in self.cursor.take_entered_events(animation) {
            if event.name == HITBOX_EVENT {
                continue;
            }
            log::debug!("Animation event '{}' on '{}' frame {}", event.name, animation.name, event.frame_index);
            self.fired_events.push(FiredEvent {
                animation: animation.name.clone(),
                frame: event.frame_index,
                name: event.name.clone(),
                value: event.value.clone(),
            });
        }
    }

    fn frame_collision_size(&self) -> Option<Vec2> {
        let animation = self.current_animation()?;
        self.animations.collision_size(animation, self.cursor.frame())
    }

    /// Resize the body to the current frame, keeping the feet in place.
    ///
    /// Growing into a ceiling is refused: the old height stays and the player
    /// is forced to crouch.
    fn update_collision_box(&mut self, level: &Level) {
        let Some(size) = self.frame_collision_size() else {
            return;
        };

        let old_height = self.body.size.y;
        self.body.size.x = size.x;

        let extra = size.y - old_height;
        if extra > 0.0 && has_ceiling_above(&self.body, level, extra) {
            self.crouching = true;
            return;
        }

        self.body.position.y -= extra;
        self.body.size.y = size.y;
    }

    fn update_attack_hitbox(&mut self) {
        if !self.state.is_attacking() {
            self.hitbox_active = false;
            return;
        }

        let animations = Arc::clone(&self.animations);
        let Some((_, stage)) = stage_of(&animations, self.attack_index, self.attack_stage) else {
            return;
        };

        let frame = self.cursor.frame();
        if stage
            .animation
            .events_at(frame)
            .any(|e| e.name == HITBOX_EVENT)
        {
            self.hitbox = stage.hitbox.world_rect(self.body.position, self.body.facing);
            self.hitbox_active = true;

            if self.hitbox_frame != Some(frame) {
                self.hitbox_frame = Some(frame);
                self.strike_id += 1;
                log::debug!("Hitbox armed on '{}' frame {}", stage.name, frame);
            }
        }

        if frame >= stage.animation.frame_count() {
            self.hitbox_active = false;
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::super::animation::{AnimationEvent, SpriteSheet};
    use super::super::attack::AttackHitbox;
    use super::*;
    use crate::engine::assets::TextureCache;

    pub const DT: f32 = 0.125;

    pub fn anim(name: &str, count: usize, w: f32, h: f32, interruptible: bool) -> Animation {
        Animation {
            name: name.to_string(),
            sheet: 0,
            frames: (0..count)
                .map(|i| Rect::new(i as f32 * w, 0.0, w, h))
                .collect(),
            frame_duration: DT,
            looping: interruptible,
            collision_profile: None,
            events: Vec::new(),
            invulnerable: false,
            can_be_interrupted: interruptible,
        }
    }

    pub fn event(frame_index: usize, name: &str) -> AnimationEvent {
        AnimationEvent {
            frame_index,
            name: name.to_string(),
            value: None,
        }
    }

    /// Three-frame uninterruptible stage, hitbox 30x20 at (+20, +10)
    pub fn stage(name: &str, comboable: bool, hitbox_frame: Option<usize>) -> AttackStage {
        let mut animation = anim(name, 3, 20.0, 40.0, false);
        if let Some(frame) = hitbox_frame {
            animation.events.push(event(frame, HITBOX_EVENT));
        }
        AttackStage {
            name: name.to_string(),
            animation,
            can_be_comboed: comboable,
            damage: 10,
            hitbox: AttackHitbox {
                w: 30.0,
                h: 20.0,
                offset_x: 20.0,
                offset_y: 10.0,
            },
        }
    }

    /// 20x40 standing frames, 20x24 crouched, sprite scale 1
    pub fn catalogue(with_attacks: bool) -> Arc<CharacterAnimations> {
        let mut cache = TextureCache::new();

        let mut run = anim("run", 4, 20.0, 40.0, true);
        run.events.push(AnimationEvent {
            frame_index: 1,
            name: "footstep".to_string(),
            value: Some("stone".to_string()),
        });

        let attacks = if with_attacks {
            vec![
                AttackDef {
                    name: "ground_slash".to_string(),
                    stages: vec![stage("slash1", true, Some(1)), stage("slash2", false, Some(0))],
                    base_damage: 10,
                },
                AttackDef {
                    name: "air_slash".to_string(),
                    stages: vec![stage("air1", false, Some(1))],
                    base_damage: 10,
                },
            ]
        } else {
            Vec::new()
        };

        Arc::new(CharacterAnimations {
            sheets: vec![SpriteSheet {
                name: "hero".to_string(),
                path: "hero.png".to_string(),
                texture: cache.acquire("hero.png"),
                frame_width: 20,
                frame_height: 40,
            }],
            sprite_scale: 1.0,
            movements: vec![
                anim("idle", 1, 20.0, 40.0, true),
                run,
                anim("jump", 1, 20.0, 40.0, true),
                anim("fall", 1, 20.0, 40.0, true),
                anim("crouch", 1, 20.0, 24.0, true),
                anim("crouch-walk", 2, 20.0, 24.0, true),
            ],
            attacks,
        })
    }
}
