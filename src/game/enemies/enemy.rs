// Enemy entity

use super::behavior::{BehaviorContext, EnemyBehavior, EnemyIntent};
use crate::core::Rect;
use crate::engine::physics::{integrate, Facing, PhysicsBody};
use crate::engine::renderer::Sprite;
use crate::engine::tilemap::Level;
use crate::game::characters::{
    Animation, AnimationCursor, CharacterAnimations, FiredEvent, MovementStats, Strike, HITBOX_EVENT,
};
use glam::Vec2;
use std::sync::Arc;

pub const DEFAULT_ENEMY_HEALTH: i32 = 30;

/// Seconds of hit stun after taking damage
pub const HURT_DURATION: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnemyState {
    #[default]
    Idle,
    Falling,
    Scouting,
    Walking,
    Attacking,
    Hurt,
    Die,
}

impl EnemyState {
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Falling => "fall",
            Self::Scouting => "scout",
            Self::Walking => "walk",
            Self::Attacking => "attack",
            Self::Hurt => "hurt",
            Self::Die => "die",
        }
    }
}

/// A level enemy: body, shared animations and its own behavior instance
#[derive(Debug)]
pub struct Enemy {
    pub body: PhysicsBody,
    animations: Arc<CharacterAnimations>,
    stats: MovementStats,
    behavior: Box<dyn EnemyBehavior>,
    state: EnemyState,
    movement_index: Option<usize>,
    cursor: AnimationCursor,
    health: i32,
    hurt_timer: f32,
    /// Id of the last player strike that landed
    last_strike: Option<u64>,
    fired_events: Vec<FiredEvent>,
}

impl Enemy {
    pub fn new(
        animations: Arc<CharacterAnimations>,
        stats: MovementStats,
        behavior: Box<dyn EnemyBehavior>,
        health: i32,
    ) -> Self {
        let mut enemy = Self {
            body: PhysicsBody::default(),
            animations,
            stats,
            behavior,
            state: EnemyState::Idle,
            movement_index: None,
            cursor: AnimationCursor::new(),
            health,
            hurt_timer: 0.0,
            last_strike: None,
            fired_events: Vec::new(),
        };
        enemy.play_animation(EnemyState::Idle.animation_name());
        if let Some(size) = enemy.frame_collision_size() {
            enemy.body.size = size;
        }
        enemy
    }

    /// Place on the first floor of `column`
    pub fn spawn(&mut self, level: &Level, column: i32) {
        self.body.velocity = Vec2::ZERO;
        self.body.on_ground = false;
        self.body.position = level.find_spawn(column, self.body.size, true);
        log::debug!(
            "Enemy ({}) spawned at ({:.1}, {:.1})",
            self.behavior.name(),
            self.body.position.x,
            self.body.position.y
        );
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Die
    }

    pub fn behavior_name(&self) -> &'static str {
        self.behavior.name()
    }

    pub fn current_animation(&self) -> Option<&Animation> {
        self.animations.movement(self.movement_index?)
    }

    pub fn sprite(&self, camera: Vec2) -> Option<Sprite> {
        let animation = self.current_animation()?;
        self.animations
            .sprite(animation, self.cursor.frame(), &self.body, camera)
    }

    pub fn drain_events(&mut self) -> Vec<FiredEvent> {
        std::mem::take(&mut self.fired_events)
    }

    /// Whether the current animation ignores hits
    pub fn is_invulnerable(&self) -> bool {
        self.current_animation().is_some_and(|a| a.invulnerable)
    }

    /// Apply a player strike; each strike id lands at most once
    pub fn apply_strike(&mut self, strike: &Strike) -> bool {
        if self.is_dead()
            || self.last_strike == Some(strike.id)
            || self.is_invulnerable()
            || !strike.rect.intersects(&self.body.collision_rect())
        {
            return false;
        }

        self.last_strike = Some(strike.id);
        self.take_damage(strike.damage);
        true
    }

    pub fn take_damage(&mut self, damage: i32) {
        if self.is_dead() {
            return;
        }

        self.health -= damage;
        self.behavior.on_hit(damage, self.health);

        if self.health <= 0 {
            self.health = 0;
            self.behavior.on_death();
            self.set_state(EnemyState::Die);
            log::info!("Enemy ({}) defeated", self.behavior.name());
        } else {
            self.hurt_timer = HURT_DURATION;
            self.set_state(EnemyState::Hurt);
            log::debug!("Enemy took {} damage, {} left", damage, self.health);
        }
    }

    pub fn update(&mut self, dt: f32, level: &Level, target: Option<Vec2>) {
        let intent = match self.state {
            EnemyState::Die | EnemyState::Hurt => EnemyIntent::default(),
            _ => {
                let ctx = BehaviorContext { level, target };
                self.behavior.update(&self.body, dt, &ctx)
            }
        };

        self.update_physics(dt, level, intent);

        if self.hurt_timer > 0.0 {
            self.hurt_timer -= dt;
        }

        let next = self.resolve_state(intent);
        self.set_state(next);

        if let Some(animation) = self.movement_index.and_then(|i| self.animations.movement(i)) {
            self.cursor.advance(animation, dt);
        }
        self.queue_events();
        self.update_collision_box();
    }

    fn resolve_state(&self, intent: EnemyIntent) -> EnemyState {
        if self.is_dead() {
            EnemyState::Die
        } else if self.hurt_timer > 0.0 {
            EnemyState::Hurt
        } else if !self.body.on_ground {
            EnemyState::Falling
        } else if intent.attack {
            EnemyState::Attacking
        } else if intent.direction != 0.0 {
            EnemyState::Walking
        } else if intent.scouting {
            EnemyState::Scouting
        } else {
            EnemyState::Idle
        }
    }

    fn update_physics(&mut self, dt: f32, level: &Level, intent: EnemyIntent) {
        if intent.direction < 0.0 {
            self.body.facing = Facing::Left;
        } else if intent.direction > 0.0 {
            self.body.facing = Facing::Right;
        }

        let velocity = &mut self.body.velocity;
        if intent.direction != 0.0 {
            velocity.x += intent.direction.signum() * self.stats.acceleration * dt;
            let cap = self.stats.walk_speed;
            velocity.x = velocity.x.clamp(-cap, cap);
        } else if velocity.x > 0.0 {
            velocity.x = (velocity.x - self.stats.deceleration * dt).max(0.0);
        } else if velocity.x < 0.0 {
            velocity.x = (velocity.x + self.stats.deceleration * dt).min(0.0);
        }

        velocity.y = (velocity.y + self.stats.gravity * dt).min(self.stats.max_fall_speed);

        integrate(&mut self.body, dt, level);
    }

    fn set_state(&mut self, next: EnemyState) {
        if next == self.state {
            return;
        }
        self.state = next;
        // Missing animations keep the current one
        self.play_animation(next.animation_name());
    }

    fn play_animation(&mut self, name: &str) -> bool {
        let Some(index) = self.animations.find_movement(name) else {
            return false;
        };
        if self.movement_index == Some(index) {
            return false;
        }
        self.movement_index = Some(index);
        self.cursor.reset();
        true
    }

    fn queue_events(&mut self) {
        let animations = Arc::clone(&self.animations);
        let Some(animation) = self.movement_index.and_then(|i| animations.movement(i)) else {
            return;
        };

        for event in self.cursor.take_entered_events(animation) {
            if event.name == HITBOX_EVENT {
                continue;
            }
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

    /// Follow the frame size with the feet anchored
    fn update_collision_box(&mut self) {
        let Some(size) = self.frame_collision_size() else {
            return;
        };
        self.body.position.y += self.body.size.y - size.y;
        self.body.size = size;
    }

    pub fn collision_rect(&self) -> Rect {
        self.body.collision_rect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::behavior::{behavior_by_name, Patrol};
    use super::*;
    use crate::game::characters::player::test_support::{anim, catalogue, event, DT};
    use crate::engine::tilemap::test_support::level_from_ascii;

    fn room() -> Level {
        level_from_ascii(&[
            "##########", //
            "#........#", //
            "#........#", //
            "##########",
        ])
    }

    fn enemy_catalogue() -> Arc<CharacterAnimations> {
        let mut animations = (*catalogue(false)).clone();
        animations.movements.push(anim("walk", 2, 20.0, 40.0, true));
        animations.movements.push(anim("hurt", 1, 20.0, 40.0, true));
        animations.movements.push(anim("die", 2, 20.0, 30.0, false));
        Arc::new(animations)
    }

    fn spawned(behavior: &str) -> (Enemy, Level) {
        let level = room();
        let mut enemy = Enemy::new(
            enemy_catalogue(),
            MovementStats::default(),
            behavior_by_name(behavior),
            DEFAULT_ENEMY_HEALTH,
        );
        enemy.spawn(&level, 4);
        enemy.update(DT, &level, None);
        (enemy, level)
    }

    fn strike(id: u64, rect: Rect) -> Strike {
        Strike { id, rect, damage: 10 }
    }

    #[test]
    fn test_spawn_and_settle() {
        let (enemy, _) = spawned("idle");
        assert!(enemy.body.on_ground);
        assert_eq!(enemy.body.bottom(), 96.0);
        assert_eq!(enemy.state(), EnemyState::Idle);
        assert_eq!(enemy.behavior_name(), "idle");
    }

    #[test]
    fn test_strike_lands_once_per_id() {
        let (mut enemy, _) = spawned("idle");
        let rect = enemy.collision_rect();

        assert!(enemy.apply_strike(&strike(1, rect)));
        assert_eq!(enemy.health(), 20);
        assert_eq!(enemy.state(), EnemyState::Hurt);

        assert!(!enemy.apply_strike(&strike(1, rect)));
        assert_eq!(enemy.health(), 20);

        assert!(enemy.apply_strike(&strike(2, rect)));
        assert_eq!(enemy.health(), 10);
    }

    #[test]
    fn test_strike_must_overlap() {
        let (mut enemy, _) = spawned("idle");
        let far = Rect::new(-100.0, -100.0, 10.0, 10.0);
        assert!(!enemy.apply_strike(&strike(1, far)));
        assert_eq!(enemy.health(), DEFAULT_ENEMY_HEALTH);
    }

    #[test]
    fn test_death_is_final() {
        let (mut enemy, level) = spawned("idle");
        enemy.take_damage(100);
        assert!(enemy.is_dead());
        assert_eq!(enemy.health(), 0);

        enemy.update(DT, &level, None);
        assert_eq!(enemy.state(), EnemyState::Die);
        // Die frames are shorter, feet stay on the floor
        assert_eq!(enemy.body.size.y, 30.0);
        assert_eq!(enemy.body.bottom(), 96.0);

        assert!(!enemy.apply_strike(&strike(9, enemy.collision_rect())));
    }

    #[test]
    fn test_death_event_fires_once() {
        let level = room();
        let mut animations = (*enemy_catalogue()).clone();
        let die = animations.find_movement("die").unwrap();
        animations.movements[die].events.push(event(1, "splat"));

        let mut enemy = Enemy::new(
            Arc::new(animations),
            MovementStats::default(),
            behavior_by_name("idle"),
            DEFAULT_ENEMY_HEALTH,
        );
        enemy.spawn(&level, 4);
        enemy.update(DT, &level, None);
        enemy.drain_events();

        enemy.take_damage(100);
        let mut fired = Vec::new();
        for _ in 0..6 {
            enemy.update(DT, &level, None);
            fired.extend(enemy.drain_events());
        }

        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].name, "splat");
        assert_eq!(fired[0].animation, "die");
    }

    #[test]
    fn test_hurt_wears_off() {
        let (mut enemy, level) = spawned("idle");
        enemy.take_damage(5);
        assert_eq!(enemy.state(), EnemyState::Hurt);

        for _ in 0..3 {
            enemy.update(DT, &level, None);
        }
        assert_eq!(enemy.state(), EnemyState::Idle);
    }

    #[test]
    fn test_patrol_walks() {
        let level = room();
        let mut enemy = Enemy::new(
            enemy_catalogue(),
            MovementStats::default(),
            Box::new(Patrol::default()),
            DEFAULT_ENEMY_HEALTH,
        );
        enemy.spawn(&level, 2);
        enemy.update(DT, &level, None);
        let start = enemy.body.position.x;

        enemy.update(DT, &level, None);
        assert_eq!(enemy.state(), EnemyState::Walking);
        assert!(enemy.body.position.x > start);
        assert_eq!(enemy.body.facing, Facing::Right);
    }
}
