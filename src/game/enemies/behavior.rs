// Enemy behaviors

use crate::engine::physics::PhysicsBody;
use crate::engine::tilemap::Level;
use glam::Vec2;

/// What a behavior sees of the world each frame
#[derive(Debug, Clone, Copy)]
pub struct BehaviorContext<'a> {
    pub level: &'a Level,
    /// Center of the player's body
    pub target: Option<Vec2>,
}

/// Movement wanted by a behavior this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnemyIntent {
    /// -1 left, 0 stand, +1 right
    pub direction: f32,
    pub attack: bool,
    /// Standing still and looking around
    pub scouting: bool,
}

/// Decision-making for one enemy.
///
/// Each enemy owns its behavior instance, so any per-enemy state lives in the
/// implementing type.
pub trait EnemyBehavior: std::fmt::Debug {
    fn name(&self) -> &'static str;

    fn update(&mut self, body: &PhysicsBody, dt: f32, ctx: &BehaviorContext) -> EnemyIntent;

    fn on_hit(&mut self, _damage: i32, _health: i32) {}

    fn on_death(&mut self) {}
}

/// Build a behavior from its level-file name; unknown names stand idle
pub fn behavior_by_name(name: &str) -> Box<dyn EnemyBehavior> {
    match name {
        "idle" => Box::new(Idle),
        "patrol" => Box::new(Patrol::default()),
        other => {
            log::warn!("Unknown enemy behavior '{}', using idle", other);
            Box::new(Idle)
        }
    }
}

/// Stands still
#[derive(Debug, Default)]
pub struct Idle;

impl EnemyBehavior for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn update(&mut self, _body: &PhysicsBody, _dt: f32, _ctx: &BehaviorContext) -> EnemyIntent {
        EnemyIntent::default()
    }
}

/// Walks back and forth around its spawn point.
///
/// Turns after a pause at the end of its range, at walls and at ledges.
#[derive(Debug)]
pub struct Patrol {
    /// Distance from the spawn point before turning (pixels)
    pub range: f32,
    /// Seconds spent scouting before turning
    pub pause: f32,
    origin: Option<f32>,
    direction: f32,
    pause_timer: f32,
}

impl Default for Patrol {
    fn default() -> Self {
        Self {
            range: 96.0,
            pause: 0.5,
            origin: None,
            direction: 1.0,
            pause_timer: 0.0,
        }
    }
}

impl Patrol {
    pub fn direction(&self) -> f32 {
        self.direction
    }

    fn blocked(&self, body: &PhysicsBody, level: &Level) -> bool {
        let ahead_x = if self.direction > 0.0 {
            body.position.x + body.size.x + 1.0
        } else {
            body.position.x - 1.0
        };

        let wall = level.is_solid_at(Vec2::new(ahead_x, body.center().y));
        let ledge = !level.is_solid_at(Vec2::new(ahead_x, body.bottom() + 1.0));
        wall || ledge
    }
}

impl EnemyBehavior for Patrol {
    fn name(&self) -> &'static str {
        "patrol"
    }

    fn update(&mut self, body: &PhysicsBody, dt: f32, ctx: &BehaviorContext) -> EnemyIntent {
        let origin = *self.origin.get_or_insert(body.position.x);

        if self.pause_timer > 0.0 {
            self.pause_timer -= dt;
            if self.pause_timer <= 0.0 {
                self.direction = -self.direction;
            }
            return EnemyIntent {
                scouting: true,
                ..Default::default()
            };
        }

        if !body.on_ground {
            return EnemyIntent::default();
        }

        let out_of_range = (body.position.x - origin) * self.direction >= self.range;
        if out_of_range || self.blocked(body, ctx.level) {
            self.pause_timer = self.pause;
            return EnemyIntent {
                scouting: true,
                ..Default::default()
            };
        }

        EnemyIntent {
            direction: self.direction,
            ..Default::default()
        }
    }

    fn on_hit(&mut self, _damage: i32, _health: i32) {
        self.pause_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tilemap::test_support::level_from_ascii;

    fn floor() -> Level {
        level_from_ascii(&[
            "........", //
            "........", //
            "..#####.",
        ])
    }

    fn standing(x: f32) -> PhysicsBody {
        let mut body = PhysicsBody::new(Vec2::new(x, 32.0), Vec2::new(20.0, 32.0));
        body.on_ground = true;
        body
    }

    #[test]
    fn test_unknown_name_falls_back_to_idle() {
        assert_eq!(behavior_by_name("patrol").name(), "patrol");
        assert_eq!(behavior_by_name("idle").name(), "idle");
        assert_eq!(behavior_by_name("teleport").name(), "idle");
    }

    #[test]
    fn test_idle_stands_still() {
        let level = floor();
        let ctx = BehaviorContext {
            level: &level,
            target: Some(Vec2::new(10.0, 10.0)),
        };
        let intent = Idle.update(&standing(100.0), 0.1, &ctx);
        assert_eq!(intent, EnemyIntent::default());
    }

    #[test]
    fn test_patrol_walks_then_turns_at_range() {
        let level = floor();
        let ctx = BehaviorContext { level: &level, target: None };
        let mut patrol = Patrol {
            range: 20.0,
            pause: 0.25,
            ..Default::default()
        };

        let intent = patrol.update(&standing(80.0), 0.125, &ctx);
        assert_eq!(intent.direction, 1.0);

        let intent = patrol.update(&standing(100.0), 0.125, &ctx);
        assert!(intent.scouting);
        assert_eq!(intent.direction, 0.0);

        patrol.update(&standing(100.0), 0.125, &ctx);
        patrol.update(&standing(100.0), 0.125, &ctx);
        assert_eq!(patrol.direction(), -1.0);

        let intent = patrol.update(&standing(100.0), 0.125, &ctx);
        assert_eq!(intent.direction, -1.0);
    }

    #[test]
    fn test_patrol_stops_at_ledge() {
        let level = floor();
        let ctx = BehaviorContext { level: &level, target: None };
        let mut patrol = Patrol::default();

        // Floor ends at x = 224; the probe lands one pixel past the body
        let intent = patrol.update(&standing(204.0), 0.1, &ctx);
        assert!(intent.scouting);
    }

    #[test]
    fn test_patrol_waits_while_airborne() {
        let level = floor();
        let ctx = BehaviorContext { level: &level, target: None };
        let mut patrol = Patrol::default();
        let mut body = standing(100.0);
        body.on_ground = false;

        assert_eq!(patrol.update(&body, 0.1, &ctx), EnemyIntent::default());
    }
}
