// Enemies
//
// Each enemy pairs a physics body and an animation catalogue with a boxed
// behavior that decides where it walks. Enemies take hits from player strikes.

pub mod behavior;
pub mod enemy;

pub use behavior::{behavior_by_name, BehaviorContext, EnemyBehavior, EnemyIntent, Idle, Patrol};
pub use enemy::{Enemy, EnemyState, DEFAULT_ENEMY_HEALTH, HURT_DURATION};
