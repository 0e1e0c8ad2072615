//! Patrolling enemies. Each enemy walks back and forth along its platform, reflecting direction
//! at the edges of its authored patrol interval. Vertical position is fixed: patrol is purely
//! horizontal, so the enemies never participate in gravity resolution.

use bevy::prelude::*;

use crate::movement::Collider;
use crate::spawn::EnemySpawnPoint;
use crate::state::{GameSet, GameState};

/// Side length of the square enemy sprite.
pub const ENEMY_SIZE: f32 = 40.0;
/// Horizontal patrol speed in world units per second.
pub const ENEMY_MOVE_SPEED: f32 = 60.0;

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            patrol_enemies
                .in_set(GameSet::Movement)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Patrol state carried by every enemy. `direction` is +1 or -1; the bounds are the interval of
/// center x positions the enemy may occupy on its platform.
#[derive(Component)]
pub struct Enemy {
    pub move_speed: f32,
    pub direction: f32,
    pub patrol_min_x: f32,
    pub patrol_max_x: f32,
}

/// Spawns an enemy at an authored spawn point, heading right.
pub fn spawn_enemy(commands: &mut Commands, point: &EnemySpawnPoint) -> Entity {
    let size = Vec2::splat(ENEMY_SIZE);
    commands
        .spawn((
            Name::new("Enemy"),
            Enemy {
                move_speed: ENEMY_MOVE_SPEED,
                direction: 1.0,
                patrol_min_x: point.patrol_min_x,
                patrol_max_x: point.patrol_max_x,
            },
            Collider::from_size(size),
            SpriteBundle {
                sprite: Sprite {
                    color: Color::srgb(1.0, 0.0, 0.0),
                    custom_size: Some(size),
                    ..default()
                },
                transform: Transform::from_translation(point.pos.extend(1.0)),
                ..default()
            },
        ))
        .id()
}

fn patrol_enemies(time: Res<Time>, mut query: Query<(&mut Transform, &mut Enemy)>) {
    let dt = time.delta_seconds();
    for (mut transform, mut enemy) in &mut query {
        let (x, direction) = patrol_step(
            transform.translation.x,
            enemy.direction,
            enemy.move_speed,
            enemy.patrol_min_x,
            enemy.patrol_max_x,
            dt,
        );
        transform.translation.x = x;
        enemy.direction = direction;
    }
}

/// One tick of patrol movement: advance along x, then reflect the direction if the step ended
/// outside the patrol interval. The reflection is guarded by the current heading so an enemy
/// that overshoots a bound turns around once instead of flipping every tick.
pub fn patrol_step(
    x: f32,
    direction: f32,
    speed: f32,
    min_x: f32,
    max_x: f32,
    dt: f32,
) -> (f32, f32) {
    let new_x = x + speed * direction * dt;

    let new_direction = if (new_x <= min_x && direction < 0.0) || (new_x >= max_x && direction > 0.0)
    {
        -direction
    } else {
        direction
    };

    (new_x, new_direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflects_at_right_bound() {
        let (x, dir) = patrol_step(529.5, 1.0, 60.0, 370.0, 530.0, 0.1);
        assert!(x >= 530.0);
        assert_eq!(dir, -1.0);
    }

    #[test]
    fn reflects_at_left_bound() {
        let (x, dir) = patrol_step(370.2, -1.0, 60.0, 370.0, 530.0, 0.1);
        assert!(x <= 370.0);
        assert_eq!(dir, 1.0);
    }

    #[test]
    fn keeps_heading_inside_interval() {
        let (x, dir) = patrol_step(450.0, 1.0, 60.0, 370.0, 530.0, 0.1);
        assert!((x - 456.0).abs() < 1e-4);
        assert_eq!(dir, 1.0);
    }

    #[test]
    fn overshoot_is_bounded_by_one_step() {
        let speed = 60.0;
        let dt = 1.0 / 60.0;
        let mut x = 370.0;
        let mut dir = 1.0;
        for _ in 0..20_000 {
            let (nx, ndir) = patrol_step(x, dir, speed, 370.0, 530.0, dt);
            assert!(nx <= 530.0 + speed * dt);
            assert!(nx >= 370.0 - speed * dt);
            x = nx;
            dir = ndir;
        }
    }

    #[test]
    fn walks_full_interval_and_returns() {
        // From the left bound heading right, the enemy must reach the right bound,
        // turn around, and come back without sticking at either edge.
        let dt = 0.05;
        let mut x = 370.0;
        let mut dir = 1.0;
        let mut reached_right = false;
        let mut returned_left = false;
        for _ in 0..10_000 {
            let (nx, ndir) = patrol_step(x, dir, 60.0, 370.0, 530.0, dt);
            if nx >= 530.0 {
                reached_right = true;
            }
            if reached_right && nx <= 370.0 {
                returned_left = true;
                break;
            }
            x = nx;
            dir = ndir;
        }
        assert!(reached_right);
        assert!(returned_left);
    }
}
