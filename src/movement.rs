use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

use crate::audio::{self, AudioHandles};
use crate::collision::PlatformMap;
use crate::level::{FALL_RESPAWN_MARGIN, PLAYER_SPAWN, VIEW_WIDTH};
use crate::player::Player;
use crate::state::{GameSet, GameState};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementSettings>().add_systems(
            Update,
            (
                read_player_input.in_set(GameSet::Input),
                (apply_kinematics, wrap_and_respawn)
                    .chain()
                    .in_set(GameSet::Movement),
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[derive(Resource)]
pub struct MovementSettings {
    pub gravity: f32,
    pub terminal_velocity: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            gravity: 980.0,
            terminal_velocity: -900.0,
        }
    }
}

#[derive(Component, Default, Deref, DerefMut)]
pub struct Velocity(pub Vec2);

#[derive(Component)]
pub struct PlayerController {
    pub run_speed: f32,
    pub jump_power: f32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            run_speed: 320.0,
            jump_power: 460.0,
        }
    }
}

#[derive(Component)]
pub struct MovementState {
    pub on_ground: bool,
    pub wants_jump: bool,
    /// Set while the player is airborne from a jump press, cleared when the
    /// jump key is released or the player respawns. Bookkeeping only.
    pub has_jumped: bool,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            on_ground: true,
            wants_jump: false,
            has_jumped: false,
        }
    }
}

#[derive(Component, Copy, Clone)]
pub struct Collider {
    pub half_extents: Vec2,
}

impl Collider {
    pub fn from_size(size: Vec2) -> Self {
        Self {
            half_extents: size * 0.5,
        }
    }
}

fn read_player_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&PlayerController, &mut Velocity, &mut MovementState)>,
) {
    for (controller, mut velocity, mut state) in &mut query {
        let mut axis = 0.0;
        if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
            axis -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
            axis += 1.0;
        }

        velocity.x = axis * controller.run_speed;

        if keyboard.just_pressed(KeyCode::Space) || keyboard.just_pressed(KeyCode::ArrowUp) {
            state.wants_jump = true;
        }
        if keyboard.just_released(KeyCode::Space) || keyboard.just_released(KeyCode::ArrowUp) {
            state.has_jumped = false;
        }
    }
}

fn apply_kinematics(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<MovementSettings>,
    platform_map: Res<PlatformMap>,
    audio_handles: Res<AudioHandles>,
    mut query: Query<(
        &mut Transform,
        &mut Velocity,
        &mut MovementState,
        &PlayerController,
        &Collider,
    )>,
) {
    let dt = time.delta_seconds();

    for (mut transform, mut velocity, mut state, controller, collider) in &mut query {
        if state.wants_jump && state.on_ground {
            velocity.y = controller.jump_power;
            state.on_ground = false;
            state.has_jumped = true;
            audio::play_clip(&mut commands, &audio_handles.jump);
        }

        state.wants_jump = false;

        if !state.on_ground {
            velocity.y -= settings.gravity * dt;
            if velocity.y < settings.terminal_velocity {
                velocity.y = settings.terminal_velocity;
            }
        } else if velocity.y < 0.0 {
            velocity.y = 0.0;
        }

        let mut position = transform.translation;
        let half = collider.half_extents;

        resolve_horizontal(&mut position, &mut velocity.x, half, dt, &platform_map);
        let vertical_collision =
            resolve_vertical(&mut position, &mut velocity.y, half, dt, &platform_map);

        state.on_ground = vertical_collision.down;

        transform.translation = position;
    }
}

/// Wraps the player horizontally around the screen edges and teleports them back to the spawn
/// point once they have fallen more than `FALL_RESPAWN_MARGIN` below the arena.
fn wrap_and_respawn(
    mut query: Query<(&mut Transform, &mut Velocity, &mut MovementState), With<Player>>,
) {
    let Ok((mut transform, mut velocity, mut state)) = query.get_single_mut() else {
        return;
    };

    if transform.translation.x < 0.0 {
        transform.translation.x = VIEW_WIDTH;
    } else if transform.translation.x > VIEW_WIDTH {
        transform.translation.x = 0.0;
    }

    if transform.translation.y < -FALL_RESPAWN_MARGIN {
        transform.translation.x = PLAYER_SPAWN.x;
        transform.translation.y = PLAYER_SPAWN.y;
        velocity.0 = Vec2::ZERO;
        state.on_ground = false;
        state.has_jumped = false;
    }
}

struct VerticalCollision {
    down: bool,
    #[allow(dead_code)]
    up: bool,
}

const SKIN: f32 = 0.001;

fn resolve_horizontal(
    position: &mut Vec3,
    velocity: &mut f32,
    half: Vec2,
    dt: f32,
    map: &PlatformMap,
) {
    if velocity.abs() < f32::EPSILON {
        return;
    }

    let new_x = position.x + *velocity * dt;
    let bottom = position.y - half.y + SKIN;
    let top = position.y + half.y - SKIN;

    for rect in &map.rects {
        if rect.max.y <= bottom || rect.min.y >= top {
            continue;
        }
        if new_x + half.x <= rect.min.x || new_x - half.x >= rect.max.x {
            continue;
        }

        if *velocity > 0.0 {
            position.x = rect.min.x - half.x - SKIN;
        } else {
            position.x = rect.max.x + half.x + SKIN;
        }
        *velocity = 0.0;
        return;
    }

    position.x = new_x;
}

fn resolve_vertical(
    position: &mut Vec3,
    velocity: &mut f32,
    half: Vec2,
    dt: f32,
    map: &PlatformMap,
) -> VerticalCollision {
    let mut collision = VerticalCollision {
        down: false,
        up: false,
    };

    let new_y = position.y + *velocity * dt;
    let left = position.x - half.x + SKIN;
    let right = position.x + half.x - SKIN;

    if *velocity <= 0.0 {
        // Downward probe. Contact whenever the lower edge ends up inside a platform's
        // vertical band; resting contact sits one skin above the surface, so the band is
        // padded by twice the skin to keep a standing body grounded frame over frame.
        let edge = new_y - half.y;
        for rect in &map.rects {
            if rect.max.x <= left || rect.min.x >= right {
                continue;
            }
            if edge <= rect.max.y + 2.0 * SKIN && edge >= rect.min.y - 2.0 * SKIN {
                position.y = rect.max.y + half.y + SKIN;
                *velocity = 0.0;
                collision.down = true;
                return collision;
            }
        }
    } else {
        let edge = new_y + half.y;
        for rect in &map.rects {
            if rect.max.x <= left || rect.min.x >= right {
                continue;
            }
            if edge >= rect.min.y - 2.0 * SKIN && edge <= rect.max.y + 2.0 * SKIN {
                position.y = rect.min.y - half.y - SKIN;
                *velocity = 0.0;
                collision.up = true;
                return collision;
            }
        }
    }

    position.y = new_y;
    collision
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_platform_map() -> PlatformMap {
        PlatformMap {
            rects: vec![Rect::new(350.0, 80.0, 550.0, 100.0)],
        }
    }

    #[test]
    fn falling_body_lands_on_platform_top() {
        let map = single_platform_map();
        let mut position = Vec3::new(450.0, 140.0, 0.0);
        let mut velocity = -600.0;
        let half = Vec2::splat(20.0);

        let collision = resolve_vertical(&mut position, &mut velocity, half, 1.0 / 20.0, &map);

        assert!(collision.down);
        assert_eq!(velocity, 0.0);
        assert!((position.y - (100.0 + 20.0 + SKIN)).abs() < 1e-4);
    }

    #[test]
    fn resting_body_stays_grounded() {
        let map = single_platform_map();
        let mut position = Vec3::new(450.0, 120.0 + SKIN, 0.0);
        let mut velocity = 0.0;
        let half = Vec2::splat(20.0);

        let collision = resolve_vertical(&mut position, &mut velocity, half, 1.0 / 60.0, &map);

        assert!(collision.down);
        assert!((position.y - (120.0 + SKIN)).abs() < 1e-4);
    }

    #[test]
    fn walking_into_platform_side_stops_at_edge() {
        let map = single_platform_map();
        // Standing on the ground next to the middle ledge, overlapping its height band.
        let mut position = Vec3::new(340.0, 85.0, 0.0);
        let mut velocity = 320.0;
        let half = Vec2::splat(20.0);

        resolve_horizontal(&mut position, &mut velocity, half, 1.0 / 10.0, &map);

        assert_eq!(velocity, 0.0);
        assert!((position.x - (350.0 - 20.0 - SKIN)).abs() < 1e-4);
    }

    #[test]
    fn clear_air_moves_freely() {
        let map = single_platform_map();
        let mut position = Vec3::new(100.0, 400.0, 0.0);
        let mut velocity = 320.0;
        let half = Vec2::splat(20.0);

        resolve_horizontal(&mut position, &mut velocity, half, 0.1, &map);

        assert_eq!(velocity, 320.0);
        assert!((position.x - 132.0).abs() < 1e-4);
    }
}
