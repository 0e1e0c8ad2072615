//! Arena layout: the fixed 800x600 playfield and its four static platforms.
//!
//! The whole "level format" of this game is a handful of literal constants, authored directly in
//! Bevy world coordinates (y-up, origin at the bottom-left of the screen). They are shared
//! immutably across modules through ordinary `const` items; nothing here is ever mutated.

use bevy::prelude::*;

use crate::state::GameState;

/// Logical viewport width in world units (1:1 with pixels).
pub const VIEW_WIDTH: f32 = 800.0;
/// Logical viewport height in world units.
pub const VIEW_HEIGHT: f32 = 600.0;

/// Side length of the square player avatar.
pub const PLAYER_SIZE: f32 = 40.0;
/// How far below the bottom edge the player may fall before being respawned.
pub const FALL_RESPAWN_MARGIN: f32 = 100.0;

/// Where the player starts and respawns after falling out: standing on the
/// left platform, flush with its top surface.
pub const PLAYER_SPAWN: Vec2 = Vec2::new(70.0, 220.0);

/// Axis-aligned platform description, authored as center + size like every
/// other sprite in the scene.
pub struct PlatformDef {
    pub center: Vec2,
    pub size: Vec2,
}

/// The static platform set: ground plus three floating ledges.
pub const PLATFORMS: [PlatformDef; 4] = [
    // Ground spanning the full width, top surface at y = 50.
    PlatformDef {
        center: Vec2::new(400.0, 40.0),
        size: Vec2::new(800.0, 20.0),
    },
    // Left ledge, top surface at y = 200.
    PlatformDef {
        center: Vec2::new(150.0, 190.0),
        size: Vec2::new(200.0, 20.0),
    },
    // Middle ledge, top surface at y = 100.
    PlatformDef {
        center: Vec2::new(450.0, 90.0),
        size: Vec2::new(200.0, 20.0),
    },
    // Right ledge, top surface at y = 200.
    PlatformDef {
        center: Vec2::new(700.0, 190.0),
        size: Vec2::new(200.0, 20.0),
    },
];

/// Registers arena lifecycle systems: build the platforms each round and
/// advance `Loading` to `Playing` once the reset frame has run.
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), despawn_platforms)
            .add_systems(
                Update,
                begin_round.run_if(in_state(GameState::Loading)),
            )
            .add_systems(OnEnter(GameState::Playing), spawn_platforms);
    }
}

/// Marker component for static platform entities.
#[derive(Component)]
pub struct Platform;

fn spawn_platforms(mut commands: Commands) {
    for def in &PLATFORMS {
        commands.spawn((
            Name::new("Platform"),
            Platform,
            crate::movement::Collider::from_size(def.size),
            SpriteBundle {
                sprite: Sprite {
                    color: Color::srgb(1.0, 1.0, 1.0),
                    custom_size: Some(def.size),
                    ..default()
                },
                transform: Transform::from_translation(def.center.extend(0.0)),
                ..default()
            },
        ));
    }
}

fn despawn_platforms(mut commands: Commands, query: Query<Entity, With<Platform>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

/// The reset state only needs to exist for one frame. Every `OnEnter(Loading)` cleanup system has
/// already run by the time the Update schedule executes, so we can immediately hand over to
/// gameplay. Bevy applies the transition at the end of the frame.
fn begin_round(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Playing);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platforms_fit_inside_viewport() {
        for def in &PLATFORMS {
            let half = def.size * 0.5;
            assert!(def.center.x - half.x >= 0.0);
            assert!(def.center.x + half.x <= VIEW_WIDTH);
            assert!(def.center.y - half.y >= 0.0);
            assert!(def.center.y + half.y <= VIEW_HEIGHT);
        }
    }

    #[test]
    fn player_spawn_rests_on_left_platform() {
        let left = &PLATFORMS[1];
        let platform_top = left.center.y + left.size.y * 0.5;
        assert_eq!(PLAYER_SPAWN.y - PLAYER_SIZE * 0.5, platform_top);
        assert!(PLAYER_SPAWN.x - PLAYER_SIZE * 0.5 >= left.center.x - left.size.x * 0.5);
    }
}
