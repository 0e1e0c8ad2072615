//! Player entity lifecycle management. Handles spawning the avatar with the correct components
//! and cleaning it up when a round is reset.
//!
//! All memory for components is owned by Bevy's ECS tables; this module merely issues spawn/
//! despawn commands and lets Rust drop the components automatically when the entity is removed.
//! The player can also be destroyed mid-round by an enemy, so every system that touches it goes
//! through an existence-checked query rather than assuming it is alive.

use bevy::prelude::*;

use crate::level::{PLAYER_SIZE, PLAYER_SPAWN};
use crate::movement::{Collider, MovementState, PlayerController, Velocity};
use crate::state::GameState;

/// Registers the systems that create/destroy the player entity at round boundaries. Death during
/// a round despawns the entity directly from the collision handler; the `Loading` cleanup below
/// is what makes restart unconditional.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), spawn_player)
            .add_systems(OnEnter(GameState::Loading), despawn_player);
    }
}

/// Marker component used by many systems (movement, collision, spawn-safety queries) to identify
/// the player entity. The component itself stores no data and therefore adds zero heap overhead.
#[derive(Component)]
pub struct Player;

fn spawn_player(mut commands: Commands) {
    let sprite_size = Vec2::splat(PLAYER_SIZE);

    // Spawn the player entity. The tuple inserted into the ECS is stored in a contiguous
    // archetype row, so memory access during gameplay remains cache-friendly.
    commands.spawn((
        Name::new("Player"),
        Player,
        SpriteBundle {
            sprite: Sprite {
                color: Color::srgb(0.0, 1.0, 0.7),
                custom_size: Some(sprite_size),
                ..default()
            },
            transform: Transform::from_translation(PLAYER_SPAWN.extend(2.0)),
            ..default()
        },
        Velocity::default(),
        MovementState::default(),
        PlayerController::default(),
        Collider::from_size(sprite_size),
    ));
}

fn despawn_player(mut commands: Commands, query: Query<Entity, With<Player>>) {
    // Remove the player entity and all of its components. No manual memory management required,
    // Bevy drops each component as part of the despawn operation. The query is empty when the
    // player already died this round; that is a valid steady state.
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
