//! Coin entity definition and factory. Coins have no behaviour of their own; they sit where the
//! spawn selector placed them until the player overlaps one and the collision handler despawns it.

use bevy::prelude::*;

use crate::movement::Collider;

/// Side length of the square coin sprite.
pub const COIN_SIZE: f32 = 20.0;

/// Marker component for collectible coins. Population queries filter on this tag.
#[derive(Component)]
pub struct Coin;

/// Spawns a coin at the given position. The returned entity lives until picked up or until the
/// round is reset; Bevy drops all of its components on despawn.
pub fn spawn_coin(commands: &mut Commands, position: Vec2) -> Entity {
    let size = Vec2::splat(COIN_SIZE);
    commands
        .spawn((
            Name::new("Coin"),
            Coin,
            Collider::from_size(size),
            SpriteBundle {
                sprite: Sprite {
                    color: Color::srgb(1.0, 0.84, 0.0),
                    custom_size: Some(size),
                    ..default()
                },
                transform: Transform::from_translation(position.extend(1.0)),
                ..default()
            },
        ))
        .id()
}
