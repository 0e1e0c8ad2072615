use bevy::prelude::*;

use crate::audio::{self, AudioHandles};
use crate::coin::Coin;
use crate::effects;
use crate::enemy::Enemy;
use crate::level::Platform;
use crate::movement::{Collider, MovementState, Velocity};
use crate::player::Player;
use crate::state::{GameSet, GameState};
use crate::ui::Score;

pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlatformMap>()
            .add_systems(PostUpdate, rebuild_platform_map)
            .add_systems(
                Update,
                (collect_coins, resolve_enemy_contact)
                    .in_set(GameSet::Effects)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Points awarded for picking up a coin.
pub const COIN_SCORE: u32 = 10;
/// Points awarded for stomping an enemy.
pub const STOMP_SCORE: u32 = 50;
/// Vertical slack when deciding whether a contact counts as a stomp.
pub const STOMP_TOLERANCE: f32 = 10.0;
/// Upward velocity granted to the player after a successful stomp.
pub const STOMP_BOUNCE: f32 = 300.0;

/// Cached world-space rectangles of the static platforms. Kinematics reads this every frame
/// instead of re-querying platform entities; it is rebuilt only when platforms are added or
/// removed (round start and round reset).
#[derive(Resource, Default)]
pub struct PlatformMap {
    pub rects: Vec<Rect>,
}

fn rebuild_platform_map(
    mut map: ResMut<PlatformMap>,
    platforms: Query<(&Transform, &Collider), With<Platform>>,
    added: Query<(), Added<Platform>>,
    mut removed: RemovedComponents<Platform>,
) {
    if added.is_empty() && removed.read().next().is_none() {
        return;
    }

    map.rects = platforms
        .iter()
        .map(|(transform, collider)| {
            Rect::from_center_half_size(transform.translation.truncate(), collider.half_extents)
        })
        .collect();
}

/// Axis-aligned overlap test on centers and half extents.
pub fn overlaps(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> bool {
    (a_pos.x - b_pos.x).abs() < a_half.x + b_half.x && (a_pos.y - b_pos.y).abs() < a_half.y + b_half.y
}

/// A contact is a stomp when the player's lower edge is at or above the enemy's upper edge,
/// within `STOMP_TOLERANCE` units of slack.
pub fn is_stomp(player_y: f32, player_half_y: f32, enemy_y: f32, enemy_half_y: f32) -> bool {
    player_y - player_half_y >= enemy_y + enemy_half_y - STOMP_TOLERANCE
}

fn collect_coins(
    mut commands: Commands,
    mut score: ResMut<Score>,
    audio_handles: Res<AudioHandles>,
    player: Query<(&Transform, &Collider), With<Player>>,
    coins: Query<(Entity, &Transform, &Collider), With<Coin>>,
) {
    let Ok((player_transform, player_collider)) = player.get_single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, transform, collider) in &coins {
        let coin_pos = transform.translation.truncate();
        if overlaps(
            player_pos,
            player_collider.half_extents,
            coin_pos,
            collider.half_extents,
        ) {
            commands.entity(entity).despawn_recursive();
            score.0 += COIN_SCORE;
            audio::play_clip(&mut commands, &audio_handles.pickup);
        }
    }
}

fn resolve_enemy_contact(
    mut commands: Commands,
    mut score: ResMut<Score>,
    audio_handles: Res<AudioHandles>,
    mut next_state: ResMut<NextState<GameState>>,
    mut player: Query<
        (Entity, &Transform, &Collider, &mut Velocity, &mut MovementState),
        With<Player>,
    >,
    enemies: Query<(Entity, &Transform, &Collider), With<Enemy>>,
) {
    let Ok((player_entity, player_transform, player_collider, mut velocity, mut state)) =
        player.get_single_mut()
    else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (enemy_entity, enemy_transform, enemy_collider) in &enemies {
        let enemy_pos = enemy_transform.translation.truncate();
        if !overlaps(
            player_pos,
            player_collider.half_extents,
            enemy_pos,
            enemy_collider.half_extents,
        ) {
            continue;
        }

        if is_stomp(
            player_pos.y,
            player_collider.half_extents.y,
            enemy_pos.y,
            enemy_collider.half_extents.y,
        ) {
            commands.entity(enemy_entity).despawn_recursive();
            velocity.y = STOMP_BOUNCE;
            state.on_ground = false;
            score.0 += STOMP_SCORE;
            effects::spawn_score_popup(&mut commands, "+50", enemy_pos);
            audio::play_clip(&mut commands, &audio_handles.stomp);
        } else {
            // Side contact kills the player. The overlay is spawned by the UI module's
            // OnEnter(GameOver) schedule, so exactly one message appears.
            commands.entity(player_entity).despawn_recursive();
            audio::play_clip(&mut commands, &audio_handles.defeat);
            next_state.set(GameState::GameOver);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_requires_both_axes() {
        let half = Vec2::splat(20.0);
        assert!(overlaps(
            Vec2::new(100.0, 100.0),
            half,
            Vec2::new(130.0, 110.0),
            half
        ));
        // Separated on x only.
        assert!(!overlaps(
            Vec2::new(100.0, 100.0),
            half,
            Vec2::new(141.0, 100.0),
            half
        ));
        // Separated on y only.
        assert!(!overlaps(
            Vec2::new(100.0, 100.0),
            half,
            Vec2::new(100.0, 141.0),
            half
        ));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let half = Vec2::splat(20.0);
        assert!(!overlaps(
            Vec2::new(100.0, 100.0),
            half,
            Vec2::new(140.0, 100.0),
            half
        ));
    }

    #[test]
    fn landing_from_above_is_a_stomp() {
        // Player bottom exactly at the enemy top.
        assert!(is_stomp(160.0, 20.0, 120.0, 20.0));
        // Player bottom sunk into the enemy but within tolerance.
        assert!(is_stomp(152.0, 20.0, 120.0, 20.0));
    }

    #[test]
    fn side_contact_is_not_a_stomp() {
        // Player level with the enemy.
        assert!(!is_stomp(120.0, 20.0, 120.0, 20.0));
        // Player bottom more than the tolerance below the enemy top.
        assert!(!is_stomp(148.0, 20.0, 120.0, 20.0));
    }
}
