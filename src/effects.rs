//! Ephemeral visual feedback: floating score popups and spawn flashes.
//!
//! Both effects are plain entities carrying a one-shot timer. They animate in ordinary Update
//! systems and despawn themselves when the timer runs out, so their memory lives exactly as long
//! as the effect is visible. The animations are intentionally left outside the gameplay sets;
//! a popup in flight keeps fading even while the game-over screen is up.

use bevy::prelude::*;

use crate::state::GameState;

const POPUP_LIFETIME: f32 = 0.8;
const POPUP_RISE_SPEED: f32 = 50.0;
const FLASH_LIFETIME: f32 = 0.4;
const FLASH_SIZE: f32 = 12.0;

/// Registers the effect animations and the round-reset cleanup.
pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), despawn_effects)
            .add_systems(Update, (animate_score_popups, animate_spawn_flashes));
    }
}

/// World-space text that drifts upward and fades before despawning.
#[derive(Component)]
pub struct ScorePopup {
    timer: Timer,
}

/// Brief expanding marker acknowledging a fresh spawn.
#[derive(Component)]
pub struct SpawnFlash {
    timer: Timer,
}

/// Spawns a floating score acknowledgment, e.g. "+50" above a stomped enemy.
pub fn spawn_score_popup(commands: &mut Commands, label: &str, position: Vec2) {
    commands.spawn((
        Name::new("ScorePopup"),
        ScorePopup {
            timer: Timer::from_seconds(POPUP_LIFETIME, TimerMode::Once),
        },
        Text2dBundle {
            text: Text::from_section(
                label,
                TextStyle {
                    font_size: 24.0,
                    color: Color::srgba(1.0, 1.0, 1.0, 1.0),
                    ..default()
                },
            ),
            transform: Transform::from_translation(position.extend(5.0)),
            ..default()
        },
    ));
}

/// Spawns a short-lived flash marking where a coin or enemy just appeared.
pub fn spawn_flash(commands: &mut Commands, position: Vec2) {
    commands.spawn((
        Name::new("SpawnFlash"),
        SpawnFlash {
            timer: Timer::from_seconds(FLASH_LIFETIME, TimerMode::Once),
        },
        SpriteBundle {
            sprite: Sprite {
                color: Color::srgba(1.0, 1.0, 1.0, 0.8),
                custom_size: Some(Vec2::splat(FLASH_SIZE)),
                ..default()
            },
            transform: Transform::from_translation(position.extend(3.0)),
            ..default()
        },
    ));
}

fn animate_score_popups(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut ScorePopup, &mut Transform, &mut Text)>,
) {
    for (entity, mut popup, mut transform, mut text) in &mut query {
        if popup.timer.tick(time.delta()).finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        transform.translation.y += POPUP_RISE_SPEED * time.delta_seconds();

        let alpha = 1.0 - popup.timer.fraction();
        for section in &mut text.sections {
            section.style.color = section.style.color.with_alpha(alpha);
        }
    }
}

fn animate_spawn_flashes(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut SpawnFlash, &mut Transform, &mut Sprite)>,
) {
    for (entity, mut flash, mut transform, mut sprite) in &mut query {
        if flash.timer.tick(time.delta()).finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        let progress = flash.timer.fraction();
        transform.scale = Vec3::splat(1.0 + 2.0 * progress);
        sprite.color = sprite.color.with_alpha(0.8 * (1.0 - progress));
    }
}

fn despawn_effects(
    mut commands: Commands,
    popups: Query<Entity, With<ScorePopup>>,
    flashes: Query<Entity, With<SpawnFlash>>,
) {
    for entity in popups.iter().chain(flashes.iter()) {
        commands.entity(entity).despawn_recursive();
    }
}
