//! Score display and game-over overlay.
//!
//! UI entities are part of Bevy's ECS; once despawned, all associated style/text components are
//! dropped automatically. The score itself lives in a plain resource so the collision handlers
//! can bump it without knowing anything about rendering.

use bevy::prelude::*;

use crate::state::GameState;

/// Registers the score label and game-over overlay lifecycles.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Score>()
            .add_systems(OnEnter(GameState::Loading), reset_score)
            .add_systems(OnEnter(GameState::Playing), spawn_score_label)
            .add_systems(Update, update_score_label)
            .add_systems(OnEnter(GameState::GameOver), spawn_game_over_overlay)
            .add_systems(OnExit(GameState::GameOver), despawn_game_over_overlay);
    }
}

/// Accumulated points for the current round: 10 per coin, 50 per stomp.
#[derive(Resource, Default)]
pub struct Score(pub u32);

#[derive(Component)]
struct ScoreLabel;

#[derive(Component)]
struct GameOverOverlay;

fn reset_score(
    mut commands: Commands,
    mut score: ResMut<Score>,
    labels: Query<Entity, With<ScoreLabel>>,
) {
    score.0 = 0;
    for entity in &labels {
        commands.entity(entity).despawn_recursive();
    }
}

/// Spawns the score counter in the top-left corner. The label shows the bare number, so a
/// fresh round reads "0".
fn spawn_score_label(mut commands: Commands, score: Res<Score>) {
    commands.spawn((
        ScoreLabel,
        Name::new("ScoreLabel"),
        TextBundle::from_section(
            score.0.to_string(),
            TextStyle {
                font_size: 32.0,
                color: Color::srgba(0.9, 0.9, 0.9, 1.0),
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(24.0),
            top: Val::Px(24.0),
            ..default()
        }),
    ));
}

/// Refreshes the label text whenever the score resource changes. Change detection keeps this
/// from rewriting the text section every frame.
fn update_score_label(score: Res<Score>, mut query: Query<&mut Text, With<ScoreLabel>>) {
    if !score.is_changed() {
        return;
    }

    for mut text in &mut query {
        text.sections[0].value = score.0.to_string();
    }
}

/// Spawns a full-screen UI node with centered text. Nodes live in the `Ui` world and are rendered
/// by the UI camera automatically. This runs exactly once per defeat, on entering `GameOver`.
fn spawn_game_over_overlay(mut commands: Commands) {
    commands
        .spawn((
            GameOverOverlay,
            Name::new("GameOverOverlay"),
            NodeBundle {
                background_color: BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "Game Over\nPress R to restart",
                TextStyle {
                    font_size: 36.0,
                    color: Color::srgba(0.9, 0.9, 0.9, 1.0),
                    ..default()
                },
            ));
        });
}

/// Removes the overlay on state exit (the restart path).
fn despawn_game_over_overlay(mut commands: Commands, query: Query<Entity, With<GameOverOverlay>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
