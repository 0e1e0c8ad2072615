//! High-level plugin composition.
//!
//! The `CoinPatrolPlugin` glues together all domain-specific plugins
//! (arena, player, enemies, spawning, collisions, etc.) and sets up system
//! ordering. Each subsystem is responsible for its own state; this
//! orchestrator merely registers them with the Bevy application.

use bevy::prelude::*;

use crate::audio::GameAudioPlugin;
use crate::collision::CollisionPlugin;
use crate::effects::EffectsPlugin;
use crate::enemy::EnemyPlugin;
use crate::level::{LevelPlugin, VIEW_HEIGHT, VIEW_WIDTH};
use crate::movement::MovementPlugin;
use crate::player::PlayerPlugin;
use crate::spawn::SpawnPlugin;
use crate::state::{restart_on_key, GameSet, GameState};
use crate::ui::UiPlugin;

/// Bundles every gameplay-centric plugin into a single unit that can be added
/// to the Bevy `App`. Memory for each plugin is managed by Bevy; once the app
/// shuts down, all resources owned by these plugins are dropped automatically.
pub struct CoinPatrolPlugin;

impl Plugin for CoinPatrolPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>() // Allocates the state machine in the ECS world.
            .add_plugins((
                LevelPlugin,     // Platform layout + round reset.
                PlayerPlugin,    // Player entity spawning logic.
                EnemyPlugin,     // Patrol behaviour.
                SpawnPlugin,     // Timed coin/enemy placement.
                GameAudioPlugin, // Audio handle preloading.
                CollisionPlugin, // Pickup and stomp resolution.
                MovementPlugin,  // Input + kinematic updates.
                EffectsPlugin,   // Score popups and spawn flashes.
                UiPlugin,        // Score label + game over overlay.
            ))
            // Systems inside these sets execute sequentially while the game
            // is in the `Playing` state. `chain()` enforces Input → Movement
            // → Effects ordering so memory writes to components happen in
            // deterministic stages.
            .configure_sets(
                Update,
                (GameSet::Input, GameSet::Movement, GameSet::Effects)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(Startup, setup_camera) // Creates the primary camera entity once.
            .add_systems(Update, restart_on_key); // Full scene reset on demand.
    }
}

/// Spawns the 2D camera centered on the arena. There is exactly one screen of
/// playfield, so the camera never moves after this. The Bevy ECS stores the
/// entity in an archetype table; its components stay alive until despawned.
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2dBundle {
            transform: Transform::from_xyz(VIEW_WIDTH * 0.5, VIEW_HEIGHT * 0.5, 0.0),
            ..default()
        },
    ));
}
