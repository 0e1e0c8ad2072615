//! Global game state definitions. States are stored by Bevy in a stack; switching states simply
//! updates an enum value and triggers on-enter/on-exit schedules. No heap allocations occur when
//! toggling states.

use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

/// High-level state machine for the game loop.
///
/// `Loading` lasts a single frame: it clears the previous round and re-arms
/// timers before handing over to `Playing`. `GameOver` leaves the final scene
/// on screen but stops every gameplay system, so a destroyed player receives
/// no further per-frame updates.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    GameOver,
}

/// Named system sets to structure the Update schedule.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Movement,
    Effects,
}

/// Restarts the round when `R` is pressed, from any state. The `State` resource is a read-only
/// snapshot; `NextState` writes the pending transition which Bevy applies at the end of the frame.
/// Routing through `Loading` reinitializes the entire scene unconditionally.
pub fn restart_on_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyR) {
        return;
    }

    if *state.get() != GameState::Loading {
        next_state.set(GameState::Loading);
    }
}
