//! Audio preloading and playback. Stashes Bevy `Handle<AudioSource>` references so they are kept
//! alive in memory.
//!
//! Bevy's asset system reference-counts handles; when the last handle is dropped, the underlying
//! audio buffer is released. The `AudioHandles` resource keeps optional handles alive for the
//! whole session, and gameplay systems fire them through `play_clip` at the matching moments
//! (jump, pickup, stomp, defeat). Until real files are provided the handles act as no-ops.

use bevy::prelude::*;

use crate::state::GameState;

/// Registers the audio loading system and allocates the persistent handle cache.
/// The plugin itself is lightweight, just bookkeeping for asset handles.
pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AudioHandles>()
            .add_systems(OnEnter(GameState::Loading), load_audio_handles);
    }
}

/// Resource that stores optional handles to game-wide audio clips. Because each `Handle` is just a
/// cloneable pointer into Bevy's asset storage, this struct is cheap to copy and keeps asset memory
/// alive until explicit replacement.
#[derive(Resource, Default)]
pub struct AudioHandles {
    pub jump: Option<Handle<AudioSource>>,
    pub pickup: Option<Handle<AudioSource>>,
    pub stomp: Option<Handle<AudioSource>>,
    pub defeat: Option<Handle<AudioSource>>,
}

/// Loads the game's audio clips through the global `AssetServer`. The server queues asynchronous
/// asset fetches; once loaded, Bevy caches the decoded audio in memory and the handles in
/// `AudioHandles` reference that cache. Re-running on a restart is a no-op thanks to that cache.
fn load_audio_handles(asset_server: Res<AssetServer>, mut handles: ResMut<AudioHandles>) {
    if handles.jump.is_some() {
        return;
    }

    handles.jump = Some(asset_server.load("audio/jump.ogg"));
    handles.pickup = Some(asset_server.load("audio/pickup.ogg"));
    handles.stomp = Some(asset_server.load("audio/stomp.ogg"));
    handles.defeat = Some(asset_server.load("audio/defeat.ogg"));

    info!("Queued audio clips. Add files under assets/audio/ to enable playback.");
}

/// Fires a one-shot clip. The spawned audio entity despawns itself once playback finishes, so
/// nothing accumulates across a long session. Absent handles are silently skipped.
pub fn play_clip(commands: &mut Commands, clip: &Option<Handle<AudioSource>>) {
    let Some(source) = clip else {
        return;
    };

    commands.spawn(AudioBundle {
        source: source.clone(),
        settings: PlaybackSettings::DESPAWN,
    });
}
