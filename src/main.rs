//! Application entry point: composes the Bevy runtime, core plugins, and window configuration.
//!
//! Even though Rust automatically frees resources once they go out of scope, the Bevy engine
//! keeps long-lived singletons (plugins, resources) alive for the duration of the app. This file
//! wires those pieces together and defers to the `CoinPatrolPlugin` defined in `app.rs`.

mod app;
mod audio;
mod coin;
mod collision;
mod effects;
mod enemy;
mod level;
mod movement;
mod player;
mod spawn;
mod state;
mod ui;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod wasm;

use app::CoinPatrolPlugin;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::render::texture::ImagePlugin;
use bevy::window::{Window, WindowResolution};
use level::{VIEW_HEIGHT, VIEW_WIDTH};

fn main() {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    wasm::set_panic_hook();

    // The window resource drives swap-chain configuration. The arena is a single fixed screen,
    // so the logical resolution stays locked at 800x600 and world units map 1:1 to pixels.
    // Bevy handles the underlying OS resources, so no manual deallocation is necessary.
    let primary_window = Window {
        title: "Coin Patrol".to_string(),
        resolution: WindowResolution::new(VIEW_WIDTH, VIEW_HEIGHT),
        resizable: false,
        canvas: cfg!(all(target_arch = "wasm32", feature = "web"))
            .then(|| "#bevy-canvas".to_owned()),
        ..default()
    };

    // `DefaultPlugins` spins up rendering, input, audio, etc. We override pieces that matter for
    // this project: nearest-neighbor sampling for crisp rectangle sprites, and asset settings for
    // desktop vs web. Bevy keeps plugin instances in an internal registry, so we simply compose
    // and hand them to the App builder.
    let mut default_plugins = DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(primary_window),
            ..default()
        })
        .set(ImagePlugin::default_nearest());

    #[cfg(not(target_arch = "wasm32"))]
    {
        default_plugins = default_plugins.set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(true),
            ..default()
        });
    }

    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        default_plugins = default_plugins.set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(false),
            ..default()
        });
    }

    // `App::new()` allocates the ECS world and schedule. Plugins + the clear color describe
    // startup state; once `run()` is called, Bevy drives the main loop until the process exits.
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.0, 0.0, 0.0)))
        .add_plugins(default_plugins)
        .add_plugins(CoinPatrolPlugin)
        .run();
}
