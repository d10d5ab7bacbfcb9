use bevy::prelude::*;

use heartburst::plugin::CelebrationPlugin;

fn main() {
    // HEARTBURST_SEED pins the RNG for reproducible runs.
    let seed = std::env::var("HEARTBURST_SEED").ok().and_then(|raw| raw.parse().ok());

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Heartburst".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(bevy::diagnostic::FrameTimeDiagnosticsPlugin::default())
        .add_plugins(CelebrationPlugin { seed, ..default() })
        .run();
}
