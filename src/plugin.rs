use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::config::SceneConfig;
use crate::emitters::EffectKind;
use crate::engine::CelebrationEngine;
use crate::render_bridge::{apply_render_commands, RenderEntities, RenderQueue};
use crate::setup::{orbit_lights, setup_scene, sync_camera};

/// Starts the staggered all-variant burst sequence.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct BurstRequested;

/// Spawns one effect directly, bypassing the timers.
#[derive(Event, Clone, Copy, Debug)]
pub struct SpawnEffectRequested {
    pub kind: EffectKind,
    pub position: Vec3,
    pub count: Option<usize>,
}

#[derive(Default)]
pub struct CelebrationPlugin {
    pub config: SceneConfig,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Plugin for CelebrationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(CelebrationEngine::new(self.config.clone(), self.seed))
            .init_resource::<RenderQueue>()
            .init_resource::<RenderEntities>()
            .add_event::<BurstRequested>()
            .add_event::<SpawnEffectRequested>()
            .add_systems(Startup, (setup_scene, initialize_engine, apply_render_commands).chain())
            .add_systems(
                Update,
                (
                    track_pointer,
                    burst_input,
                    handle_requests,
                    advance_engine,
                    apply_render_commands,
                    sync_camera,
                    orbit_lights,
                )
                    .chain(),
            )
            .add_systems(Last, (teardown_on_exit, apply_render_commands).chain());
    }
}

fn initialize_engine(mut engine: ResMut<CelebrationEngine>, mut queue: ResMut<RenderQueue>) {
    engine.initialize(&mut *queue);
}

/// Cursor position normalized to `[-0.5, 0.5]` per axis, y pointing down.
fn track_pointer(windows: Query<&Window, With<PrimaryWindow>>, mut engine: ResMut<CelebrationEngine>) {
    let Ok(window) = windows.single() else {
        return;
    };
    if let Some(cursor) = window.cursor_position() {
        let size = Vec2::new(window.width(), window.height()).max(Vec2::ONE);
        engine.set_pointer(cursor / size - Vec2::splat(0.5));
    }
}

fn burst_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut bursts: EventWriter<BurstRequested>,
) {
    if keyboard.just_pressed(KeyCode::Space) || mouse.just_pressed(MouseButton::Left) {
        bursts.write(BurstRequested);
    }
}

fn handle_requests(
    mut bursts: EventReader<BurstRequested>,
    mut spawns: EventReader<SpawnEffectRequested>,
    mut engine: ResMut<CelebrationEngine>,
    mut queue: ResMut<RenderQueue>,
) {
    for _ in bursts.read() {
        engine.fire_burst();
    }
    for request in spawns.read() {
        engine.spawn(&mut *queue, request.kind, request.position, request.count);
    }
}

fn advance_engine(time: Res<Time>, mut engine: ResMut<CelebrationEngine>, mut queue: ResMut<RenderQueue>) {
    engine.update(&mut *queue, time.delta_secs());
}

fn teardown_on_exit(
    mut exits: EventReader<AppExit>,
    mut engine: ResMut<CelebrationEngine>,
    mut queue: ResMut<RenderQueue>,
) {
    if exits.read().next().is_some() {
        engine.teardown(&mut *queue);
    }
}
