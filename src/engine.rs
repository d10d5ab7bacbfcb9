//! The scene engine: one aggregate owning every piece of simulation state.
//!
//! Each component only ever sees its own sub-state. The engine routes scheduler output to them:
//! timer firings become spawns, and the per-frame subscription drives [`CelebrationEngine::tick`],
//! which advances ambient field, decorations, effect pool and camera in that order.
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ambient::AmbientField;
use crate::camera_rig::CameraRig;
use crate::config::SceneConfig;
use crate::constants::CLOCK_STEP_PER_TICK;
use crate::decorations::FloatingDecorations;
use crate::emitters::{emit, EffectKind};
use crate::explosions::{ExplosionScheduler, ExplosionTask, SpawnRequest};
use crate::pool::EffectPool;
use crate::renderer::Renderer;
use crate::scheduler::{Scheduler, TaskHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineTask {
    FrameTick,
    Explosion(ExplosionTask),
}

impl From<ExplosionTask> for EngineTask {
    fn from(task: ExplosionTask) -> Self {
        EngineTask::Explosion(task)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EnginePhase {
    #[default]
    Idle,
    Running,
    TornDown,
}

/// Scene time, advanced a fixed step per frame tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    time: f32,
    ticks: u64,
}

impl FrameClock {
    fn advance(&mut self) -> f32 {
        self.ticks += 1;
        self.time += CLOCK_STEP_PER_TICK;
        self.time
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[derive(Resource)]
pub struct CelebrationEngine {
    config: SceneConfig,
    phase: EnginePhase,
    rng: StdRng,
    scheduler: Scheduler<EngineTask>,
    frame_subscription: Option<TaskHandle>,
    clock: FrameClock,
    pool: EffectPool,
    ambient: AmbientField,
    decorations: FloatingDecorations,
    camera: CameraRig,
    explosions: ExplosionScheduler,
}

impl CelebrationEngine {
    /// Builds the persistent state. Nothing is visible until [`Self::initialize`].
    pub fn new(config: SceneConfig, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ambient = AmbientField::new(&config.ambient, &mut rng);
        let decorations = FloatingDecorations::new(&config.decorations, &mut rng);
        let camera = CameraRig::new(&config.camera);
        let explosions = ExplosionScheduler::new(&config.explosions, config.confetti.burst_count);

        Self {
            config,
            phase: EnginePhase::Idle,
            rng,
            scheduler: Scheduler::new(),
            frame_subscription: None,
            clock: FrameClock::default(),
            pool: EffectPool::new(),
            ambient,
            decorations,
            camera,
            explosions,
        }
    }

    /// Attaches persistent visuals and starts the timers. Only the first call has an effect.
    pub fn initialize(&mut self, renderer: &mut impl Renderer) -> bool {
        if self.phase != EnginePhase::Idle {
            return false;
        }

        self.ambient.attach(renderer);
        self.decorations.attach(renderer);
        self.explosions.start(&mut self.scheduler);
        self.frame_subscription = Some(self.scheduler.subscribe_frame(EngineTask::FrameTick));
        self.phase = EnginePhase::Running;

        info!(
            "Scene running: {} ambient particles, {} floating hearts",
            self.ambient.len(),
            self.decorations.hearts().len()
        );
        true
    }

    pub fn is_running(&self) -> bool {
        self.phase == EnginePhase::Running
    }

    /// Spawns one emitter burst. Requests made while the engine is not running are dropped.
    pub fn spawn(
        &mut self,
        renderer: &mut impl Renderer,
        kind: EffectKind,
        position: Vec3,
        count: Option<usize>,
    ) -> Option<usize> {
        if !self.is_running() {
            debug!("Dropping {:?} spawn: engine is {:?}", kind, self.phase);
            return None;
        }
        let seeds = emit(kind, &mut self.rng, &self.config, position, count);
        Some(self.pool.emit(renderer, &self.config, seeds))
    }

    /// Starts the staggered all-variant burst sequence and shakes the camera once.
    pub fn fire_burst(&mut self) -> bool {
        if !self.is_running() {
            debug!("Dropping burst request: engine is {:?}", self.phase);
            return false;
        }
        let shake = self.explosions.trigger_burst(&mut self.scheduler);
        self.camera.request_shake(shake);
        true
    }

    pub fn request_shake(&mut self, intensity: f32) {
        if self.is_running() {
            self.camera.request_shake(intensity);
        }
    }

    /// Normalized pointer in `[-0.5, 0.5]` per axis.
    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.camera.set_pointer(pointer);
    }

    /// Advances wall-clock time by `dt` seconds and dispatches whatever came due.
    /// Returns the number of frame ticks run.
    pub fn update(&mut self, renderer: &mut impl Renderer, dt: f32) -> usize {
        if !self.is_running() {
            return 0;
        }

        let mut ticks = 0;
        for task in self.scheduler.advance(dt) {
            match task {
                EngineTask::FrameTick => {
                    self.tick(renderer);
                    ticks += 1;
                }
                EngineTask::Explosion(ExplosionTask::RandomTrigger) => {
                    if let Some(request) = self.explosions.roll(&mut self.rng) {
                        self.spawn_request(renderer, request);
                    }
                }
                EngineTask::Explosion(ExplosionTask::BurstWave { wave }) => {
                    debug!("Burst wave {}", wave);
                    for request in self.explosions.burst_wave(&mut self.rng) {
                        self.spawn_request(renderer, request);
                    }
                }
            }
        }
        ticks
    }

    fn spawn_request(&mut self, renderer: &mut impl Renderer, request: SpawnRequest) {
        let SpawnRequest { kind, position, count } = request;
        self.spawn(renderer, kind, position, count);
    }

    /// One frame: ambient field, decorations, effect pool, camera, in that order.
    pub fn tick(&mut self, renderer: &mut impl Renderer) {
        let time = self.clock.advance();

        self.ambient.step(&mut self.rng);
        self.decorations.step(time);
        self.pool.step_all(renderer);
        self.camera.step(&mut self.rng);

        self.ambient.sync(renderer);
        self.decorations.sync(renderer);
    }

    /// Cancels every timer and pending wave and releases every visual.
    ///
    /// Safe to call repeatedly; only the first call does anything and returns `true`.
    pub fn teardown(&mut self, renderer: &mut impl Renderer) -> bool {
        if self.phase == EnginePhase::TornDown {
            return false;
        }
        self.phase = EnginePhase::TornDown;

        self.explosions.stop(&mut self.scheduler);
        if let Some(frame) = self.frame_subscription.take() {
            self.scheduler.cancel(frame);
        }
        self.scheduler.cancel_all();

        let effects = self.pool.dispose_all(renderer);
        self.ambient.dispose(renderer);
        self.decorations.dispose(renderer);

        info!("Scene torn down, released {} live effects", effects);
        true
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn pool(&self) -> &EffectPool {
        &self.pool
    }

    pub fn ambient(&self) -> &AmbientField {
        &self.ambient
    }

    pub fn decorations(&self) -> &FloatingDecorations {
        &self.decorations
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AmbientConfig;
    use crate::renderer::testing::RecordingRenderer;

    const BURST_WAVES: usize = crate::constants::BURST_REPEAT_COUNT;

    fn quiet_config() -> SceneConfig {
        let mut config = SceneConfig {
            ambient: AmbientConfig {
                count: 64,
                ..default()
            },
            ..default()
        };
        config.explosions.probability = 0.0;
        config
    }

    fn running(config: SceneConfig) -> (CelebrationEngine, RecordingRenderer) {
        let mut engine = CelebrationEngine::new(config, Some(42));
        let mut renderer = RecordingRenderer::default();
        assert!(engine.initialize(&mut renderer));
        (engine, renderer)
    }

    #[test]
    fn spawns_before_initialize_are_dropped() {
        let mut engine = CelebrationEngine::new(quiet_config(), Some(1));
        let mut renderer = RecordingRenderer::default();

        assert_eq!(engine.spawn(&mut renderer, EffectKind::Confetti, Vec3::ZERO, None), None);
        assert!(!engine.fire_burst());
        assert_eq!(engine.update(&mut renderer, 1.0), 0);
        assert_eq!(renderer.created, 0);
        assert_eq!(engine.pool().emissions(), 0);
    }

    #[test]
    fn initialize_attaches_persistent_visuals_once() {
        let (mut engine, mut renderer) = running(quiet_config());
        // ambient cloud + floating hearts + central heart
        assert_eq!(renderer.live_count(), 1 + engine.decorations().hearts().len() + 1);
        assert!(!engine.initialize(&mut renderer));
        assert_eq!(engine.phase(), EnginePhase::Running);
    }

    #[test]
    fn every_update_runs_exactly_one_frame_tick() {
        let (mut engine, mut renderer) = running(quiet_config());
        for _ in 0..10 {
            assert_eq!(engine.update(&mut renderer, 1.0 / 60.0), 1);
        }
        assert_eq!(engine.clock().ticks(), 10);
        approx::assert_relative_eq!(engine.clock().time(), 0.1, epsilon = 1e-5);
        assert_eq!(engine.ambient().len(), 64);
    }

    #[test]
    fn burst_enqueues_four_emissions_per_wave_and_one_shake() {
        let (mut engine, mut renderer) = running(quiet_config());
        assert!(engine.fire_burst());
        assert_eq!(engine.camera().shake_requests(), 1);

        for _ in 0..10 {
            engine.update(&mut renderer, 0.05);
        }

        let waves = BURST_WAVES;
        assert_eq!(engine.pool().emissions(), 4 * waves as u64);
        assert_eq!(engine.pool().count(EffectKind::Firework), waves);
        assert_eq!(engine.pool().count(EffectKind::BlastRing), waves);
        assert_eq!(engine.pool().count(EffectKind::Confetti), waves * 80);
        assert_eq!(engine.pool().count(EffectKind::HeartBurst), waves * 12);
        assert_eq!(engine.camera().shake_requests(), 1);
    }

    #[test]
    fn bursts_and_random_trigger_interleave() {
        let mut config = quiet_config();
        config.explosions.probability = 1.0;
        let (mut engine, mut renderer) = running(config);

        assert!(engine.fire_burst());
        // 0.85s covers all five waves and exactly one timer firing
        for _ in 0..17 {
            engine.update(&mut renderer, 0.05);
        }
        assert_eq!(engine.pool().emissions(), 4 * BURST_WAVES as u64 + 1);
    }

    #[test]
    fn effects_retire_and_release_their_visuals() {
        let (mut engine, mut renderer) = running(quiet_config());
        let baseline = renderer.live_count();
        engine.spawn(&mut renderer, EffectKind::Confetti, Vec3::ZERO, Some(50));
        assert_eq!(renderer.live_count(), baseline + 50);

        for _ in 0..100 {
            engine.update(&mut renderer, 1.0 / 60.0);
        }
        assert_eq!(engine.pool().count(EffectKind::Confetti), 0);
        assert_eq!(renderer.live_count(), baseline);
    }

    #[test]
    fn teardown_is_idempotent_and_cancels_pending_waves() {
        let (mut engine, mut renderer) = running(quiet_config());
        engine.spawn(&mut renderer, EffectKind::HeartBurst, Vec3::ONE, None);
        engine.fire_burst();
        engine.update(&mut renderer, 0.0);
        assert!(engine.pending_tasks() > 0);

        assert!(engine.teardown(&mut renderer));
        assert!(!engine.teardown(&mut renderer));
        assert_eq!(engine.pending_tasks(), 0);
        assert_eq!(renderer.live_count(), 0);
        assert_eq!(renderer.disposed.len(), renderer.created);

        assert_eq!(engine.update(&mut renderer, 1.0), 0);
        assert_eq!(engine.spawn(&mut renderer, EffectKind::Firework, Vec3::ZERO, None), None);
        assert_eq!(renderer.live_count(), 0);
    }

    #[test]
    fn teardown_before_initialize_leaves_nothing_behind() {
        let mut engine = CelebrationEngine::new(quiet_config(), Some(3));
        let mut renderer = RecordingRenderer::default();
        assert!(engine.teardown(&mut renderer));
        assert!(!engine.initialize(&mut renderer));
        assert_eq!(renderer.created, 0);
    }

    #[test]
    fn pointer_moves_the_camera() {
        let (mut engine, mut renderer) = running(quiet_config());
        engine.set_pointer(Vec2::new(0.5, 0.5));
        for _ in 0..200 {
            engine.update(&mut renderer, 1.0 / 60.0);
        }
        approx::assert_relative_eq!(engine.camera().position().x, 1.0, epsilon = 1e-3);
        approx::assert_relative_eq!(engine.camera().position().y, -1.0, epsilon = 1e-3);
    }
}
