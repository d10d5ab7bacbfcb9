//! Live set of transient effect instances.
//!
//! Instances are stored unordered. Retirement walks the vector backwards and swap-removes, so the
//! element moved into a freed slot has already been stepped this tick and is never visited twice.
use bevy::prelude::*;

use crate::config::SceneConfig;
use crate::emitters::{EffectKind, EffectSeed, EffectState, Visual};
use crate::renderer::{RenderHandle, Renderer};

/// One live effect. Owns its render handle until retirement.
#[derive(Debug)]
pub struct EffectInstance {
    state: EffectState,
    age: u32,
    life: f32,
    decay_rate: f32,
    handle: RenderHandle,
}

impl EffectInstance {
    pub fn kind(&self) -> EffectKind {
        self.state.kind()
    }

    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Opacity derived from life, clamped to `[0, peak_opacity]`.
    pub fn opacity(&self) -> f32 {
        self.life.clamp(0.0, 1.0) * self.kind().peak_opacity()
    }

    /// Advances motion and drains life by one tick.
    ///
    /// Life is recomputed from the integer age so that the retirement tick is exact,
    /// e.g. a decay of 0.01 retires on tick 100 rather than drifting to 101.
    fn step(&mut self) {
        self.state.advance();
        self.age += 1;
        self.life = 1.0 - self.age as f32 * self.decay_rate;
    }

    fn sync(&self, renderer: &mut impl Renderer) {
        let handle = &self.handle;
        match &self.state {
            EffectState::Confetti(body) | EffectState::HeartBurst(body) => {
                renderer.set_position(handle, body.position);
                renderer.set_rotation(handle, body.rotation);
            }
            EffectState::Firework(cloud) => {
                renderer.update_positions(handle, &cloud.positions);
            }
            EffectState::BlastRing(ring) => {
                renderer.set_scale(handle, Vec3::splat(ring.scale_at(self.life)));
            }
        }
        renderer.set_opacity(handle, self.opacity());
    }

    fn retire(self, renderer: &mut impl Renderer) {
        renderer.detach(&self.handle);
        renderer.dispose(self.handle);
    }
}

#[derive(Debug, Default)]
pub struct EffectPool {
    live: Vec<EffectInstance>,
    live_by_kind: [usize; 4],
    emissions: u64,
    retired: u64,
}

impl EffectPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materializes one emitter invocation. An empty seed list still counts as an emission.
    pub fn emit(&mut self, renderer: &mut impl Renderer, config: &SceneConfig, seeds: Vec<EffectSeed>) -> usize {
        self.emissions += 1;
        let spawned = seeds.len();
        for seed in seeds {
            self.spawn(renderer, config, seed);
        }
        spawned
    }

    /// Creates the visual for `seed`, attaches it and inserts the instance.
    pub fn spawn(&mut self, renderer: &mut impl Renderer, config: &SceneConfig, seed: EffectSeed) {
        let EffectSeed { state, visual } = seed;
        let kind = state.kind();

        let handle = match visual {
            Visual::Solid { shape, material, scale } => {
                let handle = renderer.create_solid(shape, material);
                renderer.set_scale(&handle, scale);
                handle
            }
            Visual::Cloud { material, colors } => {
                let point_count = colors.len();
                let handle = renderer.create_point_cloud(point_count, material);
                renderer.update_colors(&handle, &colors);
                handle
            }
        };

        let instance = EffectInstance {
            state,
            age: 0,
            life: 1.0,
            decay_rate: kind.decay_rate(config),
            handle,
        };
        instance.sync(renderer);
        renderer.attach(&instance.handle);

        self.live_by_kind[kind.index()] += 1;
        self.live.push(instance);
    }

    /// Steps every instance once; instances whose life reaches zero are disposed this tick.
    /// Returns the number retired.
    pub fn step_all(&mut self, renderer: &mut impl Renderer) -> usize {
        let mut retired = 0;
        for i in (0..self.live.len()).rev() {
            let instance = &mut self.live[i];
            instance.step();

            if instance.is_alive() {
                instance.sync(renderer);
            } else {
                let instance = self.live.swap_remove(i);
                self.live_by_kind[instance.kind().index()] -= 1;
                instance.retire(renderer);
                retired += 1;
            }
        }

        self.retired += retired as u64;
        retired
    }

    /// Force-releases every remaining instance.
    pub fn dispose_all(&mut self, renderer: &mut impl Renderer) -> usize {
        let count = self.live.len();
        for instance in self.live.drain(..) {
            instance.retire(renderer);
        }
        self.live_by_kind = [0; 4];
        self.retired += count as u64;
        count
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn count(&self, kind: EffectKind) -> usize {
        self.live_by_kind[kind.index()]
    }

    /// Emitter invocations since construction.
    pub fn emissions(&self) -> u64 {
        self.emissions
    }

    pub fn retired(&self) -> u64 {
        self.retired
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.live.iter()
    }
}
