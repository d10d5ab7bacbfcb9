// Explosion orchestration: a periodic random trigger and the staggered "burst" sequence.
// Both only decide what to spawn and where; the engine feeds the results to the emitters.
use bevy::prelude::*;
use rand::Rng;

use crate::config::ExplosionConfig;
use crate::emitters::EffectKind;
use crate::math_utils::random_in_box;
use crate::scheduler::{Scheduler, TaskHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionTask {
    RandomTrigger,
    BurstWave { wave: usize },
}

/// A request for one emitter invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub kind: EffectKind,
    pub position: Vec3,
    pub count: Option<usize>,
}

pub struct ExplosionScheduler {
    config: ExplosionConfig,
    burst_confetti_count: usize,
    timer: Option<TaskHandle>,
    pending_waves: Vec<TaskHandle>,
}

impl ExplosionScheduler {
    pub fn new(config: &ExplosionConfig, burst_confetti_count: usize) -> Self {
        Self {
            config: config.clone(),
            burst_confetti_count,
            timer: None,
            pending_waves: Vec::new(),
        }
    }

    /// Registers the periodic trigger. Idempotent.
    pub fn start<T>(&mut self, scheduler: &mut Scheduler<T>)
    where
        T: Clone + From<ExplosionTask>,
    {
        if self.timer.is_none() {
            let handle = scheduler.subscribe_periodic(
                f64::from(self.config.interval_secs),
                ExplosionTask::RandomTrigger.into(),
            );
            self.timer = Some(handle);
        }
    }

    /// Cancels the periodic trigger and any burst waves not yet fired.
    pub fn stop<T: Clone>(&mut self, scheduler: &mut Scheduler<T>) {
        if let Some(timer) = self.timer.take() {
            scheduler.cancel(timer);
        }
        let cancelled = self
            .pending_waves
            .drain(..)
            .filter(|&wave| scheduler.cancel(wave))
            .count();
        if cancelled > 0 {
            debug!("Cancelled {} pending burst waves", cancelled);
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// One firing of the periodic timer: with probability `p`, one random variant at a random spot.
    pub fn roll(&self, rng: &mut impl Rng) -> Option<SpawnRequest> {
        if rng.gen::<f32>() >= self.config.probability {
            return None;
        }
        let kind = EffectKind::ALL[rng.gen_range(0..EffectKind::ALL.len())];
        Some(SpawnRequest {
            kind,
            position: random_in_box(rng, self.config.bounds),
            count: None,
        })
    }

    /// Schedules the staggered waves of a burst sequence and returns the shake intensity the
    /// caller must request, once, for the whole sequence.
    pub fn trigger_burst<T>(&mut self, scheduler: &mut Scheduler<T>) -> f32
    where
        T: Clone + From<ExplosionTask>,
    {
        self.pending_waves.retain(|&wave| scheduler.is_pending(wave));

        for wave in 0..self.config.burst_repeat {
            // f64 so wave k lands on the same instant as k stagger-sized clock advances.
            let delay = f64::from(self.config.burst_stagger_secs) * wave as f64;
            let handle = scheduler.subscribe_once(delay, ExplosionTask::BurstWave { wave }.into());
            self.pending_waves.push(handle);
        }

        info!(
            "Burst sequence: {} waves, {:.0}ms apart",
            self.config.burst_repeat,
            self.config.burst_stagger_secs * 1000.0
        );
        self.config.burst_shake
    }

    /// Every variant at one shared random position.
    pub fn burst_wave(&self, rng: &mut impl Rng) -> [SpawnRequest; 4] {
        let position = random_in_box(rng, self.config.burst_bounds);
        EffectKind::ALL.map(|kind| SpawnRequest {
            kind,
            position,
            count: (kind == EffectKind::Confetti).then_some(self.burst_confetti_count),
        })
    }

    pub fn pending_waves(&self) -> usize {
        self.pending_waves.len()
    }
}
