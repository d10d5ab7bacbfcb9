// Floating hearts: a fixed pool of small bobbing hearts plus one central heart.
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::config::DecorationConfig;
use crate::constants::*;
use crate::math_utils::{between, hex_color, random_in_box, random_spin};
use crate::renderer::{MaterialDescriptor, RenderHandle, Renderer, ShapeDescriptor};

/// Breathing scale: `1 + sin(t·speed + phase) × depth`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    pub speed: f32,
    pub depth: f32,
}

#[derive(Debug)]
pub struct FloatingDecoration {
    pub anchor: Vec3,
    pub base_scale: Vec3,
    pub rotation: Vec3,
    pub angular_velocity: Vec3,
    pub float_amplitude: f32,
    pub float_speed: f32,
    pub float_offset: f32,
    pub pulse: Option<Pulse>,
    position: Vec3,
    scale: Vec3,
    handle: Option<RenderHandle>,
}

impl FloatingDecoration {
    fn random(config: &DecorationConfig, rng: &mut impl Rng) -> Self {
        let s = between(rng, config.scale);
        let t = between(rng, config.scale);
        let base_scale = Vec3::new(s, t, FLOATING_DEPTH_SCALE);
        let anchor = random_in_box(rng, config.area_half_extents);

        Self {
            anchor,
            base_scale,
            rotation: Vec3::new(
                rng.gen_range(0.0..PI),
                rng.gen_range(0.0..PI),
                rng.gen_range(0.0..PI),
            ),
            angular_velocity: random_spin(rng, config.max_spin),
            float_amplitude: config.amplitude,
            float_speed: between(rng, config.float_speed),
            float_offset: rng.gen_range(0.0..TAU),
            pulse: config.pulse_speed.map(|range| Pulse {
                speed: between(rng, range),
                depth: config.pulse_depth,
            }),
            position: anchor,
            scale: base_scale,
            handle: None,
        }
    }

    pub fn step(&mut self, time: f32) {
        self.rotation += self.angular_velocity;
        self.position = self.anchor + Vec3::Y * self.float_offset_at(time);
        self.scale = self.base_scale * self.pulse_factor_at(time);
    }

    pub fn float_offset_at(&self, time: f32) -> f32 {
        (time * self.float_speed + self.float_offset).sin() * self.float_amplitude
    }

    pub fn pulse_factor_at(&self, time: f32) -> f32 {
        match self.pulse {
            Some(pulse) => 1.0 + (time * pulse.speed + self.float_offset).sin() * pulse.depth,
            None => 1.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    fn sync(&self, renderer: &mut impl Renderer) {
        if let Some(handle) = &self.handle {
            renderer.set_position(handle, self.position);
            renderer.set_rotation(handle, self.rotation);
            renderer.set_scale(handle, self.scale);
        }
    }
}

/// The large heart at the origin. Same motion family, absolute rotation driven by time.
#[derive(Debug)]
pub struct CentralDecoration {
    pub base_scale: f32,
    pub spin_speed: f32,
    pub sway: f32,
    pub float_speed: f32,
    pub float_amplitude: f32,
    pub pulse: Pulse,
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    handle: Option<RenderHandle>,
}

impl Default for CentralDecoration {
    fn default() -> Self {
        Self {
            base_scale: CENTRAL_HEART_SCALE,
            spin_speed: CENTRAL_HEART_SPIN_SPEED,
            sway: CENTRAL_HEART_SWAY,
            float_speed: CENTRAL_HEART_FLOAT_SPEED,
            float_amplitude: CENTRAL_HEART_FLOAT_AMPLITUDE,
            pulse: Pulse {
                speed: CENTRAL_HEART_PULSE_SPEED,
                depth: CENTRAL_HEART_PULSE_DEPTH,
            },
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::splat(CENTRAL_HEART_SCALE),
            handle: None,
        }
    }
}

impl CentralDecoration {
    pub fn step(&mut self, time: f32) {
        self.rotation = Vec3::new(0.0, time * self.spin_speed, time.sin() * self.sway);
        self.position = Vec3::Y * (time * self.float_speed).sin() * self.float_amplitude;
        let factor = 1.0 + (time * self.pulse.speed).sin() * self.pulse.depth;
        self.scale = Vec3::splat(self.base_scale * factor);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }
}

pub struct FloatingDecorations {
    hearts: Vec<FloatingDecoration>,
    central: CentralDecoration,
}

impl FloatingDecorations {
    pub fn new(config: &DecorationConfig, rng: &mut impl Rng) -> Self {
        Self {
            hearts: (0..config.count)
                .map(|_| FloatingDecoration::random(config, rng))
                .collect(),
            central: CentralDecoration::default(),
        }
    }

    pub fn attach(&mut self, renderer: &mut impl Renderer) {
        let material = MaterialDescriptor::solid(hex_color(COLOR_DEEP_PINK), FLOATING_HEART_OPACITY)
            .with_emissive(hex_color(COLOR_HOT_PINK), FLOATING_HEART_EMISSIVE_INTENSITY);
        for heart in self.hearts.iter_mut().filter(|h| h.handle.is_none()) {
            let handle = renderer.create_solid(
                ShapeDescriptor::Heart {
                    depth: FLOATING_HEART_DEPTH,
                },
                material,
            );
            renderer.attach(&handle);
            heart.handle = Some(handle);
            heart.sync(renderer);
        }

        if self.central.handle.is_none() {
            let material = MaterialDescriptor::solid(hex_color(COLOR_RUBY), CENTRAL_HEART_OPACITY)
                .with_emissive(hex_color(COLOR_DEEP_PINK), CENTRAL_HEART_EMISSIVE_INTENSITY);
            let handle = renderer.create_solid(
                ShapeDescriptor::Heart {
                    depth: CENTRAL_HEART_DEPTH,
                },
                material,
            );
            renderer.set_scale(&handle, self.central.scale);
            renderer.attach(&handle);
            self.central.handle = Some(handle);
        }
    }

    pub fn step(&mut self, time: f32) {
        for heart in &mut self.hearts {
            heart.step(time);
        }
        self.central.step(time);
    }

    pub fn sync(&self, renderer: &mut impl Renderer) {
        for heart in &self.hearts {
            heart.sync(renderer);
        }
        if let Some(handle) = &self.central.handle {
            renderer.set_position(handle, self.central.position);
            renderer.set_rotation(handle, self.central.rotation);
            renderer.set_scale(handle, self.central.scale);
        }
    }

    pub fn dispose(&mut self, renderer: &mut impl Renderer) {
        let handles = self
            .hearts
            .iter_mut()
            .filter_map(|h| h.handle.take())
            .chain(self.central.handle.take());
        for handle in handles {
            renderer.detach(&handle);
            renderer.dispose(handle);
        }
    }

    pub fn hearts(&self) -> &[FloatingDecoration] {
        &self.hearts
    }

    pub fn central(&self) -> &CentralDecoration {
        &self.central
    }
}
