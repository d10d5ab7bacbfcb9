// Pointer parallax plus decaying screen shake. The camera always looks at the origin.
use bevy::prelude::*;
use rand::Rng;

use crate::config::CameraConfig;
use crate::math_utils::symmetric;

#[derive(Debug, Clone)]
pub struct CameraRig {
    position: Vec3,
    pointer: Vec2,
    shake_intensity: f32,
    shake_requests: u64,
    config: CameraConfig,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, config.distance),
            pointer: Vec2::ZERO,
            shake_intensity: 0.0,
            shake_requests: 0,
            config: config.clone(),
        }
    }

    /// Normalized pointer position, each axis in `[-0.5, 0.5]`.
    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer.clamp(Vec2::splat(-0.5), Vec2::splat(0.5));
    }

    /// Raises the shake to `intensity`; a weaker request never lowers an ongoing shake.
    pub fn request_shake(&mut self, intensity: f32) {
        self.shake_requests += 1;
        self.shake_intensity = self.shake_intensity.max(intensity);
    }

    pub fn pointer_target(&self) -> Vec2 {
        Vec2::new(self.pointer.x, -self.pointer.y) * self.config.pointer_gain
    }

    pub fn step(&mut self, rng: &mut impl Rng) {
        if self.shake_intensity > 0.0 {
            let half = self.shake_intensity / 2.0;
            self.position.x += symmetric(rng, half);
            self.position.y += symmetric(rng, half);
            self.shake_intensity *= self.config.shake_decay;
            if self.shake_intensity < self.config.shake_floor {
                self.shake_intensity = 0.0;
            }
        }

        let target = self.pointer_target();
        self.position.x += (target.x - self.position.x) * self.config.lerp_factor;
        self.position.y += (target.y - self.position.y) * self.config.lerp_factor;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_target(&self) -> Vec3 {
        Vec3::ZERO
    }

    pub fn shake_intensity(&self) -> f32 {
        self.shake_intensity
    }

    pub fn shake_requests(&self) -> u64 {
        self.shake_requests
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.look_target(), Vec3::Y)
    }
}
