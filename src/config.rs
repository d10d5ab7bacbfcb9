// Scene configuration, fixed at engine construction.
// Defaults come from constants.rs; tests and alternate scenes override fields directly.
use bevy::prelude::*;

use crate::constants::*;

#[derive(Clone, Debug)]
pub struct ConfettiConfig {
    pub default_count: usize,
    pub burst_count: usize,
    pub radial_speed: (f32, f32),
    pub vertical_speed: (f32, f32),
    pub gravity: f32,
    pub max_spin: f32,
    pub decay_rate: f32,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            default_count: CONFETTI_DEFAULT_COUNT,
            burst_count: CONFETTI_BURST_COUNT,
            radial_speed: (CONFETTI_RADIAL_SPEED_MIN, CONFETTI_RADIAL_SPEED_MAX),
            vertical_speed: (CONFETTI_VERTICAL_SPEED_MIN, CONFETTI_VERTICAL_SPEED_MAX),
            gravity: CONFETTI_GRAVITY,
            max_spin: CONFETTI_MAX_SPIN,
            decay_rate: CONFETTI_DECAY_RATE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FireworkConfig {
    pub points: (usize, usize),
    pub speed: (f32, f32),
    pub gravity: f32,
    pub decay_rate: f32,
}

impl Default for FireworkConfig {
    fn default() -> Self {
        Self {
            points: (FIREWORK_POINTS_MIN, FIREWORK_POINTS_MAX),
            speed: (FIREWORK_SPEED_MIN, FIREWORK_SPEED_MAX),
            gravity: FIREWORK_GRAVITY,
            decay_rate: FIREWORK_DECAY_RATE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BlastRingConfig {
    pub max_scale: f32,
    pub decay_rate: f32,
}

impl Default for BlastRingConfig {
    fn default() -> Self {
        Self {
            max_scale: BLAST_RING_MAX_SCALE,
            decay_rate: BLAST_RING_DECAY_RATE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HeartBurstConfig {
    pub count: usize,
    pub radial_speed: f32,
    pub vertical_speed_max: f32,
    pub gravity: f32,
    pub max_spin: f32,
    pub decay_rate: f32,
}

impl Default for HeartBurstConfig {
    fn default() -> Self {
        Self {
            count: HEART_BURST_COUNT,
            radial_speed: HEART_BURST_RADIAL_SPEED,
            vertical_speed_max: HEART_BURST_VERTICAL_SPEED_MAX,
            gravity: HEART_BURST_GRAVITY,
            max_spin: HEART_BURST_MAX_SPIN,
            decay_rate: HEART_BURST_DECAY_RATE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AmbientConfig {
    pub count: usize,
    pub half_extent: f32,
    pub drift_max: f32,
    pub rise: (f32, f32),
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            count: AMBIENT_PARTICLE_COUNT,
            half_extent: AMBIENT_HALF_EXTENT,
            drift_max: AMBIENT_DRIFT_MAX,
            rise: (AMBIENT_RISE_MIN, AMBIENT_RISE_MAX),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DecorationConfig {
    pub count: usize,
    pub area_half_extents: Vec3,
    pub scale: (f32, f32),
    pub max_spin: f32,
    pub float_speed: (f32, f32),
    pub amplitude: f32,
    /// `None` disables the breathing scale on the pooled decorations.
    pub pulse_speed: Option<(f32, f32)>,
    pub pulse_depth: f32,
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            count: FLOATING_HEART_COUNT,
            area_half_extents: Vec3::from_array(FLOATING_AREA_HALF_EXTENTS),
            scale: (FLOATING_SCALE_MIN, FLOATING_SCALE_MAX),
            max_spin: FLOATING_MAX_SPIN,
            float_speed: (FLOATING_SPEED_MIN, FLOATING_SPEED_MAX),
            amplitude: FLOATING_AMPLITUDE,
            pulse_speed: Some((FLOATING_PULSE_SPEED_MIN, FLOATING_PULSE_SPEED_MAX)),
            pulse_depth: FLOATING_PULSE_DEPTH,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExplosionConfig {
    pub interval_secs: f32,
    pub probability: f32,
    pub bounds: Vec3,
    pub burst_repeat: usize,
    pub burst_stagger_secs: f32,
    pub burst_bounds: Vec3,
    pub burst_shake: f32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            interval_secs: EXPLOSION_INTERVAL_SECS,
            probability: EXPLOSION_PROBABILITY,
            bounds: Vec3::from_array(EXPLOSION_BOUNDS),
            burst_repeat: BURST_REPEAT_COUNT,
            burst_stagger_secs: BURST_STAGGER_SECS,
            burst_bounds: Vec3::from_array(BURST_BOUNDS),
            burst_shake: BURST_SHAKE_INTENSITY,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub distance: f32,
    pub lerp_factor: f32,
    pub pointer_gain: f32,
    pub shake_decay: f32,
    pub shake_floor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: CAMERA_DISTANCE,
            lerp_factor: CAMERA_LERP_FACTOR,
            pointer_gain: CAMERA_POINTER_GAIN,
            shake_decay: SHAKE_DECAY,
            shake_floor: SHAKE_FLOOR,
        }
    }
}

/// Every tunable of the scene, grouped per component.
#[derive(Resource, Clone, Debug, Default)]
pub struct SceneConfig {
    pub confetti: ConfettiConfig,
    pub firework: FireworkConfig,
    pub blast_ring: BlastRingConfig,
    pub heart_burst: HeartBurstConfig,
    pub ambient: AmbientConfig,
    pub decorations: DecorationConfig,
    pub explosions: ExplosionConfig,
    pub camera: CameraConfig,
}
