//! Spawn-time constructors for the four transient effect variants and their per-tick motion rules.
//!
//! Emitters are pure: they turn an RNG, an origin and a config into [`EffectSeed`]s. The pool
//! turns seeds into live instances by asking the renderer for a visual.
use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::config::SceneConfig;
use crate::constants::*;
use crate::math_utils::{between, hex_color, random_spin, spherical_direction};
use crate::renderer::{MaterialDescriptor, ShapeDescriptor};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Confetti,
    Firework,
    BlastRing,
    HeartBurst,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Confetti,
        EffectKind::Firework,
        EffectKind::BlastRing,
        EffectKind::HeartBurst,
    ];

    pub fn index(self) -> usize {
        match self {
            EffectKind::Confetti => 0,
            EffectKind::Firework => 1,
            EffectKind::BlastRing => 2,
            EffectKind::HeartBurst => 3,
        }
    }

    /// Opacity at full life. Rendered opacity is `life × peak_opacity`.
    pub fn peak_opacity(self) -> f32 {
        match self {
            EffectKind::Confetti | EffectKind::Firework => 1.0,
            EffectKind::BlastRing => BLAST_RING_OPACITY,
            EffectKind::HeartBurst => HEART_BURST_OPACITY,
        }
    }

    pub fn decay_rate(self, config: &SceneConfig) -> f32 {
        match self {
            EffectKind::Confetti => config.confetti.decay_rate,
            EffectKind::Firework => config.firework.decay_rate,
            EffectKind::BlastRing => config.blast_ring.decay_rate,
            EffectKind::HeartBurst => config.heart_burst.decay_rate,
        }
    }
}

/// A rigid body that flies, falls and spins. Used by confetti and heart-burst minis.
#[derive(Clone, Debug, PartialEq)]
pub struct Tumbler {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Vec3,
    pub angular_velocity: Vec3,
    pub gravity: f32,
}

impl Tumbler {
    fn advance(&mut self) {
        self.position += self.velocity;
        self.velocity.y -= self.gravity;
        self.rotation += self.angular_velocity;
    }
}

/// One point cloud, every point with its own velocity.
#[derive(Clone, Debug, PartialEq)]
pub struct SparkCloud {
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub gravity: f32,
}

impl SparkCloud {
    fn advance(&mut self) {
        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *position += *velocity;
            velocity.y -= self.gravity;
        }
    }
}

/// Expanding ring. Its radius is a pure function of life.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    pub position: Vec3,
    pub max_scale: f32,
}

impl Ring {
    pub fn scale_at(&self, life: f32) -> f32 {
        (1.0 - life) * self.max_scale
    }
}

/// Variant-tagged state of one effect instance.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectState {
    Confetti(Tumbler),
    Firework(SparkCloud),
    BlastRing(Ring),
    HeartBurst(Tumbler),
}

impl EffectState {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectState::Confetti(_) => EffectKind::Confetti,
            EffectState::Firework(_) => EffectKind::Firework,
            EffectState::BlastRing(_) => EffectKind::BlastRing,
            EffectState::HeartBurst(_) => EffectKind::HeartBurst,
        }
    }

    /// Per-tick integration. The ring has no motion of its own.
    pub fn advance(&mut self) {
        match self {
            EffectState::Confetti(body) | EffectState::HeartBurst(body) => body.advance(),
            EffectState::Firework(cloud) => cloud.advance(),
            EffectState::BlastRing(_) => {}
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    Solid {
        shape: ShapeDescriptor,
        material: MaterialDescriptor,
        scale: Vec3,
    },
    Cloud {
        material: MaterialDescriptor,
        colors: Vec<Color>,
    },
}

/// Everything the pool needs to bring one instance to life.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectSeed {
    pub state: EffectState,
    pub visual: Visual,
}

impl EffectSeed {
    pub fn kind(&self) -> EffectKind {
        self.state.kind()
    }
}

/// Dispatches to the emitter for `kind`. `count` only applies to confetti.
pub fn emit(
    kind: EffectKind,
    rng: &mut impl Rng,
    config: &SceneConfig,
    origin: Vec3,
    count: Option<usize>,
) -> Vec<EffectSeed> {
    match kind {
        EffectKind::Confetti => {
            let count = count.unwrap_or(config.confetti.default_count);
            emit_confetti(rng, config, origin, count)
        }
        EffectKind::Firework => vec![emit_firework(rng, config, origin)],
        EffectKind::BlastRing => vec![emit_blast_ring(config, origin)],
        EffectKind::HeartBurst => emit_heart_burst(rng, config, origin),
    }
}

pub fn emit_confetti(rng: &mut impl Rng, config: &SceneConfig, origin: Vec3, count: usize) -> Vec<EffectSeed> {
    let params = &config.confetti;
    let shape = ShapeDescriptor::Box {
        size: Vec3::from_array(CONFETTI_SIZE),
    };

    (0..count)
        .map(|_| {
            let color = pick_color(rng, &CONFETTI_PALETTE);
            let emissive = pick_color(rng, &CONFETTI_PALETTE);
            let angle = rng.gen_range(0.0..TAU);
            let speed = between(rng, params.radial_speed);
            let velocity = Vec3::new(
                angle.cos() * speed,
                between(rng, params.vertical_speed),
                angle.sin() * speed,
            );

            EffectSeed {
                state: EffectState::Confetti(Tumbler {
                    position: origin,
                    velocity,
                    rotation: Vec3::ZERO,
                    angular_velocity: random_spin(rng, params.max_spin),
                    gravity: params.gravity,
                }),
                visual: Visual::Solid {
                    shape,
                    material: MaterialDescriptor::solid(color, 1.0)
                        .with_emissive(emissive, CONFETTI_EMISSIVE_INTENSITY),
                    scale: Vec3::ONE,
                },
            }
        })
        .collect()
}

pub fn emit_firework(rng: &mut impl Rng, config: &SceneConfig, origin: Vec3) -> EffectSeed {
    let params = &config.firework;
    let (min_points, max_points) = params.points;
    let point_count = if max_points > min_points {
        rng.gen_range(min_points..=max_points)
    } else {
        min_points
    };
    let base_color = pick_color(rng, &[COLOR_DEEP_PINK, COLOR_HOT_PINK]);

    let velocities = (0..point_count)
        .map(|_| {
            let theta = rng.gen_range(0.0..TAU);
            let phi = rng.gen_range(0.0..=PI);
            spherical_direction(theta, phi) * between(rng, params.speed)
        })
        .collect();

    EffectSeed {
        state: EffectState::Firework(SparkCloud {
            positions: vec![origin; point_count],
            velocities,
            gravity: params.gravity,
        }),
        visual: Visual::Cloud {
            material: MaterialDescriptor::solid(Color::WHITE, 1.0).additive(),
            colors: vec![base_color; point_count],
        },
    }
}

pub fn emit_blast_ring(config: &SceneConfig, origin: Vec3) -> EffectSeed {
    let ring = Ring {
        position: origin,
        max_scale: config.blast_ring.max_scale,
    };
    let scale = Vec3::splat(ring.scale_at(1.0));

    EffectSeed {
        state: EffectState::BlastRing(ring),
        visual: Visual::Solid {
            shape: ShapeDescriptor::Torus {
                major_radius: BLAST_RING_MAJOR_RADIUS,
                minor_radius: BLAST_RING_MINOR_RADIUS,
            },
            material: MaterialDescriptor::solid(hex_color(COLOR_DEEP_PINK), BLAST_RING_OPACITY).unlit(),
            scale,
        },
    }
}

pub fn emit_heart_burst(rng: &mut impl Rng, config: &SceneConfig, origin: Vec3) -> Vec<EffectSeed> {
    let params = &config.heart_burst;
    let count = params.count;

    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            let velocity = Vec3::new(
                angle.cos() * params.radial_speed,
                between(rng, (0.0, params.vertical_speed_max)),
                angle.sin() * params.radial_speed,
            );
            let color = pick_color(rng, &[COLOR_DEEP_PINK, COLOR_HOT_PINK]);

            EffectSeed {
                state: EffectState::HeartBurst(Tumbler {
                    position: origin,
                    velocity,
                    rotation: Vec3::ZERO,
                    angular_velocity: random_spin(rng, params.max_spin),
                    gravity: params.gravity,
                }),
                visual: Visual::Solid {
                    shape: ShapeDescriptor::Heart {
                        depth: HEART_BURST_DEPTH,
                    },
                    material: MaterialDescriptor::solid(color, HEART_BURST_OPACITY)
                        .with_emissive(hex_color(COLOR_HOT_PINK), HEART_BURST_EMISSIVE_INTENSITY),
                    scale: Vec3::splat(HEART_BURST_SCALE),
                },
            }
        })
        .collect()
}

fn pick_color(rng: &mut impl Rng, palette: &[u32]) -> Color {
    palette
        .choose(rng)
        .map(|&rgb| hex_color(rgb))
        .unwrap_or(Color::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tumbler(seed: &EffectSeed) -> &Tumbler {
        match &seed.state {
            EffectState::Confetti(body) | EffectState::HeartBurst(body) => body,
            other => panic!("expected a tumbler, got {:?}", other.kind()),
        }
    }

    #[test]
    fn confetti_velocities_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = SceneConfig::default();
        let seeds = emit(EffectKind::Confetti, &mut rng, &config, Vec3::ZERO, None);
        assert_eq!(seeds.len(), CONFETTI_DEFAULT_COUNT);

        for seed in &seeds {
            let body = tumbler(seed);
            let radial = Vec2::new(body.velocity.x, body.velocity.z).length();
            assert!((0.2 - 1e-5..=0.5 + 1e-5).contains(&radial), "radial speed {radial}");
            assert!((0.3..=0.8).contains(&body.velocity.y));
            assert!(body.angular_velocity.abs().max_element() <= 0.15);
        }
    }

    #[test]
    fn confetti_count_is_overridable_and_zero_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(4);
        let config = SceneConfig::default();
        assert_eq!(emit(EffectKind::Confetti, &mut rng, &config, Vec3::ZERO, Some(80)).len(), 80);
        assert!(emit(EffectKind::Confetti, &mut rng, &config, Vec3::ZERO, Some(0)).is_empty());
    }

    #[test]
    fn confetti_tick_applies_velocity_then_gravity() {
        let mut state = EffectState::Confetti(Tumbler {
            position: Vec3::ZERO,
            velocity: Vec3::new(0.1, 0.5, 0.0),
            rotation: Vec3::ZERO,
            angular_velocity: Vec3::new(0.1, 0.0, -0.1),
            gravity: CONFETTI_GRAVITY,
        });
        state.advance();
        state.advance();

        let EffectState::Confetti(body) = state else {
            unreachable!()
        };
        assert_relative_eq!(body.position.x, 0.2, epsilon = 1e-6);
        assert_relative_eq!(body.position.y, 0.5 + 0.49, epsilon = 1e-6);
        assert_relative_eq!(body.velocity.y, 0.48, epsilon = 1e-6);
        assert_relative_eq!(body.rotation.z, -0.2, epsilon = 1e-6);
    }

    #[test]
    fn firework_is_a_single_cloud_with_bounded_speeds() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = SceneConfig::default();
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let seeds = emit(EffectKind::Firework, &mut rng, &config, origin, Some(999));
        assert_eq!(seeds.len(), 1);

        let EffectState::Firework(cloud) = &seeds[0].state else {
            panic!("expected firework");
        };
        assert!((100..=120).contains(&cloud.positions.len()));
        assert_eq!(cloud.positions.len(), cloud.velocities.len());
        assert!(cloud.positions.iter().all(|p| *p == origin));
        for v in &cloud.velocities {
            let speed = v.length();
            assert!((0.1 - 1e-5..=0.25 + 1e-5).contains(&speed), "speed {speed}");
        }
        let Visual::Cloud { colors, .. } = &seeds[0].visual else {
            panic!("expected cloud visual");
        };
        assert_eq!(colors.len(), cloud.positions.len());
    }

    #[test]
    fn firework_gravity_pulls_every_point() {
        let mut cloud = SparkCloud {
            positions: vec![Vec3::ZERO; 2],
            velocities: vec![Vec3::new(0.1, 0.0, 0.0), Vec3::new(0.0, 0.2, 0.0)],
            gravity: FIREWORK_GRAVITY,
        };
        cloud.advance();
        assert_relative_eq!(cloud.positions[0].x, 0.1);
        assert_relative_eq!(cloud.positions[1].y, 0.2);
        assert_relative_eq!(cloud.velocities[0].y, -0.003);
        assert_relative_eq!(cloud.velocities[1].y, 0.197, epsilon = 1e-6);
    }

    #[test]
    fn blast_ring_grows_as_life_drains() {
        let config = SceneConfig::default();
        let EffectState::BlastRing(ring) = emit_blast_ring(&config, Vec3::ZERO).state else {
            panic!("expected ring");
        };
        assert_eq!(ring.scale_at(1.0), 0.0);
        assert_relative_eq!(ring.scale_at(0.5), 4.0);
        assert_relative_eq!(ring.scale_at(0.0), 8.0);
    }

    #[test]
    fn heart_burst_spreads_evenly_around_the_origin() {
        let mut rng = StdRng::seed_from_u64(6);
        let config = SceneConfig::default();
        let seeds = emit(EffectKind::HeartBurst, &mut rng, &config, Vec3::ZERO, None);
        assert_eq!(seeds.len(), 12);

        for (i, seed) in seeds.iter().enumerate() {
            let body = tumbler(seed);
            let angle = i as f32 / 12.0 * TAU;
            assert_relative_eq!(body.velocity.x, angle.cos() * 0.15, epsilon = 1e-6);
            assert_relative_eq!(body.velocity.z, angle.sin() * 0.15, epsilon = 1e-6);
            assert!((0.0..=0.2).contains(&body.velocity.y));
            assert!(body.angular_velocity.abs().max_element() <= 0.1);
        }
    }

    #[test]
    fn peak_opacity_matches_variant() {
        assert_eq!(EffectKind::Confetti.peak_opacity(), 1.0);
        assert_eq!(EffectKind::Firework.peak_opacity(), 1.0);
        assert_eq!(EffectKind::BlastRing.peak_opacity(), 0.8);
        assert_eq!(EffectKind::HeartBurst.peak_opacity(), 0.9);
    }
}
