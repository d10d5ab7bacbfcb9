// Persistent background particle cloud.
// Wrap is asymmetric on purpose: Y recycles from the bottom, X and Z re-seed anywhere in the extent.
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::AmbientConfig;
use crate::constants::{AMBIENT_CHUNK_SIZE, AMBIENT_OPACITY, COLOR_HOT_PINK};
use crate::math_utils::{between, hex_color, random_in_box, symmetric};
use crate::renderer::{MaterialDescriptor, RenderHandle, Renderer};

pub struct AmbientField {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    half_extent: f32,
    handle: Option<RenderHandle>,
}

impl AmbientField {
    pub fn new(config: &AmbientConfig, rng: &mut impl Rng) -> Self {
        let half = config.half_extent;
        let positions = (0..config.count)
            .map(|_| random_in_box(rng, Vec3::splat(half)))
            .collect();
        let velocities = (0..config.count)
            .map(|_| {
                Vec3::new(
                    symmetric(rng, config.drift_max),
                    between(rng, config.rise),
                    symmetric(rng, config.drift_max),
                )
            })
            .collect();

        Self {
            positions,
            velocities,
            half_extent: half,
            handle: None,
        }
    }

    /// Creates and attaches the point cloud. No-op if already attached.
    pub fn attach(&mut self, renderer: &mut impl Renderer) {
        if self.handle.is_some() {
            return;
        }
        let material = MaterialDescriptor::solid(hex_color(COLOR_HOT_PINK), AMBIENT_OPACITY).additive();
        let handle = renderer.create_point_cloud(self.positions.len(), material);
        renderer.update_colors(&handle, &vec![hex_color(COLOR_HOT_PINK); self.positions.len()]);
        renderer.update_positions(&handle, &self.positions);
        renderer.attach(&handle);
        self.handle = Some(handle);
    }

    /// Moves every particle one tick. Re-seeding draws come from per-chunk streams keyed by
    /// one value from `rng`, so the result is independent of how rayon splits the work.
    pub fn step(&mut self, rng: &mut impl Rng) {
        let half = self.half_extent;
        let base: u64 = rng.gen();
        self.positions
            .par_chunks_mut(AMBIENT_CHUNK_SIZE)
            .zip(self.velocities.par_chunks(AMBIENT_CHUNK_SIZE))
            .enumerate()
            .for_each(|(chunk, (positions, velocities))| {
                let mut chunk_rng = StdRng::seed_from_u64(base.wrapping_add(chunk as u64));
                for (position, velocity) in positions.iter_mut().zip(velocities) {
                    *position += *velocity;
                    wrap(position, half, &mut chunk_rng);
                }
            });
    }

    pub fn sync(&self, renderer: &mut impl Renderer) {
        if let Some(handle) = &self.handle {
            renderer.update_positions(handle, &self.positions);
        }
    }

    pub fn dispose(&mut self, renderer: &mut impl Renderer) {
        if let Some(handle) = self.handle.take() {
            renderer.detach(&handle);
            renderer.dispose(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }
}

fn wrap(position: &mut Vec3, half: f32, rng: &mut impl Rng) {
    if position.y > half {
        position.y = -half;
    }
    if position.x.abs() > half {
        position.x = symmetric(rng, half);
    }
    if position.z.abs() > half {
        position.z = symmetric(rng, half);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::testing::RecordingRenderer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(count: usize) -> AmbientField {
        let config = AmbientConfig {
            count,
            ..default()
        };
        AmbientField::new(&config, &mut StdRng::seed_from_u64(21))
    }

    #[test]
    fn population_is_constant_across_ticks() {
        let mut field = field(1500);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..3000 {
            field.step(&mut rng);
        }
        assert_eq!(field.len(), 1500);
        let half = field.half_extent();
        assert!(field
            .positions()
            .iter()
            .all(|p| p.x.abs() <= half && p.z.abs() <= half && p.y <= half));
    }

    #[test]
    fn vertical_overflow_teleports_to_the_bottom() {
        let mut field = field(1);
        let half = field.half_extent();
        field.positions[0] = Vec3::new(0.0, half + 0.001, 0.0);
        field.velocities[0] = Vec3::new(0.0, 0.01, 0.0);
        field.step(&mut StdRng::seed_from_u64(2));
        assert_eq!(field.positions[0].y, -half);
        assert_eq!(field.positions[0].x, 0.0);
    }

    #[test]
    fn horizontal_overflow_reseeds_instead_of_mirroring() {
        let mut rng = StdRng::seed_from_u64(5);
        let half = 15.0;
        let mut saw_interior = false;
        for _ in 0..64 {
            let mut p = Vec3::new(half + 0.001, 0.0, -(half + 0.001));
            wrap(&mut p, half, &mut rng);
            assert!(p.x.abs() <= half && p.z.abs() <= half);
            if p.x.abs() < half - 1.0 {
                saw_interior = true;
            }
        }
        assert!(saw_interior, "x was never re-sampled away from the edge");
    }

    #[test]
    fn same_seed_gives_identical_fields_after_wrapping() {
        // Drift this fast pushes every particle past the X/Z bounds on each tick.
        let config = AmbientConfig {
            count: 1000,
            drift_max: 40.0,
            ..default()
        };
        let mut a = AmbientField::new(&config, &mut StdRng::seed_from_u64(7));
        let mut b = AmbientField::new(&config, &mut StdRng::seed_from_u64(7));
        let mut rng_a = StdRng::seed_from_u64(8);
        let mut rng_b = StdRng::seed_from_u64(8);

        for _ in 0..5 {
            a.step(&mut rng_a);
            b.step(&mut rng_b);
        }
        assert_eq!(a.positions(), b.positions());

        let mut c = AmbientField::new(&config, &mut StdRng::seed_from_u64(7));
        c.step(&mut StdRng::seed_from_u64(9));
        let mut d = AmbientField::new(&config, &mut StdRng::seed_from_u64(7));
        d.step(&mut StdRng::seed_from_u64(8));
        assert_ne!(c.positions(), d.positions());
    }

    #[test]
    fn attach_and_dispose_manage_a_single_cloud() {
        let mut field = field(32);
        let mut renderer = RecordingRenderer::default();
        field.attach(&mut renderer);
        field.attach(&mut renderer);
        assert_eq!(renderer.created, 1);

        field.step(&mut StdRng::seed_from_u64(3));
        field.sync(&mut renderer);
        let record = renderer.live.values().next().expect("cloud is live");
        assert_eq!(record.positions.len(), 32);

        field.dispose(&mut renderer);
        field.dispose(&mut renderer);
        assert_eq!(renderer.disposed.len(), 1);
        assert_eq!(field.len(), 32);
    }
}
