use bevy::prelude::*;
use rand::Rng;

/// Uniform sample in `[-half, half)`. A zero half-width yields 0 instead of an empty range.
#[inline]
pub fn symmetric(rng: &mut impl Rng, half: f32) -> f32 {
    if half > 0.0 {
        rng.gen_range(-half..half)
    } else {
        0.0
    }
}

/// Uniform sample in `[min, max)`, tolerating a degenerate range.
#[inline]
pub fn between(rng: &mut impl Rng, (min, max): (f32, f32)) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Uniform point inside an axis-aligned box centred on the origin.
pub fn random_in_box(rng: &mut impl Rng, half_extents: Vec3) -> Vec3 {
    Vec3::new(
        symmetric(rng, half_extents.x),
        symmetric(rng, half_extents.y),
        symmetric(rng, half_extents.z),
    )
}

/// Independent per-axis spin in `[-max, max)`.
pub fn random_spin(rng: &mut impl Rng, max: f32) -> Vec3 {
    random_in_box(rng, Vec3::splat(max))
}

/// Unit vector from polar angles, `theta` around the vertical plane and `phi` from +Z.
#[inline]
pub fn spherical_direction(theta: f32, phi: f32) -> Vec3 {
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// sRGB colour from a packed 0xRRGGBB value.
pub fn hex_color(rgb: u32) -> Color {
    Color::srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn symmetric_handles_zero_width() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(symmetric(&mut rng, 0.0), 0.0);
        assert_eq!(between(&mut rng, (0.4, 0.4)), 0.4);
    }

    #[test]
    fn random_in_box_stays_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        let half = Vec3::new(6.0, 4.0, 4.0);
        for _ in 0..1000 {
            let p = random_in_box(&mut rng, half);
            assert!(p.abs().cmple(half).all(), "{p:?} escaped {half:?}");
        }
    }

    #[test]
    fn spherical_direction_is_unit_length() {
        for (theta, phi) in [(0.0, 0.0), (1.0, 2.0), (4.0, 3.1), (6.2, 1.57)] {
            assert_relative_eq!(spherical_direction(theta, phi).length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn hex_color_unpacks_channels() {
        let color = hex_color(0xff1493).to_srgba();
        assert_relative_eq!(color.red, 1.0);
        assert_relative_eq!(color.green, 20.0 / 255.0, epsilon = 1e-6);
        assert_relative_eq!(color.blue, 147.0 / 255.0, epsilon = 1e-6);
    }
}
