// Procedural extruded heart, built from the classic six-curve bezier outline.
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

const SAMPLES_PER_CURVE: usize = 12;

// Outline in shape space: cusp at (0.5, 0.5), tip at (0.5, 1.9). Y is flipped when meshing
// so the tip points down.
const HEART_CURVES: [[[f32; 2]; 4]; 6] = [
    [[0.5, 0.5], [0.5, 0.5], [0.4, 0.0], [0.0, 0.0]],
    [[0.0, 0.0], [-0.6, 0.0], [-0.6, 0.7], [-0.6, 0.7]],
    [[-0.6, 0.7], [-0.6, 1.1], [-0.3, 1.54], [0.5, 1.9]],
    [[0.5, 1.9], [1.2, 1.54], [1.6, 1.1], [1.6, 0.7]],
    [[1.6, 0.7], [1.6, 0.7], [1.6, 0.0], [1.0, 0.0]],
    [[1.0, 0.0], [0.7, 0.0], [0.5, 0.5], [0.5, 0.5]],
];

// Interior point every outline sample is visible from, in shape space.
const FAN_CENTER: [f32; 2] = [0.5, 0.9];
const SHAPE_CENTER: [f32; 2] = [0.5, 0.95];

fn cubic(p: &[[f32; 2]; 4], t: f32) -> Vec2 {
    let [a, b, c, d] = p.map(Vec2::from_array);
    let u = 1.0 - t;
    a * u * u * u + b * 3.0 * u * u * t + c * 3.0 * u * t * t + d * t * t * t
}

fn to_mesh_space(p: Vec2) -> Vec2 {
    let center = Vec2::from_array(SHAPE_CENTER);
    Vec2::new(p.x - center.x, center.y - p.y)
}

/// Closed counter-clockwise outline centred on the origin.
pub fn heart_outline() -> Vec<Vec2> {
    let mut points = Vec::with_capacity(HEART_CURVES.len() * SAMPLES_PER_CURVE);
    for curve in &HEART_CURVES {
        // Last sample of each curve is the first of the next.
        for i in 0..SAMPLES_PER_CURVE {
            let t = i as f32 / SAMPLES_PER_CURVE as f32;
            let point = to_mesh_space(cubic(curve, t));
            if points.last().map_or(true, |last: &Vec2| last.distance(point) > 1e-4) {
                points.push(point);
            }
        }
    }

    if signed_area(&points) < 0.0 {
        points.reverse();
    }
    points
}

fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

/// Heart prism of the given depth: two fan-triangulated caps joined by flat-shaded side walls.
pub fn create_heart_mesh(depth: f32) -> Mesh {
    let outline = heart_outline();
    let n = outline.len() as u32;
    let half = depth / 2.0;
    let center = to_mesh_space(Vec2::from_array(FAN_CENTER));

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    // Caps: vertex 0 is the fan centre, then the outline.
    for (z, normal) in [(half, 1.0_f32), (-half, -1.0)] {
        let base = positions.len() as u32;
        positions.push([center.x, center.y, z]);
        normals.push([0.0, 0.0, normal]);
        uvs.push([0.5, 0.5]);
        for p in &outline {
            positions.push([p.x, p.y, z]);
            normals.push([0.0, 0.0, normal]);
            uvs.push([p.x * 0.5 + 0.5, 0.5 - p.y * 0.5]);
        }
        for i in 0..n {
            let a = base + 1 + i;
            let b = base + 1 + (i + 1) % n;
            if normal > 0.0 {
                indices.extend_from_slice(&[base, a, b]);
            } else {
                indices.extend_from_slice(&[base, b, a]);
            }
        }
    }

    // Side walls, one quad per outline edge.
    for i in 0..outline.len() {
        let a = outline[i];
        let b = outline[(i + 1) % outline.len()];
        let edge = b - a;
        let outward = Vec2::new(edge.y, -edge.x).normalize_or_zero();
        let base = positions.len() as u32;

        for (p, z) in [(a, half), (b, half), (b, -half), (a, -half)] {
            positions.push([p.x, p.y, z]);
            normals.push([outward.x, outward.y, 0.0]);
            uvs.push([0.0, 0.0]);
        }
        indices.extend_from_slice(&[base, base + 3, base + 2, base, base + 2, base + 1]);
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_is_closed_ccw_and_centred() {
        let outline = heart_outline();
        assert!(outline.len() > HEART_CURVES.len() * 8);
        assert!(signed_area(&outline) > 0.0);

        let (min, max) = outline
            .iter()
            .fold((Vec2::MAX, Vec2::MIN), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        assert!((min.x + max.x).abs() < 0.05);
        assert!((min.y + max.y).abs() < 0.05);
        // Tip points down.
        let tip = outline
            .iter()
            .min_by(|a, b| a.y.total_cmp(&b.y))
            .copied()
            .unwrap_or_default();
        assert!(tip.x.abs() < 1e-3);
    }

    #[test]
    fn mesh_indices_stay_in_bounds() {
        let mesh = create_heart_mesh(0.3);
        let vertex_count = mesh.count_vertices();
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        assert_eq!(indices.len() % 3, 0);
        assert!(indices.iter().all(|&i| (i as usize) < vertex_count));
    }
}
