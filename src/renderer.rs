//! Rendering capability consumed by the simulation core.
//!
//! The core never touches meshes, materials or the scene graph directly. It asks a
//! [`Renderer`] for opaque handles and pushes per-tick state through them. The Bevy
//! implementation lives in `render_bridge`.
use bevy::prelude::*;

/// Exclusive token for one visual owned by the renderer.
///
/// Not `Clone`: [`Renderer::dispose`] consumes it, so a handle can only be released once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RenderHandle(u64);

impl RenderHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeDescriptor {
    Box { size: Vec3 },
    Torus { major_radius: f32, minor_radius: f32 },
    /// Extruded heart outline, roughly unit-sized before scaling.
    Heart { depth: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Alpha,
    Additive,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialDescriptor {
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub blend: BlendMode,
    pub unlit: bool,
}

impl MaterialDescriptor {
    pub fn solid(color: Color, opacity: f32) -> Self {
        Self {
            color,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            opacity,
            blend: BlendMode::Alpha,
            unlit: false,
        }
    }

    pub fn with_emissive(mut self, emissive: Color, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    pub fn additive(mut self) -> Self {
        self.blend = BlendMode::Additive;
        self.unlit = true;
        self
    }

    pub fn unlit(mut self) -> Self {
        self.unlit = true;
        self
    }
}

/// Create/attach/dispose primitives plus per-tick property updates.
///
/// Rotations are Euler angles applied in XYZ order.
pub trait Renderer {
    fn create_solid(&mut self, shape: ShapeDescriptor, material: MaterialDescriptor) -> RenderHandle;
    fn create_point_cloud(&mut self, point_count: usize, material: MaterialDescriptor) -> RenderHandle;
    fn attach(&mut self, handle: &RenderHandle);
    fn detach(&mut self, handle: &RenderHandle);
    /// Releases the visual. Calling this twice for the same visual is a caller bug.
    fn dispose(&mut self, handle: RenderHandle);
    fn update_positions(&mut self, handle: &RenderHandle, positions: &[Vec3]);
    fn update_colors(&mut self, handle: &RenderHandle, colors: &[Color]);
    fn set_position(&mut self, handle: &RenderHandle, position: Vec3);
    fn set_opacity(&mut self, handle: &RenderHandle, opacity: f32);
    fn set_scale(&mut self, handle: &RenderHandle, scale: Vec3);
    fn set_rotation(&mut self, handle: &RenderHandle, rotation: Vec3);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[derive(Debug, Default, Clone)]
    pub struct VisualRecord {
        pub point_count: Option<usize>,
        pub attached: bool,
        pub position: Vec3,
        pub positions: Vec<Vec3>,
        pub opacity_history: Vec<f32>,
        pub scale: Vec3,
        pub rotation: Vec3,
    }

    /// Renderer double that tracks every live visual and rejects misuse loudly.
    #[derive(Default)]
    pub struct RecordingRenderer {
        next_id: u64,
        pub live: HashMap<u64, VisualRecord>,
        pub disposed: HashSet<u64>,
        pub created: usize,
    }

    impl RecordingRenderer {
        pub fn live_count(&self) -> usize {
            self.live.len()
        }

        fn record(&mut self, handle: &RenderHandle) -> &mut VisualRecord {
            let id = handle.raw();
            assert!(!self.disposed.contains(&id), "handle {id} used after dispose");
            self.live
                .get_mut(&id)
                .unwrap_or_else(|| panic!("unknown handle {id}"))
        }

        fn create(&mut self, point_count: Option<usize>, material: MaterialDescriptor) -> RenderHandle {
            let id = self.next_id;
            self.next_id += 1;
            self.created += 1;
            self.live.insert(
                id,
                VisualRecord {
                    point_count,
                    opacity_history: vec![material.opacity],
                    scale: Vec3::ONE,
                    ..default()
                },
            );
            RenderHandle::from_raw(id)
        }
    }

    impl Renderer for RecordingRenderer {
        fn create_solid(&mut self, _shape: ShapeDescriptor, material: MaterialDescriptor) -> RenderHandle {
            self.create(None, material)
        }

        fn create_point_cloud(&mut self, point_count: usize, material: MaterialDescriptor) -> RenderHandle {
            self.create(Some(point_count), material)
        }

        fn attach(&mut self, handle: &RenderHandle) {
            self.record(handle).attached = true;
        }

        fn detach(&mut self, handle: &RenderHandle) {
            self.record(handle).attached = false;
        }

        fn dispose(&mut self, handle: RenderHandle) {
            let id = handle.raw();
            assert!(self.disposed.insert(id), "handle {id} disposed twice");
            assert!(self.live.remove(&id).is_some(), "unknown handle {id}");
        }

        fn update_positions(&mut self, handle: &RenderHandle, positions: &[Vec3]) {
            let record = self.record(handle);
            if let Some(count) = record.point_count {
                assert_eq!(count, positions.len(), "point buffer size changed");
            }
            record.positions = positions.to_vec();
        }

        fn update_colors(&mut self, handle: &RenderHandle, colors: &[Color]) {
            let record = self.record(handle);
            if let Some(count) = record.point_count {
                assert_eq!(count, colors.len(), "color buffer size changed");
            }
        }

        fn set_position(&mut self, handle: &RenderHandle, position: Vec3) {
            self.record(handle).position = position;
        }

        fn set_opacity(&mut self, handle: &RenderHandle, opacity: f32) {
            self.record(handle).opacity_history.push(opacity);
        }

        fn set_scale(&mut self, handle: &RenderHandle, scale: Vec3) {
            self.record(handle).scale = scale;
        }

        fn set_rotation(&mut self, handle: &RenderHandle, rotation: Vec3) {
            self.record(handle).rotation = rotation;
        }
    }
}
