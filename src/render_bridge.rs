//! Bevy implementation of the [`Renderer`] capability.
//!
//! The engine runs as plain Rust against [`RenderQueue`], which only records commands and hands
//! out ids. [`apply_render_commands`] drains the queue once per frame and turns it into
//! entities, meshes and materials. Shapes are cached so the hundreds of confetti boxes share
//! one mesh.
use std::collections::HashMap;

use bevy::asset::RenderAssetUsages;
use bevy::render::mesh::PrimitiveTopology;
use bevy::prelude::*;

use crate::heart_mesh::create_heart_mesh;
use crate::renderer::{BlendMode, MaterialDescriptor, RenderHandle, Renderer, ShapeDescriptor};

#[derive(Debug, Clone)]
pub enum RenderCommand {
    CreateSolid { id: u64, shape: ShapeDescriptor, material: MaterialDescriptor },
    CreatePointCloud { id: u64, point_count: usize, material: MaterialDescriptor },
    SetVisible { id: u64, visible: bool },
    Dispose { id: u64 },
    Positions { id: u64, positions: Vec<[f32; 3]> },
    Colors { id: u64, colors: Vec<[f32; 4]> },
    Translation { id: u64, position: Vec3 },
    Opacity { id: u64, opacity: f32 },
    Scale { id: u64, scale: Vec3 },
    Rotation { id: u64, rotation: Vec3 },
}

/// Command recorder handed to the engine as its renderer.
#[derive(Resource, Default)]
pub struct RenderQueue {
    next_id: u64,
    commands: Vec<RenderCommand>,
}

impl RenderQueue {
    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, RenderCommand> {
        self.commands.drain(..)
    }
}

impl Renderer for RenderQueue {
    fn create_solid(&mut self, shape: ShapeDescriptor, material: MaterialDescriptor) -> RenderHandle {
        let id = self.allocate();
        self.commands.push(RenderCommand::CreateSolid { id, shape, material });
        RenderHandle::from_raw(id)
    }

    fn create_point_cloud(&mut self, point_count: usize, material: MaterialDescriptor) -> RenderHandle {
        let id = self.allocate();
        self.commands.push(RenderCommand::CreatePointCloud { id, point_count, material });
        RenderHandle::from_raw(id)
    }

    fn attach(&mut self, handle: &RenderHandle) {
        self.commands.push(RenderCommand::SetVisible { id: handle.raw(), visible: true });
    }

    fn detach(&mut self, handle: &RenderHandle) {
        self.commands.push(RenderCommand::SetVisible { id: handle.raw(), visible: false });
    }

    fn dispose(&mut self, handle: RenderHandle) {
        self.commands.push(RenderCommand::Dispose { id: handle.raw() });
    }

    fn update_positions(&mut self, handle: &RenderHandle, positions: &[Vec3]) {
        self.commands.push(RenderCommand::Positions {
            id: handle.raw(),
            positions: positions.iter().map(|p| p.to_array()).collect(),
        });
    }

    fn update_colors(&mut self, handle: &RenderHandle, colors: &[Color]) {
        self.commands.push(RenderCommand::Colors {
            id: handle.raw(),
            colors: colors.iter().map(|c| c.to_linear().to_f32_array()).collect(),
        });
    }

    fn set_position(&mut self, handle: &RenderHandle, position: Vec3) {
        self.commands.push(RenderCommand::Translation { id: handle.raw(), position });
    }

    fn set_opacity(&mut self, handle: &RenderHandle, opacity: f32) {
        self.commands.push(RenderCommand::Opacity { id: handle.raw(), opacity });
    }

    fn set_scale(&mut self, handle: &RenderHandle, scale: Vec3) {
        self.commands.push(RenderCommand::Scale { id: handle.raw(), scale });
    }

    fn set_rotation(&mut self, handle: &RenderHandle, rotation: Vec3) {
        self.commands.push(RenderCommand::Rotation { id: handle.raw(), rotation });
    }
}

struct RenderedObject {
    entity: Entity,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    /// Point-cloud meshes are owned; shape meshes come from the shared cache.
    owns_mesh: bool,
    transform: Transform,
    transform_dirty: bool,
}

/// Live entities keyed by render id, plus the shared shape meshes.
#[derive(Resource, Default)]
pub struct RenderEntities {
    objects: HashMap<u64, RenderedObject>,
    shape_meshes: Vec<(ShapeDescriptor, Handle<Mesh>)>,
}

impl RenderEntities {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn entity(&self, id: u64) -> Option<Entity> {
        self.objects.get(&id).map(|object| object.entity)
    }

    fn shape_mesh(&mut self, shape: ShapeDescriptor, meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
        if let Some((_, handle)) = self.shape_meshes.iter().find(|(cached, _)| *cached == shape) {
            return handle.clone();
        }
        let handle = match shape {
            ShapeDescriptor::Box { size } => meshes.add(Cuboid::new(size.x, size.y, size.z)),
            ShapeDescriptor::Torus { major_radius, minor_radius } => meshes.add(Torus {
                minor_radius,
                major_radius,
            }),
            ShapeDescriptor::Heart { depth } => meshes.add(create_heart_mesh(depth)),
        };
        self.shape_meshes.push((shape, handle.clone()));
        handle
    }
}

fn standard_material(descriptor: &MaterialDescriptor) -> StandardMaterial {
    let glow = descriptor.emissive.to_linear();
    let intensity = descriptor.emissive_intensity;
    StandardMaterial {
        base_color: descriptor.color.with_alpha(descriptor.opacity),
        emissive: LinearRgba::rgb(glow.red * intensity, glow.green * intensity, glow.blue * intensity),
        alpha_mode: match descriptor.blend {
            BlendMode::Alpha => AlphaMode::Blend,
            BlendMode::Additive => AlphaMode::Add,
        },
        unlit: descriptor.unlit,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

fn point_cloud_mesh(point_count: usize) -> Mesh {
    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, vec![[0.0_f32; 3]; point_count])
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, vec![[1.0_f32; 4]; point_count])
}

/// Drains [`RenderQueue`] into the world. Runs after the engine every frame.
pub fn apply_render_commands(
    mut commands: Commands,
    mut queue: ResMut<RenderQueue>,
    mut entities: ResMut<RenderEntities>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut transforms: Query<&mut Transform>,
) {
    if queue.is_empty() {
        return;
    }
    let entities = &mut *entities;

    for command in queue.drain() {
        match command {
            RenderCommand::CreateSolid { id, shape, material } => {
                let mesh = entities.shape_mesh(shape, &mut meshes);
                let material = materials.add(standard_material(&material));
                let entity = commands
                    .spawn((
                        Mesh3d(mesh.clone()),
                        MeshMaterial3d(material.clone()),
                        Transform::default(),
                        Visibility::Hidden,
                    ))
                    .id();
                entities.objects.insert(
                    id,
                    RenderedObject {
                        entity,
                        mesh,
                        material,
                        owns_mesh: false,
                        transform: Transform::default(),
                        transform_dirty: false,
                    },
                );
            }
            RenderCommand::CreatePointCloud { id, point_count, material } => {
                let mesh = meshes.add(point_cloud_mesh(point_count));
                let material = materials.add(standard_material(&material));
                let entity = commands
                    .spawn((
                        Mesh3d(mesh.clone()),
                        MeshMaterial3d(material.clone()),
                        Transform::default(),
                        Visibility::Hidden,
                    ))
                    .id();
                entities.objects.insert(
                    id,
                    RenderedObject {
                        entity,
                        mesh,
                        material,
                        owns_mesh: true,
                        transform: Transform::default(),
                        transform_dirty: false,
                    },
                );
            }
            RenderCommand::Dispose { id } => {
                let Some(object) = entities.objects.remove(&id) else {
                    warn!("Dispose for unknown render id {}", id);
                    continue;
                };
                commands.entity(object.entity).despawn();
                materials.remove(&object.material);
                if object.owns_mesh {
                    meshes.remove(&object.mesh);
                }
            }
            command => {
                let id = command_id(&command);
                let Some(object) = entities.objects.get_mut(&id) else {
                    warn!("Render command for unknown id {}", id);
                    continue;
                };
                apply_update(command, object, &mut commands, &mut meshes, &mut materials);
            }
        }
    }

    for object in entities.objects.values_mut().filter(|o| o.transform_dirty) {
        object.transform_dirty = false;
        match transforms.get_mut(object.entity) {
            Ok(mut transform) => *transform = object.transform,
            // Spawned this frame; the command buffer hasn't been applied yet.
            Err(_) => {
                commands.entity(object.entity).insert(object.transform);
            }
        }
    }
}

fn command_id(command: &RenderCommand) -> u64 {
    match command {
        RenderCommand::CreateSolid { id, .. }
        | RenderCommand::CreatePointCloud { id, .. }
        | RenderCommand::SetVisible { id, .. }
        | RenderCommand::Dispose { id }
        | RenderCommand::Positions { id, .. }
        | RenderCommand::Colors { id, .. }
        | RenderCommand::Translation { id, .. }
        | RenderCommand::Opacity { id, .. }
        | RenderCommand::Scale { id, .. }
        | RenderCommand::Rotation { id, .. } => *id,
    }
}

fn apply_update(
    command: RenderCommand,
    object: &mut RenderedObject,
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    match command {
        RenderCommand::SetVisible { visible, .. } => {
            let visibility = if visible { Visibility::Inherited } else { Visibility::Hidden };
            commands.entity(object.entity).insert(visibility);
        }
        RenderCommand::Positions { positions, .. } => {
            if let Some(mesh) = meshes.get_mut(&object.mesh) {
                mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
            }
        }
        RenderCommand::Colors { colors, .. } => {
            if let Some(mesh) = meshes.get_mut(&object.mesh) {
                mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
            }
        }
        RenderCommand::Opacity { opacity, .. } => {
            if let Some(material) = materials.get_mut(&object.material) {
                material.base_color = material.base_color.with_alpha(opacity);
            }
        }
        RenderCommand::Translation { position, .. } => {
            object.transform.translation = position;
            object.transform_dirty = true;
        }
        RenderCommand::Scale { scale, .. } => {
            object.transform.scale = scale;
            object.transform_dirty = true;
        }
        RenderCommand::Rotation { rotation, .. } => {
            object.transform.rotation = Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
            object.transform_dirty = true;
        }
        RenderCommand::CreateSolid { .. } | RenderCommand::CreatePointCloud { .. } | RenderCommand::Dispose { .. } => {}
    }
}
