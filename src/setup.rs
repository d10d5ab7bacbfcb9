// Scene setup: camera, fog, lights
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;

use crate::constants::*;
use crate::engine::CelebrationEngine;
use crate::math_utils::hex_color;

#[derive(Component)]
pub struct CelebrationCamera;

/// Point light circling the scene on the XZ plane at a fixed height.
#[derive(Component, Clone, Copy, Debug)]
pub struct OrbitingLight {
    pub radius: f32,
    pub speed: f32,
    /// Light B runs a quarter turn out of phase with light A.
    pub cosine_leads: bool,
}

impl OrbitingLight {
    pub fn offset_at(&self, time: f32) -> Vec2 {
        let angle = time * self.speed;
        let (lead, follow) = if self.cosine_leads {
            (angle.cos(), angle.sin())
        } else {
            (angle.sin(), angle.cos())
        };
        Vec2::new(lead, follow) * self.radius
    }
}

pub fn setup_scene(mut commands: Commands, engine: Res<CelebrationEngine>) {
    let camera = engine.camera();
    let night = hex_color(COLOR_NIGHT);

    commands.insert_resource(ClearColor(night));
    commands.insert_resource(AmbientLight {
        color: hex_color(COLOR_HOT_PINK),
        brightness: AMBIENT_LIGHT_BRIGHTNESS,
        ..default()
    });

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        camera.transform(),
        DistanceFog {
            color: night,
            falloff: FogFalloff::Linear {
                start: FOG_START,
                end: FOG_END,
            },
            ..default()
        },
        CelebrationCamera,
    ));

    for (light, color, intensity, height) in [
        (
            OrbitingLight { radius: ORBIT_LIGHT_RADIUS, speed: ORBIT_LIGHT_A_SPEED, cosine_leads: false },
            COLOR_DEEP_PINK,
            ORBIT_LIGHT_A_INTENSITY,
            ORBIT_LIGHT_A_HEIGHT,
        ),
        (
            OrbitingLight { radius: ORBIT_LIGHT_RADIUS, speed: ORBIT_LIGHT_B_SPEED, cosine_leads: true },
            COLOR_HOT_PINK,
            ORBIT_LIGHT_B_INTENSITY,
            ORBIT_LIGHT_B_HEIGHT,
        ),
    ] {
        let offset = light.offset_at(0.0);
        commands.spawn((
            PointLight {
                color: hex_color(color),
                intensity,
                range: ORBIT_LIGHT_RANGE,
                ..default()
            },
            Transform::from_xyz(offset.x, height, offset.y),
            light,
        ));
    }

    commands.spawn((
        SpotLight {
            color: hex_color(COLOR_PINK),
            intensity: ORBIT_LIGHT_A_INTENSITY,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, 10.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    info!("Scene lights and camera ready");
}

pub fn orbit_lights(engine: Res<CelebrationEngine>, mut lights: Query<(&OrbitingLight, &mut Transform)>) {
    let time = engine.clock().time();
    for (light, mut transform) in lights.iter_mut() {
        let offset = light.offset_at(time);
        transform.translation.x = offset.x;
        transform.translation.z = offset.y;
    }
}

pub fn sync_camera(
    engine: Res<CelebrationEngine>,
    mut camera_query: Query<&mut Transform, With<CelebrationCamera>>,
) {
    if let Ok(mut transform) = camera_query.single_mut() {
        *transform = engine.camera().transform();
    }
}
