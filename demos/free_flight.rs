//! Free-flight demo: a hovering craft over a flat terrain slab.
//!
//! Controls:
//! - Space: toggle the engine on/off
//! - Arrow Up/Down: thrust forward/backward (with a pitch lean)
//! - Arrow Left/Right: yaw (with a banking roll)
//!
//! Run with: `cargo run --example free_flight`

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use hover_flight_controller::prelude::*;
use hover_flight_controller::rapier::Rapier3dCraftBundle;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
        .add_plugins(FlightControllerPlugin::<Rapier3dBackend>::default())
        .add_systems(Startup, (setup_scene, setup_craft))
        .add_systems(Update, (lean_rotor, follow_camera))
        .run();
}

/// Marker for the rotor child mesh that leans with the engine tilt.
#[derive(Component)]
struct Rotor;

/// Marker for the chase camera.
#[derive(Component)]
struct ChaseCamera;

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Terrain slab, top surface at y = 0.
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(100.0, 1.0, 100.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Transform::from_xyz(0.0, -0.5, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(50.0, 0.5, 50.0),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Camera3d::default(),
        ChaseCamera,
        Transform::from_xyz(0.0, 8.0, -14.0).looking_at(Vec3::new(0.0, 2.0, 0.0), Vec3::Y),
    ));
}

fn setup_craft(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let config = FlightConfig::default();

    commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(1.2, 0.5, 1.8))),
            MeshMaterial3d(materials.add(Color::srgb(0.8, 0.2, 0.2))),
            Transform::from_xyz(0.0, 2.0, 0.0),
            FlightController::new(),
            config,
            ControlState::default(),
            Rapier3dCraftBundle::default(),
            Collider::cuboid(0.6, 0.25, 0.9),
            ColliderMassProperties::Mass(1.0),
        ))
        .with_children(|parent| {
            parent.spawn((
                Rotor,
                Mesh3d(meshes.add(Cuboid::new(2.4, 0.05, 0.3))),
                MeshMaterial3d(materials.add(Color::srgb(0.2, 0.2, 0.25))),
                Transform::from_xyz(0.0, 0.5, 0.0),
            ));
        });
}

/// Lean the rotor with the controller's smoothed engine tilt.
fn lean_rotor(
    q_craft: Query<&FlightController>,
    mut q_rotor: Query<&mut Transform, With<Rotor>>,
) {
    let Ok(controller) = q_craft.single() else {
        return;
    };
    for mut transform in &mut q_rotor {
        transform.rotation = Quat::from_rotation_x(controller.engine_tilt.y)
            * Quat::from_rotation_z(-controller.engine_tilt.x);
    }
}

/// Keep the camera trailing the craft.
fn follow_camera(
    time: Res<Time>,
    q_craft: Query<&Transform, (With<FlightController>, Without<ChaseCamera>)>,
    mut q_camera: Query<&mut Transform, With<ChaseCamera>>,
) {
    let Ok(craft) = q_craft.single() else {
        return;
    };
    let Ok(mut camera) = q_camera.single_mut() else {
        return;
    };

    let target = craft.translation + Vec3::new(0.0, 6.0, -12.0);
    let blend = (time.delta_secs() * 2.0).min(1.0);
    camera.translation = camera.translation.lerp(target, blend);
    camera.look_at(craft.translation + Vec3::Y, Vec3::Y);
}
