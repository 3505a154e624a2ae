//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D.
//! Enable with the `rapier3d` feature.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::{BodyState, FlightPhysicsBackend};
use crate::config::{FlightConfig, FlightController};
use crate::sensor::GroundHit;
use crate::FlightControllerSet;

/// Rapier3D physics backend for the flight controller.
///
/// Uses `bevy_rapier3d` for impulse application and body state access.
/// Ground sensing is handled by a dedicated system that receives the
/// Rapier context as a system parameter and runs in
/// [`FlightControllerSet::Sensing`].
pub struct Rapier3dBackend;

impl FlightPhysicsBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn body_state(world: &World, entity: Entity) -> Option<BodyState> {
        // No Velocity component means Rapier has no live dynamic body for
        // this entity yet (or anymore): skip the tick.
        let velocity = world.get::<Velocity>(entity)?;

        let (translation, rotation) = world
            .get::<GlobalTransform>(entity)
            .map(|t| {
                let (_, rotation, translation) = t.to_scale_rotation_translation();
                (translation, rotation)
            })
            .or_else(|| {
                world
                    .get::<Transform>(entity)
                    .map(|t| (t.translation, t.rotation))
            })?;

        Some(BodyState {
            translation,
            rotation,
            linvel: velocity.linvel,
            angvel: velocity.angvel,
        })
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
        if let Some(mut ext_impulse) = world.get_mut::<ExternalImpulse>(entity) {
            // Overwrite, not accumulate: the integrator hands us the whole
            // tick's impulse in a single call.
            ext_impulse.impulse = impulse;
        }
    }

    fn apply_torque_impulse(world: &mut World, entity: Entity, torque_impulse: Vec3) {
        if let Some(mut ext_impulse) = world.get_mut::<ExternalImpulse>(entity) {
            ext_impulse.torque_impulse = torque_impulse;
        }
    }
}

/// Plugin that sets up Rapier3D-specific systems for the flight controller.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            rapier_ground_sensing.in_set(FlightControllerSet::Sensing),
        );
    }
}

/// Downward terrain raycast for every craft.
///
/// Casts from the craft's position along world −Y, bounded by twice the
/// active hover height (never below the live target while it decays). The
/// filter excludes the craft's own rigid body and sensor colliders and
/// honors the entity's `CollisionGroups`, so a terrain-only interaction
/// group keeps other dynamic bodies out of the height measurement.
fn rapier_ground_sensing(
    rapier_context: ReadRapierContext,
    mut q_crafts: Query<(
        Entity,
        &GlobalTransform,
        &FlightConfig,
        &mut FlightController,
        Option<&CollisionGroups>,
    )>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, config, mut controller, collision_groups) in &mut q_crafts {
        let origin = transform.translation();
        let max_distance = config.sensor_range().max(controller.float.hover_height);

        if max_distance <= 0.0 {
            controller.ground = None;
            continue;
        }

        let mut filter = QueryFilter::default()
            .exclude_rigid_body(entity)
            .exclude_sensors();
        if let Some(groups) = collision_groups {
            filter = filter.groups(*groups);
        }

        controller.ground = context
            .cast_ray(origin, Vec3::NEG_Y, max_distance, true, filter)
            .map(|(hit_entity, toi)| {
                GroundHit::new(toi, origin + Vec3::NEG_Y * toi, Some(hit_entity))
            });
    }
}

/// Bundle for spawning a craft with Rapier3D physics.
///
/// Provides the rigid body, velocity tracking and the `ExternalImpulse`
/// the integrator writes each tick. Damping defaults are tuned for a
/// hovering craft: enough linear damping that the float spring does not
/// oscillate, enough angular damping that the body settles under the
/// balance law when idle.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use hover_flight_controller::prelude::*;
/// use hover_flight_controller::rapier::Rapier3dCraftBundle;
///
/// fn spawn_craft(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, 2.0, 0.0),
///         FlightController::new(),
///         FlightConfig::default(),
///         ControlState::default(),
///         Rapier3dCraftBundle::default(),
///         Collider::capsule_y(0.5, 0.25),
///         // Terrain-only sensing: craft in group 0, collides with group 1
///         CollisionGroups::new(Group::GROUP_1, Group::GROUP_2),
///     ));
/// }
/// ```
#[derive(Bundle)]
pub struct Rapier3dCraftBundle {
    /// The rigid body type. [`RigidBody::Dynamic`] for a flyable craft.
    pub rigid_body: RigidBody,
    /// Current linear and angular velocity, updated by Rapier each step.
    pub velocity: Velocity,
    /// The tick's impulse and torque impulse, written by the integrator.
    pub external_impulse: ExternalImpulse,
    /// Ambient damping; the idle craft settles under this alone.
    pub damping: Damping,
}

impl Default for Rapier3dCraftBundle {
    fn default() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            external_impulse: ExternalImpulse::default(),
            damping: Damping {
                linear_damping: 2.0,
                angular_damping: 1.0,
            },
        }
    }
}

impl Rapier3dCraftBundle {
    /// Builder: set the damping coefficients.
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.damping = Damping {
            linear_damping: linear,
            angular_damping: angular,
        };
        self
    }
}
