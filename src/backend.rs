//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement to
//! work with the flight controller. This allows easy swapping between
//! physics engines (Rapier3D, XPBD, custom, etc.).

use bevy::prelude::*;

/// Per-tick snapshot of a rigid body's state.
///
/// The physics world owns the body; the controller only ever holds this
/// snapshot, re-fetched every tick and never kept across ticks.
#[derive(Debug, Clone, Copy)]
pub struct BodyState {
    /// World position of the body's origin.
    pub translation: Vec3,
    /// World orientation of the body.
    pub rotation: Quat,
    /// Linear velocity.
    pub linvel: Vec3,
    /// Angular velocity.
    pub angvel: Vec3,
}

/// Trait for physics backend implementations.
///
/// Implement this trait to integrate a physics engine with the flight
/// controller. The backend provides body-state snapshots and the two
/// impulse mutators; its [`FlightPhysicsBackend::plugin`] registers the
/// engine-specific ground sensing system in
/// [`crate::FlightControllerSet::Sensing`].
///
/// For an example implementation, see the `rapier` module's
/// `Rapier3dBackend` which implements this trait for Bevy Rapier3D.
pub trait FlightPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Fetch the body snapshot for an entity.
    ///
    /// Returns `None` when the entity has no live rigid body (not yet
    /// spawned into the physics world, or already despawned). The
    /// controller treats that tick as a no-op and retries next tick.
    fn body_state(world: &World, entity: Entity) -> Option<BodyState>;

    /// Apply a linear impulse to an entity's body, waking it.
    ///
    /// Called exactly once per simulation tick per present body with the
    /// tick's accumulated impulse.
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3);

    /// Apply a torque impulse to an entity's body, waking it.
    ///
    /// Called exactly once per simulation tick per present body with the
    /// tick's accumulated torque impulse.
    fn apply_torque_impulse(world: &mut World, entity: Entity, torque_impulse: Vec3);

    /// Get the fixed timestep delta time.
    fn fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
