//! # `hover_flight_controller`
//!
//! A rigid-body flight controller for hovering craft with physics backend abstraction.
//!
//! This crate provides a tuneable helicopter-style controller that:
//! - Hovers at a target height above terrain using a raycast ground sensor
//! - Keeps the craft upright with a per-axis spring-damper balance law
//! - Steers with forward thrust plus yaw/pitch/roll torque from player input
//! - Toggles between an active hover mode and an idle settle-to-ground mode
//! - Abstracts the physics backend for easy swapping (Rapier3D included)
//!
//! ## Architecture
//!
//! The controller drives a fully dynamic rigidbody. Each simulation tick:
//! 1. A downward raycast senses the distance to terrain
//! 2. The engine mode machine rewrites the live float targets (active hover
//!    vs. decaying idle descent)
//! 3. Balance, float and locomotion laws accumulate impulse and
//!    torque-impulse contributions into a per-tick buffer
//! 4. The buffer is applied to the body exactly once through the backend
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use hover_flight_controller::prelude::*;
//!
//! // Create controller components for a craft
//! let controller = FlightController::new();
//! let config = FlightConfig::default();
//! let controls = ControlState::default();
//!
//! // These can be spawned as a bundle with physics components
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod balance;
pub mod config;
pub mod controls;
pub mod float;
pub mod locomotion;
pub mod mode;
pub mod sensor;
pub mod systems;

#[cfg(feature = "rapier3d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{BodyState, FlightPhysicsBackend};
    pub use crate::config::{BalanceParams, FlightConfig, FlightController, FloatParams};
    pub use crate::controls::{ControlState, FlightKeyBindings};
    pub use crate::mode::EngineMode;
    pub use crate::sensor::GroundHit;
    pub use crate::{FlightControllerPlugin, FlightControllerSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::Rapier3dBackend;
}

/// System sets for the flight controller, configured in `FixedUpdate`.
///
/// Backend plugins register their ground sensing in [`FlightControllerSet::Sensing`];
/// the generic control laws and impulse application run in
/// [`FlightControllerSet::Control`].
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightControllerSet {
    /// Physics queries: downward raycast for terrain distance.
    Sensing,
    /// Mode machine, control laws and the single impulse application.
    Control,
}

/// Main plugin for the flight controller system.
///
/// This plugin is generic over a physics backend `B` which provides the actual
/// physics operations (raycasting, impulse application, body state access).
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier3dBackend`)
///
/// # Examples
///
/// With the Rapier3D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use hover_flight_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(FlightControllerPlugin::<Rapier3dBackend>::default())
///     .run();
/// ```
pub struct FlightControllerPlugin<B: backend::FlightPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::FlightPhysicsBackend> Default for FlightControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::FlightPhysicsBackend> Plugin for FlightControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::FlightController>();
        app.register_type::<config::FlightConfig>();
        app.register_type::<config::BalanceParams>();
        app.register_type::<config::FloatParams>();
        app.register_type::<controls::ControlState>();
        app.register_type::<mode::EngineMode>();

        app.init_resource::<controls::FlightKeyBindings>();

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        // Sensing runs before the control laws within each simulation tick
        app.configure_sets(
            FixedUpdate,
            (FlightControllerSet::Sensing, FlightControllerSet::Control).chain(),
        );

        // Input sampling follows the event cadence, not the tick cadence:
        // it only rewrites the ControlState snapshot read by the tick logic.
        app.add_systems(Update, controls::sample_flight_controls);

        app.add_systems(
            FixedUpdate,
            systems::drive_flight_controllers::<B>.in_set(FlightControllerSet::Control),
        );
    }
}
