//! Locomotion law.
//!
//! Maps the directional control snapshot into a forward thrust impulse and
//! yaw/pitch/roll torque contributions. The craft's local forward axis is
//! +Z and its side axis is +X. All four contributions are cumulative, so
//! diagonal input combines thrust, yaw, pitch and roll in one tick.

use bevy::prelude::*;

use crate::config::FlightConfig;
use crate::controls::ControlState;

/// Thrust impulse contribution for one tick.
///
/// The body's forward axis is flattened onto the horizontal plane and
/// re-normalized, so a pitched-up craft still accelerates along the ground
/// plane. A craft pointing straight up or down has no horizontal heading
/// and produces no thrust.
pub fn thrust_impulse(
    config: &FlightConfig,
    controls: &ControlState,
    rotation: Quat,
    dt: f32,
) -> Vec3 {
    let drive = controls.drive();
    if drive == 0.0 {
        return Vec3::ZERO;
    }

    let forward = rotation * Vec3::Z;
    let Some(heading) = Vec3::new(forward.x, 0.0, forward.z).try_normalize() else {
        return Vec3::ZERO;
    };

    heading * (config.thrust * dt * drive)
}

/// Steering torque-impulse contribution for one tick.
///
/// - Yaw about world up from left/right input
/// - Pitch about the body side axis from forward/backward input
/// - Roll about the body forward axis, banking into the turn
pub fn steering_torque(
    config: &FlightConfig,
    controls: &ControlState,
    rotation: Quat,
    dt: f32,
) -> Vec3 {
    let drive = controls.drive();
    let steer = controls.steer();

    let forward = rotation * Vec3::Z;
    let side = rotation * Vec3::X;

    Vec3::Y * (config.yaw * dt * steer)
        + side * (config.pitch * dt * drive)
        + forward * (-config.roll * dt * steer)
}
