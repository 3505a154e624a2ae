//! Attitude balance law.
//!
//! Keeps the craft upright with an independent spring-damper per tilt axis
//! and a damping-only yaw term. The craft's up-axis is projected onto the
//! plane of each tilt axis; the signed angle between the projection and
//! world up drives the corrective spring, with the sign taken from the
//! cross product's component along that axis.

use bevy::prelude::*;

use crate::config::BalanceParams;

/// Corrective torque-impulse contribution for one tick.
///
/// The X and Z components restore the body's up-axis toward world up and
/// damp the matching angular velocity. The Y component damps yaw only —
/// heading is the player's to set, the law merely resists spin.
///
/// Returns a torque vector; the law contributes no linear impulse.
pub fn balance_torque(balance: &BalanceParams, rotation: Quat, angvel: Vec3, dt: f32) -> Vec3 {
    let up = rotation * Vec3::Y;

    Vec3::new(
        // Tilt about X shows in the YZ plane: zero the X component.
        tilt_correction(Vec3::new(0.0, up.y, up.z), Vec3::X, balance, angvel.x, dt),
        -angvel.y * dt * balance.damping_y,
        // Tilt about Z shows in the XY plane: zero the Z component.
        tilt_correction(Vec3::new(up.x, up.y, 0.0), Vec3::Z, balance, angvel.z, dt),
    )
}

/// Spring-damper correction about one tilt axis.
///
/// `projected_up` is the body up-axis with the tilt axis' component zeroed.
/// A degenerate projection (up-axis parallel to the tilt axis, craft lying
/// fully on its side against this plane) has no meaningful angle, so only
/// the damping term applies.
fn tilt_correction(
    projected_up: Vec3,
    axis: Vec3,
    balance: &BalanceParams,
    angvel_axis: f32,
    dt: f32,
) -> f32 {
    let damping = angvel_axis * dt * balance.damping_xz;

    let Some(projected) = projected_up.try_normalize() else {
        return -damping;
    };

    let angle = projected.angle_between(Vec3::Y);
    let sign = projected.cross(Vec3::Y).dot(axis).signum();

    sign * angle * dt * balance.spring_xz - damping
}
