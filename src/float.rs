//! Hover/float law.
//!
//! Computes the vertical lift impulse holding the craft at its hover target.
//! A constant `stable` bias keeps the rotor "carrying" the craft, a
//! proportional term pulls toward the target height when terrain is sensed,
//! and vertical velocity is damped so the craft does not bounce on the
//! spring.

use bevy::prelude::*;

use crate::config::FloatParams;

/// Vertical lift contribution for one tick.
///
/// - `ground_distance`: sensed distance to terrain, `None` when the sensor
///   found nothing within range (flying high); the law then falls back to
///   the damping-only branch.
/// - `vertical_velocity`: current world-Y velocity of the body.
/// - `damping_y`: vertical damping gain (shared with the yaw damping gain
///   in [`crate::config::BalanceParams`]).
///
/// A zero (or negative) `hover_height` disables the proportional term
/// rather than dividing by it, so a settled craft degrades to the
/// damping-only branch instead of producing NaNs.
///
/// Returns a vertical-only impulse; the law contributes no torque.
pub fn float_lift(
    float: &FloatParams,
    damping_y: f32,
    ground_distance: Option<f32>,
    vertical_velocity: f32,
    dt: f32,
) -> Vec3 {
    let damping = vertical_velocity * dt * damping_y;

    let lift = match ground_distance {
        Some(distance) if float.hover_height > 0.0 => {
            let height_error = (float.hover_height - distance) / float.hover_height;
            float.stable * dt + height_error * float.lift * dt - damping
        }
        _ => float.stable * dt - damping,
    };

    Vec3::Y * lift
}
