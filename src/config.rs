//! Controller configuration and per-craft state.
//!
//! This module defines the tuning parameters for the flight controller
//! (balance springs, float targets, locomotion rates) and the central
//! per-craft state component rewritten each simulation tick.

use bevy::prelude::*;

use crate::mode::EngineMode;
use crate::sensor::GroundHit;

/// Spring-damper gains for the attitude balance law.
///
/// The XZ pair drives the two tilt axes (restoring the craft's up-axis
/// toward world up); the Y pair covers yaw. The yaw law is damping-only —
/// yaw rotates freely under player control and is resisted, not restored —
/// so `spring_y` is carried on the tuning surface but unused by the law.
///
/// `damping_y` also damps vertical velocity in the float law; both laws
/// read the same gain.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct BalanceParams {
    /// Spring gain restoring tilt about the X and Z axes.
    pub spring_xz: f32,
    /// Damping gain on angular velocity about the X and Z axes.
    pub damping_xz: f32,
    /// Reserved yaw spring gain (the yaw law applies no spring term).
    pub spring_y: f32,
    /// Damping gain on yaw rate and on vertical velocity in the float law.
    pub damping_y: f32,
}

impl Default for BalanceParams {
    fn default() -> Self {
        Self {
            spring_xz: 40.0,
            damping_xz: 5.0,
            spring_y: 0.0,
            damping_y: 8.0,
        }
    }
}

/// Lift targets for the hover/float law.
///
/// [`FlightConfig`] holds the active-mode ("flying") targets; the live
/// per-tick copy on [`FlightController`] is rewritten by the engine mode
/// machine (pinned while active, decayed toward the ground while idle).
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct FloatParams {
    /// Constant upward lift bias, applied every tick the float law runs.
    pub stable: f32,
    /// Gain on the proportional height-error term.
    pub lift: f32,
    /// Target height above terrain. Zero disables the proportional term.
    pub hover_height: f32,
}

impl Default for FloatParams {
    fn default() -> Self {
        Self {
            stable: 40.0,
            lift: 32.0,
            hover_height: 4.0,
        }
    }
}

/// Tuning parameters for a craft.
///
/// All control laws read their gains from here. The component can be
/// overridden at spawn time with the builder methods and live-adjusted
/// afterwards (e.g. from a debug panel) — the laws re-read it every tick.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct FlightConfig {
    /// Attitude balance gains.
    pub balance: BalanceParams,
    /// Active-mode float targets.
    pub float: FloatParams,
    /// `stable` lift while settling in idle mode (the resting constant).
    pub idle_stable: f32,
    /// Linear decay rate of `hover_height` while idle (units per second).
    pub idle_decay: f32,
    /// Forward thrust rate (units per second of held input).
    pub thrust: f32,
    /// Yaw torque rate for left/right steering.
    pub yaw: f32,
    /// Pitch torque rate accompanying forward/backward input.
    pub pitch: f32,
    /// Roll torque rate accompanying left/right steering.
    pub roll: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            balance: BalanceParams::default(),
            float: FloatParams::default(),
            idle_stable: 32.0,
            idle_decay: 10.0,
            thrust: 24.0,
            yaw: 8.0,
            pitch: 4.0,
            roll: 8.0,
        }
    }
}

impl FlightConfig {
    /// Builder: set the balance gains.
    pub fn with_balance(mut self, balance: BalanceParams) -> Self {
        self.balance = balance;
        self
    }

    /// Builder: set the active-mode float targets.
    pub fn with_float(mut self, float: FloatParams) -> Self {
        self.float = float;
        self
    }

    /// Builder: set the active hover height.
    pub fn with_hover_height(mut self, height: f32) -> Self {
        self.float.hover_height = height;
        self
    }

    /// Builder: set the tilt spring and damping gains.
    pub fn with_tilt_spring(mut self, spring: f32, damping: f32) -> Self {
        self.balance.spring_xz = spring;
        self.balance.damping_xz = damping;
        self
    }

    /// Builder: set the thrust rate.
    pub fn with_thrust(mut self, thrust: f32) -> Self {
        self.thrust = thrust;
        self
    }

    /// Builder: set the steering torque rates.
    pub fn with_steering(mut self, yaw: f32, pitch: f32, roll: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self.roll = roll;
        self
    }

    /// The ground sensor range: twice the active hover height, so the
    /// proportional term still sees terrain well above the target.
    #[inline]
    pub fn sensor_range(&self) -> f32 {
        self.float.hover_height * 2.0
    }
}

/// Central per-craft state, rewritten each simulation tick.
///
/// Holds the engine mode, the live float targets the mode machine manages,
/// the most recent ground sensor result and the visual-only engine tilt
/// indicator. Spawn it alongside [`FlightConfig`] and
/// [`crate::controls::ControlState`].
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct FlightController {
    /// Current engine mode. Starts idle.
    pub engine: EngineMode,
    /// Live float targets. Pinned to the config's flying constants while
    /// active; `hover_height` decays toward zero while idle.
    pub float: FloatParams,
    /// Most recent downward raycast result, written by the backend's
    /// sensing system. `None` when no terrain is within sensor range.
    #[reflect(ignore)]
    pub ground: Option<GroundHit>,
    /// Visual engine tilt indicator (x = pitch, y = roll), driven by input
    /// while the engine runs. Purely cosmetic; no physical effect.
    pub engine_tilt: Vec2,
    /// Previous tick's toggle flag, for rising-edge detection.
    pub(crate) engine_toggle_prev: bool,
}

impl Default for FlightController {
    fn default() -> Self {
        Self {
            engine: EngineMode::Idle,
            float: FloatParams {
                // Grounded at startup: no hover target until the engine is
                // switched on, resting lift bias only.
                hover_height: 0.0,
                stable: 32.0,
                lift: 32.0,
            },
            ground: None,
            engine_tilt: Vec2::ZERO,
            engine_toggle_prev: false,
        }
    }
}

impl FlightController {
    /// Create a controller in idle mode, settled on the ground.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller that starts with the engine running.
    pub fn flying(config: &FlightConfig) -> Self {
        Self {
            engine: EngineMode::Active,
            float: config.float,
            ..default()
        }
    }

    /// Sensed distance to terrain, if any.
    pub fn ground_distance(&self) -> Option<f32> {
        self.ground.as_ref().map(|hit| hit.distance)
    }

    /// Whether the engine is currently running.
    pub fn engine_on(&self) -> bool {
        self.engine == EngineMode::Active
    }
}
