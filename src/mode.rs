//! Engine mode state machine.
//!
//! The craft has two modes. While [`EngineMode::Active`] the float targets
//! are pinned to the config's flying constants and locomotion responds to
//! input. While [`EngineMode::Idle`] the hover height decays linearly to
//! zero so the craft settles onto the terrain, then the float law stops and
//! the body rests under ambient damping alone. The balance law runs in both
//! modes.

use bevy::log::debug;
use bevy::prelude::*;

use crate::config::{FlightConfig, FlightController};
use crate::controls::ControlState;

/// Engine mode for a craft.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineMode {
    /// Engine off: settle toward the ground, no locomotion.
    #[default]
    Idle,
    /// Engine on: hold the hover target, locomotion active.
    Active,
}

impl EngineMode {
    /// The other mode.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Self::Idle => Self::Active,
            Self::Active => Self::Idle,
        }
    }
}

/// Advance the mode machine by one tick.
///
/// Flips the mode on the rising edge of `engine_toggle` — a key held across
/// ticks does not re-trigger until released and pressed again — then
/// rewrites the controller's live float targets for the resulting mode:
///
/// - **Active**: `hover_height`, `stable` and `lift` pinned to the config's
///   flying constants.
/// - **Idle**, hover height still above zero: `hover_height` decays by
///   `idle_decay * dt`, floored at zero, and `stable` is pinned to the
///   resting constant. Once the height reaches zero both are left frozen.
pub fn advance_engine_mode(
    controller: &mut FlightController,
    config: &FlightConfig,
    controls: &ControlState,
    dt: f32,
) {
    let rising_edge = controls.engine_toggle && !controller.engine_toggle_prev;
    controller.engine_toggle_prev = controls.engine_toggle;

    if rising_edge {
        let next = controller.engine.toggled();
        debug!("engine mode {:?} -> {:?}", controller.engine, next);
        controller.engine = next;
    }

    match controller.engine {
        EngineMode::Active => {
            controller.float = config.float;
        }
        EngineMode::Idle => {
            if controller.float.hover_height > 0.0 {
                controller.float.hover_height =
                    (controller.float.hover_height - config.idle_decay * dt).max(0.0);
                controller.float.stable = config.idle_stable;
            }
            // Fully settled: stable stays frozen at its last idle value.
        }
    }
}

/// Whether the float law runs this tick: always while active, and while
/// idling down until the hover target reaches zero.
#[inline]
pub fn float_enabled(controller: &FlightController) -> bool {
    controller.engine == EngineMode::Active || controller.float.hover_height > 0.0
}

/// Whether locomotion responds to input this tick.
#[inline]
pub fn locomotion_enabled(controller: &FlightController) -> bool {
    controller.engine == EngineMode::Active
}
