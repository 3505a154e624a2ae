//! Input sampling.
//!
//! [`ControlState`] is a persistent boolean snapshot of the craft's controls,
//! maintained from keyboard state by [`sample_flight_controls`]. The tick
//! logic only ever reads the snapshot; sampling runs at event cadence in
//! `Update`, so last-write-wins is all the synchronization needed.

use bevy::prelude::*;

/// Boolean control snapshot for one craft.
///
/// Each flag is true while its key is held. `engine_toggle` is a held flag
/// as well — the engine mode machine detects its rising edge, so holding the
/// key across ticks flips the mode exactly once per press.
///
/// Only the input sampler writes this component; AI or network drivers can
/// substitute their own writer and set the flags directly.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component)]
pub struct ControlState {
    /// Forward thrust / nose-down pitch input.
    pub forward: bool,
    /// Backward thrust / nose-up pitch input.
    pub backward: bool,
    /// Left yaw / roll input.
    pub left: bool,
    /// Right yaw / roll input.
    pub right: bool,
    /// Engine mode toggle (edge-triggered by the mode machine).
    pub engine_toggle: bool,
}

impl ControlState {
    /// Signed drive input: `1.0` forward, `-1.0` backward, `0.0` neither or both.
    #[inline]
    pub fn drive(&self) -> f32 {
        (self.forward as i8 - self.backward as i8) as f32
    }

    /// Signed steer input: `1.0` left, `-1.0` right, `0.0` neither or both.
    #[inline]
    pub fn steer(&self) -> f32 {
        (self.left as i8 - self.right as i8) as f32
    }

    /// Whether any directional input is held.
    pub fn is_active(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Rebindable key assignments for the flight controls.
#[derive(Resource, Debug, Clone, Copy)]
pub struct FlightKeyBindings {
    /// Forward thrust key.
    pub forward: KeyCode,
    /// Backward thrust key.
    pub backward: KeyCode,
    /// Left steer key.
    pub left: KeyCode,
    /// Right steer key.
    pub right: KeyCode,
    /// Engine toggle key.
    pub engine_toggle: KeyCode,
}

impl Default for FlightKeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::ArrowUp,
            backward: KeyCode::ArrowDown,
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
            engine_toggle: KeyCode::Space,
        }
    }
}

/// Maintains [`ControlState`] from the keyboard.
///
/// `ButtonInput::pressed` already carries down/up edge semantics — OS key
/// repeat never reaches it — so writing the held state every frame matches
/// the edge-listener contract without any debouncing of our own.
///
/// Tolerates a missing keyboard resource (headless tests) by leaving the
/// snapshots untouched.
pub fn sample_flight_controls(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    bindings: Res<FlightKeyBindings>,
    mut q_controls: Query<&mut ControlState>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };

    for mut controls in &mut q_controls {
        let sampled = ControlState {
            forward: keyboard.pressed(bindings.forward),
            backward: keyboard.pressed(bindings.backward),
            left: keyboard.pressed(bindings.left),
            right: keyboard.pressed(bindings.right),
            engine_toggle: keyboard.pressed(bindings.engine_toggle),
        };

        // Avoid change-detection churn while the keyboard is quiet.
        if *controls != sampled {
            *controls = sampled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_combines_forward_and_backward() {
        let mut controls = ControlState::default();
        assert_eq!(controls.drive(), 0.0);

        controls.forward = true;
        assert_eq!(controls.drive(), 1.0);

        controls.backward = true;
        assert_eq!(controls.drive(), 0.0);

        controls.forward = false;
        assert_eq!(controls.drive(), -1.0);
    }

    #[test]
    fn steer_combines_left_and_right() {
        let mut controls = ControlState::default();
        controls.left = true;
        assert_eq!(controls.steer(), 1.0);

        controls.right = true;
        assert_eq!(controls.steer(), 0.0);

        controls.left = false;
        assert_eq!(controls.steer(), -1.0);
    }

    #[test]
    fn is_active_ignores_engine_toggle() {
        let mut controls = ControlState::default();
        controls.engine_toggle = true;
        assert!(!controls.is_active());

        controls.right = true;
        assert!(controls.is_active());
    }

    #[test]
    fn sampler_writes_held_keys() {
        let mut app = App::new();
        app.init_resource::<FlightKeyBindings>();
        app.add_systems(Update, sample_flight_controls);

        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ArrowUp);
        keyboard.press(KeyCode::Space);
        app.insert_resource(keyboard);

        let craft = app.world_mut().spawn(ControlState::default()).id();
        app.update();

        let controls = app.world().get::<ControlState>(craft).unwrap();
        assert!(controls.forward);
        assert!(controls.engine_toggle);
        assert!(!controls.backward);
        assert!(!controls.left);
        assert!(!controls.right);
    }

    #[test]
    fn sampler_clears_released_keys() {
        let mut app = App::new();
        app.init_resource::<FlightKeyBindings>();
        app.add_systems(Update, sample_flight_controls);

        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ArrowLeft);
        app.insert_resource(keyboard);

        let craft = app.world_mut().spawn(ControlState::default()).id();
        app.update();
        assert!(app.world().get::<ControlState>(craft).unwrap().left);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .release(KeyCode::ArrowLeft);
        app.update();
        assert!(!app.world().get::<ControlState>(craft).unwrap().left);
    }

    #[test]
    fn sampler_no_ops_without_keyboard() {
        let mut app = App::new();
        app.init_resource::<FlightKeyBindings>();
        app.add_systems(Update, sample_flight_controls);

        let craft = app
            .world_mut()
            .spawn(ControlState {
                forward: true,
                ..default()
            })
            .id();
        app.update();

        // Snapshot untouched when no keyboard resource exists.
        assert!(app.world().get::<ControlState>(craft).unwrap().forward);
    }
}
