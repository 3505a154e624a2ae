//! Frame integration.
//!
//! One invocation of [`drive_flight_controllers`] is one simulation tick.
//! Each control law adds its contribution to a stack-local accumulator,
//! which is applied to the rigid body exactly once at the end of the tick.
//! The laws never touch the body directly.

use bevy::prelude::*;

use crate::backend::FlightPhysicsBackend;
use crate::balance::balance_torque;
use crate::config::{FlightConfig, FlightController};
use crate::controls::ControlState;
use crate::float::float_lift;
use crate::locomotion::{steering_torque, thrust_impulse};
use crate::mode::{advance_engine_mode, float_enabled, locomotion_enabled};

/// Floor for the tick delta to keep stalled frames from zeroing (or a
/// recovering frame from exploding) the dt-scaled control terms.
pub const MIN_TICK_DT: f32 = 0.001;

/// Cosmetic engine tilt limit, radians.
const MAX_ENGINE_TILT: f32 = 0.35;

/// Per-tick aggregation buffer for the control law outputs.
///
/// Lives on the stack for the duration of one tick: zeroed at tick start,
/// consumed by the single application at tick end, never carried across
/// ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameAccumulator {
    /// Accumulated linear impulse.
    pub impulse: Vec3,
    /// Accumulated torque impulse.
    pub torque_impulse: Vec3,
}

impl FrameAccumulator {
    /// Add a linear impulse contribution.
    #[inline]
    pub fn add_impulse(&mut self, impulse: Vec3) {
        self.impulse += impulse;
    }

    /// Add a torque impulse contribution.
    #[inline]
    pub fn add_torque(&mut self, torque_impulse: Vec3) {
        self.torque_impulse += torque_impulse;
    }
}

/// Run one simulation tick for every craft.
///
/// Per craft: fetch the body snapshot (absent body skips the whole tick),
/// advance the engine mode machine, run balance unconditionally and
/// float/locomotion as the mode allows, then apply the accumulated impulse
/// and torque impulse through the backend exactly once. Also refreshes the
/// visual-only engine tilt indicator.
pub fn drive_flight_controllers<B: FlightPhysicsBackend>(world: &mut World) {
    let dt = B::fixed_timestep(world).max(MIN_TICK_DT);

    let crafts: Vec<Entity> = world
        .query_filtered::<Entity, (
            With<FlightController>,
            With<FlightConfig>,
            With<ControlState>,
        )>()
        .iter(world)
        .collect();

    for entity in crafts {
        // The physics world owns the body; a craft whose body is not live
        // this tick is skipped entirely and retried next tick.
        let Some(body) = B::body_state(world, entity) else {
            continue;
        };

        let (config, controls) = {
            let Some(config) = world.get::<FlightConfig>(entity) else {
                continue;
            };
            let Some(controls) = world.get::<ControlState>(entity) else {
                continue;
            };
            (*config, *controls)
        };
        let Some(mut controller) = world.get::<FlightController>(entity).cloned() else {
            continue;
        };

        advance_engine_mode(&mut controller, &config, &controls, dt);

        let mut frame = FrameAccumulator::default();

        frame.add_torque(balance_torque(&config.balance, body.rotation, body.angvel, dt));

        if float_enabled(&controller) {
            frame.add_impulse(float_lift(
                &controller.float,
                config.balance.damping_y,
                controller.ground_distance(),
                body.linvel.y,
                dt,
            ));
        }

        if locomotion_enabled(&controller) {
            frame.add_impulse(thrust_impulse(&config, &controls, body.rotation, dt));
            frame.add_torque(steering_torque(&config, &controls, body.rotation, dt));
        }

        update_engine_tilt(&mut controller, &controls, dt);

        if let Some(mut stored) = world.get_mut::<FlightController>(entity) {
            *stored = controller;
        }

        B::apply_impulse(world, entity, frame.impulse);
        B::apply_torque_impulse(world, entity, frame.torque_impulse);
    }
}

/// Blend the cosmetic engine tilt toward the current input. No physics.
fn update_engine_tilt(controller: &mut FlightController, controls: &ControlState, dt: f32) {
    let target = if controller.engine_on() {
        Vec2::new(controls.drive(), controls.steer()) * MAX_ENGINE_TILT
    } else {
        Vec2::ZERO
    };
    controller.engine_tilt = controller.engine_tilt.lerp(target, (10.0 * dt).min(1.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BodyState, NoOpBackendPlugin};
    use crate::mode::EngineMode;
    use crate::sensor::GroundHit;
    use crate::FlightControllerPlugin;

    /// Stand-in rigid body for integrator tests.
    #[derive(Component, Debug, Clone, Copy)]
    struct MockBody {
        translation: Vec3,
        rotation: Quat,
        linvel: Vec3,
        angvel: Vec3,
    }

    impl Default for MockBody {
        fn default() -> Self {
            Self {
                translation: Vec3::new(0.0, 4.0, 0.0),
                rotation: Quat::IDENTITY,
                linvel: Vec3::ZERO,
                angvel: Vec3::ZERO,
            }
        }
    }

    /// Records every impulse application the integrator performs.
    #[derive(Resource, Default)]
    struct AppliedLog {
        impulses: Vec<(Entity, Vec3)>,
        torques: Vec<(Entity, Vec3)>,
    }

    struct MockBackend;

    impl FlightPhysicsBackend for MockBackend {
        fn plugin() -> impl Plugin {
            NoOpBackendPlugin
        }

        fn body_state(world: &World, entity: Entity) -> Option<BodyState> {
            world.get::<MockBody>(entity).map(|body| BodyState {
                translation: body.translation,
                rotation: body.rotation,
                linvel: body.linvel,
                angvel: body.angvel,
            })
        }

        fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
            world
                .resource_mut::<AppliedLog>()
                .impulses
                .push((entity, impulse));
        }

        fn apply_torque_impulse(world: &mut World, entity: Entity, torque_impulse: Vec3) {
            world
                .resource_mut::<AppliedLog>()
                .torques
                .push((entity, torque_impulse));
        }
    }

    fn create_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(FlightControllerPlugin::<MockBackend>::default());
        app.init_resource::<AppliedLog>();
        app.insert_resource(Time::<Fixed>::from_hz(60.0));
        app
    }

    fn tick(app: &mut App) {
        app.world_mut().run_schedule(FixedUpdate);
    }

    fn spawn_craft(app: &mut App, body: Option<MockBody>) -> Entity {
        let mut entity = app.world_mut().spawn((
            FlightController::new(),
            FlightConfig::default(),
            ControlState::default(),
        ));
        if let Some(body) = body {
            entity.insert(body);
        }
        entity.id()
    }

    #[test]
    fn applies_impulse_and_torque_exactly_once_per_tick() {
        let mut app = create_test_app();
        let craft = spawn_craft(&mut app, Some(MockBody::default()));

        tick(&mut app);
        {
            let log = app.world().resource::<AppliedLog>();
            assert_eq!(log.impulses.len(), 1);
            assert_eq!(log.torques.len(), 1);
            assert_eq!(log.impulses[0].0, craft);
        }

        tick(&mut app);
        tick(&mut app);
        let log = app.world().resource::<AppliedLog>();
        assert_eq!(log.impulses.len(), 3);
        assert_eq!(log.torques.len(), 3);
    }

    #[test]
    fn missing_body_skips_the_tick() {
        let mut app = create_test_app();
        let craft = spawn_craft(&mut app, None);

        tick(&mut app);
        {
            let log = app.world().resource::<AppliedLog>();
            assert!(log.impulses.is_empty());
            assert!(log.torques.is_empty());
        }

        // Body shows up later: the craft resumes automatically.
        app.world_mut().entity_mut(craft).insert(MockBody::default());
        tick(&mut app);
        let log = app.world().resource::<AppliedLog>();
        assert_eq!(log.impulses.len(), 1);
    }

    #[test]
    fn balance_runs_in_both_modes() {
        let mut app = create_test_app();
        let tilted = MockBody {
            rotation: Quat::from_rotation_x(0.2),
            ..default()
        };
        let craft = spawn_craft(&mut app, Some(tilted));

        // Idle and settled: no float, no locomotion, only balance output.
        tick(&mut app);
        let log = app.world().resource::<AppliedLog>();
        assert_eq!(log.impulses[0].1, Vec3::ZERO);
        assert!(log.torques[0].1.x < 0.0);

        let controller = app.world().get::<FlightController>(craft).unwrap();
        assert_eq!(controller.engine, EngineMode::Idle);
    }

    #[test]
    fn engine_toggle_enables_lift_and_thrust() {
        let mut app = create_test_app();
        let craft = spawn_craft(&mut app, Some(MockBody::default()));

        // Press the toggle and hold forward.
        {
            let mut controls = app.world_mut().get_mut::<ControlState>(craft).unwrap();
            controls.engine_toggle = true;
            controls.forward = true;
        }
        // Feed the sensor a terrain hit below the hover target.
        {
            let mut controller = app.world_mut().get_mut::<FlightController>(craft).unwrap();
            controller.ground = Some(GroundHit::new(2.0, Vec3::ZERO, None));
        }

        tick(&mut app);

        let controller = app.world().get::<FlightController>(craft).unwrap();
        assert_eq!(controller.engine, EngineMode::Active);
        assert_eq!(controller.float, FlightConfig::default().float);

        let log = app.world().resource::<AppliedLog>();
        let impulse = log.impulses[0].1;
        // Lift (below target) plus forward thrust.
        assert!(impulse.y > 0.0);
        assert!(impulse.z > 0.0);
    }

    #[test]
    fn idle_craft_with_height_settles_without_locomotion() {
        let mut app = create_test_app();
        let craft = spawn_craft(&mut app, Some(MockBody::default()));

        {
            let mut controller = app.world_mut().get_mut::<FlightController>(craft).unwrap();
            controller.float.hover_height = 4.0;
            controller.ground = Some(GroundHit::new(4.0, Vec3::ZERO, None));
        }
        {
            let mut controls = app.world_mut().get_mut::<ControlState>(craft).unwrap();
            controls.forward = true;
        }

        tick(&mut app);

        let log = app.world().resource::<AppliedLog>();
        let impulse = log.impulses[0].1;
        // Float still carries the craft down gently, but no thrust.
        assert!(impulse.y > 0.0);
        assert_eq!(impulse.z, 0.0);

        let controller = app.world().get::<FlightController>(craft).unwrap();
        assert!(controller.float.hover_height < 4.0);
    }

    #[test]
    fn engine_tilt_tracks_input_while_active_only() {
        let mut app = create_test_app();
        let craft = spawn_craft(&mut app, Some(MockBody::default()));

        {
            let mut controls = app.world_mut().get_mut::<ControlState>(craft).unwrap();
            controls.engine_toggle = true;
            controls.forward = true;
        }
        tick(&mut app);
        tick(&mut app);

        let tilt_active = app
            .world()
            .get::<FlightController>(craft)
            .unwrap()
            .engine_tilt;
        assert!(tilt_active.x > 0.0);

        // Engine off again: tilt relaxes toward zero.
        {
            let mut controls = app.world_mut().get_mut::<ControlState>(craft).unwrap();
            controls.engine_toggle = false;
        }
        tick(&mut app);
        {
            let mut controls = app.world_mut().get_mut::<ControlState>(craft).unwrap();
            controls.engine_toggle = true;
        }
        tick(&mut app);
        tick(&mut app);
        tick(&mut app);
        tick(&mut app);

        let controller = app.world().get::<FlightController>(craft).unwrap();
        assert_eq!(controller.engine, EngineMode::Idle);
        assert!(controller.engine_tilt.x < tilt_active.x);
    }

    #[test]
    fn accumulator_sums_contributions() {
        let mut frame = FrameAccumulator::default();
        frame.add_impulse(Vec3::Y);
        frame.add_impulse(Vec3::Z * 2.0);
        frame.add_torque(Vec3::X);

        assert_eq!(frame.impulse, Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(frame.torque_impulse, Vec3::X);
    }
}
