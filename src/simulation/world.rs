//! Thin wrapper around the rapier2d world.
//!
//! Owns every engine-side set and hides the nalgebra boundary behind glam
//! conversions. Wall-clock time is fed through a fixed-increment accumulator
//! so the engine always integrates at the configured step frequency no matter
//! how irregular the caller's cadence is.

use glam::Vec2;
use rapier2d::prelude::*;

use super::drag_handler::DragJoint;
use crate::config::BodyConfig;
use crate::shapes::fixtures::Fixture;

/// Longest stretch of wall-clock time consumed in one advance. Anything
/// beyond this (debugger pauses, suspended app) is dropped instead of being
/// integrated as a giant burst of substeps.
const MAX_FRAME_TIME: f32 = 0.25;

// -- glam <-> nalgebra conversion helpers --

fn to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn to_na_point(v: Vec2) -> nalgebra::Point2<f32> {
    nalgebra::Point2::new(v.x, v.y)
}

fn from_na_point(p: &nalgebra::Point2<f32>) -> Vec2 {
    Vec2::new(p.x, p.y)
}

pub(crate) struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    accumulator: f32,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2, step_frequency: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = step_frequency;

        Self {
            gravity: to_na(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            accumulator: 0.0,
        }
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = to_na(gravity);
    }

    /// Creates a body with the given fixtures. Rest detection is disabled so
    /// bodies keep reacting to gravity changes from sensor input.
    pub fn create_body(
        &mut self,
        position: Vec2,
        fixtures: &[Fixture],
        config: &BodyConfig,
        is_static: bool,
        initial_impulse: Option<Vec2>,
    ) -> RigidBodyHandle {
        let body_type = if is_static {
            RigidBodyType::Fixed
        } else {
            RigidBodyType::Dynamic
        };
        let rb = RigidBodyBuilder::new(body_type)
            .translation(to_na(position))
            .angular_damping(config.angular_damping)
            .can_sleep(false)
            .build();
        let handle = self.bodies.insert(rb);
        self.attach_fixtures(handle, fixtures, config);

        if let Some(impulse) = initial_impulse {
            if let Some(rb) = self.bodies.get_mut(handle) {
                rb.apply_impulse(to_na(impulse), true);
            }
        }

        handle
    }

    /// Creates the fixtureless fixed body that backs the border.
    pub fn create_bare_fixed(&mut self) -> RigidBodyHandle {
        self.bodies.insert(RigidBodyBuilder::fixed().build())
    }

    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn attach_fixtures(
        &mut self,
        handle: RigidBodyHandle,
        fixtures: &[Fixture],
        config: &BodyConfig,
    ) {
        for fixture in fixtures {
            let collider = ColliderBuilder::new(fixture.shape.clone())
                .translation(to_na(fixture.offset))
                .density(config.density)
                .friction(config.friction)
                .restitution(config.restitution)
                .build();
            self.colliders
                .insert_with_parent(collider, handle, &mut self.bodies);
        }
    }

    pub fn clear_fixtures(&mut self, handle: RigidBodyHandle) {
        let attached: Vec<ColliderHandle> = self
            .bodies
            .get(handle)
            .map(|rb| rb.colliders().to_vec())
            .unwrap_or_default();
        for collider in attached {
            self.colliders.remove(
                collider,
                &mut self.island_manager,
                &mut self.bodies,
                false,
            );
        }
    }

    /// Swaps a body's geometry in place. Position and velocity are untouched;
    /// mass is rederived from the new fixtures and the static flag.
    pub fn replace_fixtures(
        &mut self,
        handle: RigidBodyHandle,
        fixtures: &[Fixture],
        config: &BodyConfig,
        is_static: bool,
    ) {
        self.clear_fixtures(handle);
        self.attach_fixtures(handle, fixtures, config);
        if let Some(rb) = self.bodies.get_mut(handle) {
            let body_type = if is_static {
                RigidBodyType::Fixed
            } else {
                RigidBodyType::Dynamic
            };
            rb.set_body_type(body_type, true);
            rb.set_angular_damping(config.angular_damping);
        }
    }

    /// Patches fixture material in place without rebuilding geometry.
    pub fn update_material(&mut self, handle: RigidBodyHandle, config: &BodyConfig) {
        let attached: Vec<ColliderHandle> = self
            .bodies
            .get(handle)
            .map(|rb| rb.colliders().to_vec())
            .unwrap_or_default();
        for collider in attached {
            if let Some(c) = self.colliders.get_mut(collider) {
                c.set_density(config.density);
                c.set_friction(config.friction);
                c.set_restitution(config.restitution);
            }
        }
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.set_angular_damping(config.angular_damping);
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn body_transform(&self, handle: RigidBodyHandle) -> Option<(Vec2, f32)> {
        self.bodies.get(handle).map(|rb| {
            let iso = rb.position();
            (
                Vec2::new(iso.translation.x, iso.translation.y),
                iso.rotation.angle(),
            )
        })
    }

    /// Maps a body-local point through the body's current world transform.
    pub fn world_point(&self, handle: RigidBodyHandle, local: Vec2) -> Option<Vec2> {
        self.bodies
            .get(handle)
            .map(|rb| from_na_point(&(rb.position() * to_na_point(local))))
    }

    /// Consumes wall-clock time in fixed substeps, applying the drag spring
    /// forces before every substep so the constraints track the integration.
    pub fn advance<'a, I>(&mut self, elapsed: f32, drag_joints: I)
    where
        I: Iterator<Item = &'a DragJoint> + Clone,
    {
        self.accumulator = (self.accumulator + elapsed).min(MAX_FRAME_TIME);

        let dt = self.integration_parameters.dt;
        while self.accumulator >= dt {
            self.apply_drag_springs(drag_joints.clone(), dt);
            self.physics_pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.island_manager,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &(),
            );
            self.accumulator -= dt;
        }
    }

    /// Soft pin constraint: a critically-tunable spring between the body's
    /// anchor point and the pointer target, clamped to the configured maximum
    /// force. Spring constants derive from the body mass so the configured
    /// frequency means the same thing for light and heavy bodies.
    fn apply_drag_springs<'a, I>(&mut self, joints: I, dt: f32)
    where
        I: Iterator<Item = &'a DragJoint>,
    {
        for joint in joints {
            let Some(rb) = self.bodies.get_mut(joint.body) else {
                continue;
            };
            let mass = rb.mass();
            if mass <= 0.0 {
                continue;
            }

            let omega = std::f32::consts::TAU * joint.frequency;
            let stiffness = mass * omega * omega;
            let damping = 2.0 * mass * joint.damping_ratio * omega;

            let anchor = rb.position() * to_na_point(joint.local_anchor);
            let velocity = rb.velocity_at_point(&anchor);

            let mut force =
                (to_na(joint.target) - anchor.coords) * stiffness - velocity * damping;
            let magnitude = force.norm();
            if magnitude > joint.max_force {
                force *= joint.max_force / magnitude;
            }

            rb.apply_impulse_at_point(force * dt, anchor, true);
        }
    }
}
