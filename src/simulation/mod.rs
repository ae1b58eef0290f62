//! The simulation facade.
//!
//! [`Simulation`] is the single entry point hosts talk to: declarative sync
//! calls mutate the physics world under one lock, the stepping loop advances
//! it, and transform snapshots come back out through a read-optimized map.
//! Cloning a [`Simulation`] yields another handle to the same world, so the
//! stepping task and the layout thread can share one instance.

mod border;
mod drag_handler;
mod registry;
mod stepper;
mod world;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{BodyConfig, SimulationConfig};
use crate::conversion::{LayoutToSimulation, SimulationToLayout};
use crate::drag::{DragConfig, TouchEvent};
use crate::error::SyncResult;
use crate::shapes::Shape;
use border::BorderSynchronizer;
use drag_handler::DragHandler;
use registry::BodyRegistry;
use world::PhysicsWorld;

/// One physics-backed layout element, as declared by the host.
///
/// `initial_translation` is the element's top-left position inside the
/// container at creation time; it is only read when the body is first created.
/// Afterwards the simulation owns the position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    pub id: String,
    pub width: f32,
    pub height: f32,
    pub shape: Shape,
    pub is_static: bool,
    pub initial_translation: Vec2,
    pub initial_impulse: Option<Vec2>,
    pub body: BodyConfig,
}

/// The container's measured size and optional boundary shape, in layout units.
/// A `None` shape keeps the container size available for placement while
/// letting bodies fall out of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderSpec {
    pub width: f32,
    pub height: f32,
    pub shape: Option<Shape>,
}

/// A body's pose, in layout units relative to the container center and
/// degrees of rotation. Hosts apply this as a graphics transform on top of
/// the element's declared layout slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    pub translation_x: f32,
    pub translation_y: f32,
    pub rotation_degrees: f32,
}

/// What one snapshot sync actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

struct SimulationState {
    world: PhysicsWorld,
    registry: BodyRegistry,
    border: BorderSynchronizer,
    drag: DragHandler,
    to_world: LayoutToSimulation,
    to_layout: SimulationToLayout,
}

/// Shared handle to one running physics simulation.
#[derive(Clone)]
pub struct Simulation {
    state: Arc<Mutex<SimulationState>>,
    transformations: Arc<RwLock<HashMap<String, Transformation>>>,
    paused: Arc<AtomicBool>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        let mut world = PhysicsWorld::new(config.gravity, config.step_frequency);
        let border = BorderSynchronizer::new(&mut world);

        Self {
            state: Arc::new(Mutex::new(SimulationState {
                world,
                registry: BodyRegistry::new(),
                border,
                drag: DragHandler::new(),
                to_world: LayoutToSimulation::new(config.scale),
                to_layout: SimulationToLayout::new(config.scale),
            })),
            transformations: Arc::new(RwLock::new(HashMap::new())),
            paused: Arc::new(AtomicBool::new(false)),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SimulationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes gravity at runtime, in world units per second squared. Useful
    /// for tilting the world from device sensor input.
    pub fn set_gravity(&self, gravity: Vec2) {
        self.lock_state().world.set_gravity(gravity);
    }

    /// Reconciles the world against the host's full set of physics-backed
    /// elements. Elements missing from the snapshot lose their bodies, new
    /// ones get bodies at their declared initial placement, and changed ones
    /// are patched in place.
    pub fn sync_bodies(&self, items: &[LayoutItem]) -> SyncResult<SyncSummary> {
        let mut state = self.lock_state();
        let SimulationState {
            world,
            registry,
            border,
            drag,
            to_world,
            ..
        } = &mut *state;

        let container = border.container_size();
        let outcome = registry.sync(world, to_world, container, items)?;

        if !outcome.removed_ids.is_empty() {
            let mut published = self
                .transformations
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            for id in &outcome.removed_ids {
                drag.remove_body_joints(id);
                published.remove(id);
            }
        }

        Ok(outcome.summary)
    }

    /// Adds, patches, or (when `item` is `None`) removes a single element.
    pub fn sync_body(&self, id: &str, item: Option<&LayoutItem>) -> SyncResult<()> {
        let mut state = self.lock_state();
        let SimulationState {
            world,
            registry,
            border,
            drag,
            to_world,
            ..
        } = &mut *state;

        match item {
            Some(item) => {
                let container = border.container_size();
                registry.upsert(world, to_world, container, item)
            }
            None => {
                if registry.remove(world, id) {
                    drag.remove_body_joints(id);
                    self.transformations
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .remove(id);
                }
                Ok(())
            }
        }
    }

    /// Applies the container's size and boundary shape. Must run before the
    /// first body sync; body placement depends on the container size.
    pub fn sync_border(&self, spec: BorderSpec) -> SyncResult<()> {
        let mut state = self.lock_state();
        let SimulationState {
            world,
            border,
            to_world,
            ..
        } = &mut *state;
        border.sync(world, to_world, spec)
    }

    /// Feeds one pointer event into the drag machinery. Events for unknown
    /// body ids are dropped; a gesture can outlive the element it grabbed.
    pub fn drag(&self, body_id: &str, event: TouchEvent, config: &DragConfig) {
        let mut state = self.lock_state();
        let SimulationState {
            world,
            registry,
            drag,
            to_world,
            ..
        } = &mut *state;

        let Some(handle) = registry.handle(body_id) else {
            tracing::trace!(body_id, "drag event for unknown body dropped");
            return;
        };
        let world_event = to_world.convert_touch_event(&event);
        drag.drag(world, handle, body_id, &world_event, config);
    }

    /// Advances the simulation by a slice of wall-clock time and publishes a
    /// fresh transformation snapshot. The engine consumes the elapsed time in
    /// fixed substeps; leftover time carries into the next call.
    pub fn step(&self, elapsed: Duration) {
        let mut state = self.lock_state();
        let SimulationState {
            world,
            registry,
            drag,
            to_layout,
            ..
        } = &mut *state;

        world.advance(elapsed.as_secs_f32(), drag.active());

        let mut published: HashMap<String, Transformation> = HashMap::new();
        for (id, handle) in registry.iter_handles() {
            if let Some((position, angle)) = world.body_transform(handle) {
                let layout = to_layout.to_layout_vector(position);
                published.insert(
                    id.clone(),
                    Transformation {
                        translation_x: layout.x,
                        translation_y: layout.y,
                        rotation_degrees: angle.to_degrees(),
                    },
                );
            }
        }

        *self
            .transformations
            .write()
            .unwrap_or_else(PoisonError::into_inner) = published;
    }

    /// Snapshot of every body's current pose, keyed by element id.
    pub fn transformations(&self) -> HashMap<String, Transformation> {
        self.transformations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn transformation(&self, id: &str) -> Option<Transformation> {
        self.transformations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .copied()
    }

    /// Freezes stepping without tearing anything down. Wall-clock time spent
    /// paused is not integrated on resume.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
