//! Body lifecycle driven by declarative layout snapshots.
//!
//! The host hands over the full set of physics-backed elements each pass; the
//! registry diffs that snapshot against the previous one and applies the
//! minimal set of engine mutations. Bodies keep their position and velocity
//! across updates; only creation reads the declared initial placement.

use std::collections::{HashMap, HashSet};

use rapier2d::dynamics::RigidBodyHandle;

use super::world::PhysicsWorld;
use super::{LayoutItem, SyncSummary};
use crate::conversion::LayoutToSimulation;
use crate::error::{PhysicsLayoutError, SyncResult};
use crate::shapes::fixtures::body_fixtures;
use glam::Vec2;

/// Result of one snapshot diff, including the ids whose bodies were torn down
/// so the caller can drop dependent state (transformations, drag joints).
pub(crate) struct SyncOutcome {
    pub summary: SyncSummary,
    pub removed_ids: Vec<String>,
}

#[derive(Default)]
pub(crate) struct BodyRegistry {
    handles: HashMap<String, RigidBodyHandle>,
    previous: HashMap<String, LayoutItem>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self, id: &str) -> Option<RigidBodyHandle> {
        self.handles.get(id).copied()
    }

    pub fn iter_handles(&self) -> impl Iterator<Item = (&String, RigidBodyHandle)> {
        self.handles.iter().map(|(id, handle)| (id, *handle))
    }

    /// Reconciles the engine against a full layout snapshot. Removals are
    /// applied first so an id that disappears and reappears in consecutive
    /// snapshots gets a fresh body rather than a patched one.
    pub fn sync(
        &mut self,
        world: &mut PhysicsWorld,
        mapper: &LayoutToSimulation,
        container_size: Option<Vec2>,
        items: &[LayoutItem],
    ) -> SyncResult<SyncOutcome> {
        let mut summary = SyncSummary::default();

        let current_ids: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
        let removed_ids: Vec<String> = self
            .previous
            .keys()
            .filter(|id| !current_ids.contains(id.as_str()))
            .cloned()
            .collect();
        for id in &removed_ids {
            self.remove(world, id);
            summary.removed += 1;
        }

        for item in items {
            match self.previous.get(&item.id).cloned() {
                None => {
                    self.create(world, mapper, container_size, item)?;
                    summary.added += 1;
                }
                Some(old) if &old != item => {
                    self.update(world, mapper, old, item)?;
                    summary.updated += 1;
                }
                Some(_) => {}
            }
        }

        Ok(SyncOutcome {
            summary,
            removed_ids,
        })
    }

    /// Adds or patches a single element without touching the rest.
    pub fn upsert(
        &mut self,
        world: &mut PhysicsWorld,
        mapper: &LayoutToSimulation,
        container_size: Option<Vec2>,
        item: &LayoutItem,
    ) -> SyncResult<()> {
        match self.previous.get(&item.id).cloned() {
            None => self.create(world, mapper, container_size, item),
            Some(old) if &old != item => self.update(world, mapper, old, item),
            Some(_) => Ok(()),
        }
    }

    /// Tears down a single element's body. Returns false when the id was
    /// never registered.
    pub fn remove(&mut self, world: &mut PhysicsWorld, id: &str) -> bool {
        self.previous.remove(id);
        match self.handles.remove(id) {
            Some(handle) => {
                world.remove_body(handle);
                true
            }
            None => false,
        }
    }

    fn create(
        &mut self,
        world: &mut PhysicsWorld,
        mapper: &LayoutToSimulation,
        container_size: Option<Vec2>,
        item: &LayoutItem,
    ) -> SyncResult<()> {
        let container_size = container_size.ok_or(PhysicsLayoutError::ContainerNotSynced)?;

        let world_shape = mapper.to_world_shape(&item.shape)?;
        let fixtures = body_fixtures(&world_shape)?;
        let position = mapper.world_position_from_center(
            item.initial_translation,
            Vec2::new(item.width, item.height),
            container_size,
        );
        let impulse = item.initial_impulse.map(|i| mapper.to_world_vector(i));

        let handle = world.create_body(position, &fixtures, &item.body, item.is_static, impulse);
        tracing::debug!(id = %item.id, ?position, "created body");

        self.handles.insert(item.id.clone(), handle);
        self.previous.insert(item.id.clone(), item.clone());
        Ok(())
    }

    fn update(
        &mut self,
        world: &mut PhysicsWorld,
        mapper: &LayoutToSimulation,
        old: LayoutItem,
        item: &LayoutItem,
    ) -> SyncResult<()> {
        let Some(handle) = self.handles.get(&item.id).copied() else {
            return Ok(());
        };

        if old.shape != item.shape || old.is_static != item.is_static {
            let world_shape = mapper.to_world_shape(&item.shape)?;
            let fixtures = body_fixtures(&world_shape)?;
            world.replace_fixtures(handle, &fixtures, &item.body, item.is_static);
            tracing::debug!(id = %item.id, "rebuilt body fixtures");
        } else if old.body != item.body {
            world.update_material(handle, &item.body);
        }
        // Changes to the initial placement or impulse after creation are
        // intentionally ignored; the simulation owns the position now.

        self.previous.insert(item.id.clone(), item.clone());
        Ok(())
    }
}
