//! Container border maintenance.
//!
//! A single fixed body carries the boundary chain. The host re-sends the
//! border on every layout pass; the synchronizer caches the last applied spec
//! and only rebuilds fixtures when it actually changed.

use glam::Vec2;
use rapier2d::dynamics::RigidBodyHandle;

use super::world::PhysicsWorld;
use super::BorderSpec;
use crate::config::BodyConfig;
use crate::conversion::LayoutToSimulation;
use crate::error::SyncResult;
use crate::shapes::border::border_fixtures;

pub(crate) struct BorderSynchronizer {
    handle: RigidBodyHandle,
    applied: Option<BorderSpec>,
}

impl BorderSynchronizer {
    pub fn new(world: &mut PhysicsWorld) -> Self {
        Self {
            handle: world.create_bare_fixed(),
            applied: None,
        }
    }

    /// Container size in layout units, available once the first border spec
    /// has been applied. Body placement needs this for the center-origin
    /// mapping even when the border has no collision shape.
    pub fn container_size(&self) -> Option<Vec2> {
        self.applied
            .as_ref()
            .map(|spec| Vec2::new(spec.width, spec.height))
    }

    pub fn sync(
        &mut self,
        world: &mut PhysicsWorld,
        mapper: &LayoutToSimulation,
        spec: BorderSpec,
    ) -> SyncResult<()> {
        if self.applied.as_ref() == Some(&spec) {
            return Ok(());
        }

        // Build the replacement fixtures before touching the world, so a
        // rejected spec leaves the previous border fully intact.
        let fixtures = match &spec.shape {
            Some(shape) => {
                let world_shape = mapper.to_world_shape(shape)?;
                Some(border_fixtures(&world_shape)?)
            }
            None => None,
        };

        world.clear_fixtures(self.handle);
        if let Some(fixtures) = fixtures {
            world.attach_fixtures(self.handle, &fixtures, &BodyConfig::default());
            tracing::debug!(width = spec.width, height = spec.height, "rebuilt border");
        }

        self.applied = Some(spec);
        Ok(())
    }
}
