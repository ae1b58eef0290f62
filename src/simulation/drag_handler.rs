//! Drag constraint bookkeeping.
//!
//! One spring joint per (body, pointer) pair. Down creates, Move retargets,
//! Up removes; events that reference a joint or body that no longer exists
//! are silently dropped so late pointer streams never fault the simulation.

use std::collections::HashMap;

use glam::Vec2;
use rapier2d::dynamics::RigidBodyHandle;

use super::world::PhysicsWorld;
use crate::drag::{DragConfig, TouchEvent, TouchKind};

/// A live spring constraint between a body-local anchor and a world-space
/// pointer target. Spring constants are derived from the config and the body
/// mass at application time, so config changes take effect mid-drag.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DragJoint {
    pub body: RigidBodyHandle,
    /// Grab point in the body's local frame, fixed at Down.
    pub local_anchor: Vec2,
    /// Pointer position in world space, refreshed on every Move.
    pub target: Vec2,
    pub frequency: f32,
    pub damping_ratio: f32,
    pub max_force: f32,
}

#[derive(Debug, Default)]
pub(crate) struct DragHandler {
    joints: HashMap<(String, u64), DragJoint>,
}

impl DragHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes one world-space touch event to its keyed joint.
    pub fn drag(
        &mut self,
        world: &PhysicsWorld,
        body: RigidBodyHandle,
        body_id: &str,
        event: &TouchEvent,
        config: &DragConfig,
    ) {
        let key = (body_id.to_owned(), event.pointer_id);
        match event.kind {
            TouchKind::Down | TouchKind::Move => {
                // The touch offset is relative to the element center, which is
                // exactly the body-local frame.
                let Some(target) = world.world_point(body, event.offset) else {
                    return;
                };
                let joint = self.joints.entry(key).or_insert_with(|| DragJoint {
                    body,
                    local_anchor: event.offset,
                    target,
                    frequency: config.frequency,
                    damping_ratio: config.damping_ratio,
                    max_force: config.max_force,
                });
                joint.target = target;
                joint.frequency = config.frequency;
                joint.damping_ratio = config.damping_ratio;
                joint.max_force = config.max_force;
            }
            TouchKind::Up => {
                self.joints.remove(&key);
            }
        }
    }

    /// Drops every joint attached to the given body, for when the body is
    /// removed mid-drag and no Up will ever arrive.
    pub fn remove_body_joints(&mut self, body_id: &str) {
        self.joints.retain(|(id, _), _| id != body_id);
    }

    pub fn active(&self) -> impl Iterator<Item = &DragJoint> + Clone {
        self.joints.values()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[cfg(test)]
    pub fn joint(&self, body_id: &str, pointer_id: u64) -> Option<&DragJoint> {
        self.joints.get(&(body_id.to_owned(), pointer_id))
    }
}
