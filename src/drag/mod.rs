//! Pointer-driven drag input.
//!
//! The host's gesture recognizer classifies raw pointer input into a
//! down/move/up stream; each event carries the pointer id and the contact
//! offset relative to the touched element's center. The simulation turns that
//! stream into spring constraints between the body and a moving target point.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchKind {
    Down,
    Move,
    Up,
}

/// One classified pointer event. The offset is in layout units when handed to
/// the facade and in world units once converted for the drag handler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub pointer_id: u64,
    pub offset: Vec2,
    pub kind: TouchKind,
}

impl TouchEvent {
    pub fn down(pointer_id: u64, offset: Vec2) -> Self {
        Self {
            pointer_id,
            offset,
            kind: TouchKind::Down,
        }
    }

    pub fn moved(pointer_id: u64, offset: Vec2) -> Self {
        Self {
            pointer_id,
            offset,
            kind: TouchKind::Move,
        }
    }

    pub fn up(pointer_id: u64, offset: Vec2) -> Self {
        Self {
            pointer_id,
            offset,
            kind: TouchKind::Up,
        }
    }
}

/// Spring parameters for the constraint connecting a dragged body to the
/// pointer. Each pointer on a body gets its own constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Oscillation frequency of the drag spring, in Hz.
    pub frequency: f32,
    /// Damping ratio; 1.0 is critically damped.
    pub damping_ratio: f32,
    /// Upper bound on the force the spring may exert, in world units.
    pub max_force: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            frequency: 15.0,
            damping_ratio: 0.3,
            max_force: 10_000.0,
        }
    }
}

impl DragConfig {
    /// A weaker preset that lets heavy bodies lag behind the pointer.
    pub fn gentle() -> Self {
        Self {
            max_force: 700.0,
            ..Self::default()
        }
    }
}
