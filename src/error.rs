//! Error types for the simulation core.
//!
//! Only misconfiguration is an error here. Operations that reference an id or
//! a (body, pointer) pair that has already disappeared are expected races with
//! the host layout loop and resolve to no-ops instead.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PhysicsLayoutError {
    #[error("Shape is not supported here: {reason}")]
    UnsupportedShape { reason: String },

    #[error("Invalid shape dimensions: {reason}")]
    InvalidShape { reason: String },

    #[error("Polygon outline is degenerate: {reason}")]
    DegenerateOutline { reason: String },

    #[error("Bodies were synced before any border established the container size")]
    ContainerNotSynced,
}

pub type SyncResult<T> = Result<T, PhysicsLayoutError>;
