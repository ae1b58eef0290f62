//! Shape descriptors and their conversion into physics fixtures.
//!
//! A declared element carries one [`Shape`]. The physics engine only simulates
//! convex primitives, so rounded and cut-corner rectangles are decomposed into
//! a union of balls, cuboids and triangles, and free-form polygons are reduced
//! to their convex hull.

pub mod border;
pub mod fixtures;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsLayoutError, SyncResult};

/// Recommended number of outline samples when a host flattens a free-form
/// outline into [`Shape::Polygon`] vertices.
pub const OUTLINE_SEGMENTS: usize = 1001;

/// Geometric description of a body or border outline.
///
/// Dimensions are interpreted in the units of whatever carries the shape:
/// layout units on a [`crate::LayoutItem`], world units once the coordinate
/// mapper has scaled it down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle {
        radius: f32,
    },
    Rectangle {
        width: f32,
        height: f32,
    },
    RoundedRect {
        width: f32,
        height: f32,
        corner_radius: f32,
    },
    CutCornerRect {
        width: f32,
        height: f32,
        cut_length: f32,
    },
    /// Sampled outline points, center-origin. Expected to be convex; a concave
    /// outline is reduced to its convex hull (best effort, see
    /// [`fixtures::body_fixtures`]).
    Polygon {
        vertices: Vec<Vec2>,
    },
}

impl Shape {
    /// Rejects dimensions the rasterizer cannot turn into sane fixtures.
    pub fn validate(&self) -> SyncResult<()> {
        match self {
            Shape::Circle { radius } => {
                require_positive("radius", *radius)?;
            }
            Shape::Rectangle { width, height } => {
                require_positive("width", *width)?;
                require_positive("height", *height)?;
            }
            Shape::RoundedRect {
                width,
                height,
                corner_radius,
            } => {
                require_positive("width", *width)?;
                require_positive("height", *height)?;
                require_positive("corner_radius", *corner_radius)?;
                if *corner_radius > width.min(*height) / 2.0 {
                    return Err(PhysicsLayoutError::InvalidShape {
                        reason: format!(
                            "corner radius {corner_radius} exceeds half extents of {width}x{height}"
                        ),
                    });
                }
            }
            Shape::CutCornerRect {
                width,
                height,
                cut_length,
            } => {
                require_positive("width", *width)?;
                require_positive("height", *height)?;
                require_positive("cut_length", *cut_length)?;
                let leg = cut_length * std::f32::consts::SQRT_2 / 2.0;
                if leg > width.min(*height) / 2.0 {
                    return Err(PhysicsLayoutError::InvalidShape {
                        reason: format!(
                            "cut length {cut_length} exceeds half extents of {width}x{height}"
                        ),
                    });
                }
            }
            Shape::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(PhysicsLayoutError::DegenerateOutline {
                        reason: format!("{} outline points, need at least 3", vertices.len()),
                    });
                }
                if vertices.iter().any(|v| !v.is_finite()) {
                    return Err(PhysicsLayoutError::DegenerateOutline {
                        reason: "outline contains non-finite points".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn require_positive(name: &str, value: f32) -> SyncResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PhysicsLayoutError::InvalidShape {
            reason: format!("{name} must be finite and positive, got {value}"),
        });
    }
    Ok(())
}
