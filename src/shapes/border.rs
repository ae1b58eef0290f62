//! Border fixture generation.
//!
//! The enclosing boundary is hollow: bodies collide with the inside surface of
//! a closed chain of segments rather than with a solid fill. Circles are
//! flattened into a polygonal ring first.

use glam::Vec2;
use rapier2d::geometry::SharedShape;
use rapier2d::na::Point2;

use super::fixtures::Fixture;
use super::Shape;
use crate::error::{PhysicsLayoutError, SyncResult};

/// Segment count used to approximate a circular border.
const CIRCLE_SEGMENTS: usize = 50;

/// Converts a world-unit border shape into its boundary chain fixtures.
///
/// Rounded and cut-corner rectangles are not supported as borders; hosts that
/// need those outlines should sample them into a [`Shape::Polygon`].
pub fn border_fixtures(shape: &Shape) -> SyncResult<Vec<Fixture>> {
    shape.validate()?;

    let ring: Vec<Vec2> = match shape {
        Shape::Circle { radius } => polygonal_circle(*radius),
        Shape::Rectangle { width, height } => {
            let half_w = width / 2.0;
            let half_h = height / 2.0;
            vec![
                Vec2::new(-half_w, -half_h),
                Vec2::new(half_w, -half_h),
                Vec2::new(half_w, half_h),
                Vec2::new(-half_w, half_h),
            ]
        }
        Shape::Polygon { vertices } => vertices.clone(),
        other => {
            return Err(PhysicsLayoutError::UnsupportedShape {
                reason: format!("{other:?} cannot be used as a border"),
            })
        }
    };

    Ok(vec![Fixture {
        shape: closed_chain(&ring),
        offset: Vec2::ZERO,
    }])
}

fn polygonal_circle(radius: f32) -> Vec<Vec2> {
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / CIRCLE_SEGMENTS as f32;
            Vec2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Builds a closed polyline out of the ring vertices, including the segment
/// that joins the last vertex back to the first.
fn closed_chain(ring: &[Vec2]) -> SharedShape {
    let vertices: Vec<Point2<f32>> = ring.iter().map(|v| Point2::new(v.x, v.y)).collect();
    let count = vertices.len() as u32;
    let indices: Vec<[u32; 2]> = (0..count).map(|i| [i, (i + 1) % count]).collect();
    SharedShape::polyline(vertices, Some(indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_border_is_one_closed_chain() {
        let fixtures = border_fixtures(&Shape::Rectangle {
            width: 8.0,
            height: 6.0,
        })
        .unwrap();
        assert_eq!(fixtures.len(), 1);
        let polyline = fixtures[0].shape.as_polyline().expect("polyline fixture");
        assert_eq!(polyline.num_segments(), 4);
    }

    #[test]
    fn circle_border_uses_fixed_segment_count() {
        let fixtures = border_fixtures(&Shape::Circle { radius: 3.0 }).unwrap();
        let polyline = fixtures[0].shape.as_polyline().expect("polyline fixture");
        assert_eq!(polyline.num_segments(), CIRCLE_SEGMENTS);
    }

    #[test]
    fn rounded_rect_border_is_rejected() {
        let result = border_fixtures(&Shape::RoundedRect {
            width: 8.0,
            height: 6.0,
            corner_radius: 1.0,
        });
        assert!(matches!(
            result,
            Err(PhysicsLayoutError::UnsupportedShape { .. })
        ));
    }
}
