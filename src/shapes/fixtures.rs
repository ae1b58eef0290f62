//! Convex decomposition of declared shapes into body fixtures.
//!
//! The engine only accepts convex collision shapes, so the non-convex-looking
//! outlines are approximated as unions of convex primitives: rounded corners
//! become corner balls plus two overlapping cuboids, cut corners become corner
//! triangles plus two cuboids, and free-form outlines collapse to their convex
//! hull.

use glam::Vec2;
use rapier2d::geometry::SharedShape;
use rapier2d::na::Point2;
use tracing::warn;

use super::Shape;
use crate::error::{PhysicsLayoutError, SyncResult};

/// One convex sub-shape of a body, positioned relative to the body origin.
#[derive(Clone)]
pub struct Fixture {
    pub shape: SharedShape,
    pub offset: Vec2,
}

impl Fixture {
    fn centered(shape: SharedShape) -> Self {
        Self {
            shape,
            offset: Vec2::ZERO,
        }
    }

    fn at(shape: SharedShape, offset: Vec2) -> Self {
        Self { shape, offset }
    }
}

/// Converts a world-unit shape into the convex fixtures that make up a body.
pub fn body_fixtures(shape: &Shape) -> SyncResult<Vec<Fixture>> {
    shape.validate()?;

    let fixtures = match shape {
        Shape::Circle { radius } => vec![Fixture::centered(SharedShape::ball(*radius))],
        Shape::Rectangle { width, height } => {
            vec![Fixture::centered(SharedShape::cuboid(
                width / 2.0,
                height / 2.0,
            ))]
        }
        Shape::RoundedRect {
            width,
            height,
            corner_radius,
        } => rounded_rect_fixtures(*width, *height, *corner_radius),
        Shape::CutCornerRect {
            width,
            height,
            cut_length,
        } => cut_corner_fixtures(*width, *height, *cut_length),
        Shape::Polygon { vertices } => vec![polygon_fixture(vertices)?],
    };

    Ok(fixtures)
}

fn rounded_rect_fixtures(width: f32, height: f32, radius: f32) -> Vec<Fixture> {
    let half_w = width / 2.0;
    let half_h = height / 2.0;

    let mut fixtures = Vec::with_capacity(6);

    // One ball per inset corner.
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            fixtures.push(Fixture::at(
                SharedShape::ball(radius),
                Vec2::new(sx * (half_w - radius), sy * (half_h - radius)),
            ));
        }
    }

    // Full-height and full-width cuboids, both inset by the corner radius on
    // one axis so the silhouette stays inside the rounded outline.
    fixtures.push(Fixture::centered(SharedShape::cuboid(
        half_w - radius,
        half_h,
    )));
    fixtures.push(Fixture::centered(SharedShape::cuboid(
        half_w,
        half_h - radius,
    )));

    fixtures
}

fn cut_corner_fixtures(width: f32, height: f32, cut_length: f32) -> Vec<Fixture> {
    let leg = cut_length * std::f32::consts::SQRT_2 / 2.0;
    let half_w = width / 2.0;
    let half_h = height / 2.0;

    let mut fixtures = Vec::with_capacity(6);

    // One right triangle per corner. The inner vertex sits at the corner
    // inset, the legs run back along both edges and the hypotenuse forms the
    // cut.
    for sx in [-1.0_f32, 1.0] {
        for sy in [-1.0_f32, 1.0] {
            let inset = Vec2::new(sx * (half_w - leg), sy * (half_h - leg));
            let along_x = Vec2::new(sx * leg, 0.0);
            let along_y = Vec2::new(0.0, sy * leg);
            fixtures.push(Fixture::at(
                SharedShape::triangle(
                    Point2::origin(),
                    Point2::new(along_x.x, along_x.y),
                    Point2::new(along_y.x, along_y.y),
                ),
                inset,
            ));
        }
    }

    fixtures.push(Fixture::centered(SharedShape::cuboid(half_w - leg, half_h)));
    fixtures.push(Fixture::centered(SharedShape::cuboid(half_w, half_h - leg)));

    fixtures
}

fn polygon_fixture(vertices: &[Vec2]) -> SyncResult<Fixture> {
    let points: Vec<Point2<f32>> = vertices.iter().map(|v| Point2::new(v.x, v.y)).collect();

    let hull = rapier2d::parry::transformation::convex_hull(&points);
    if hull.len() < 3 {
        return Err(PhysicsLayoutError::DegenerateOutline {
            reason: format!(
                "convex hull of {} outline points collapsed to {} vertices",
                vertices.len(),
                hull.len()
            ),
        });
    }

    // A concave outline still produces usable geometry, but it is silently
    // fatter than what the caller drew. Surface that instead of hiding it.
    let outline_area = polygon_area(&points);
    let hull_area = polygon_area(&hull);
    if hull_area > outline_area * 1.01 + f32::EPSILON {
        warn!(
            outline_area,
            hull_area, "concave outline reduced to its convex hull; collision will be approximate"
        );
    }

    let shape = SharedShape::convex_hull(&points).ok_or_else(|| {
        PhysicsLayoutError::DegenerateOutline {
            reason: "outline points are collinear".to_string(),
        }
    })?;

    Ok(Fixture::centered(shape))
}

/// Shoelace area of a closed polygon.
fn polygon_area(points: &[Point2<f32>]) -> f32 {
    let mut doubled = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = &points[(i + 1) % points.len()];
        doubled += a.x * b.y - b.x * a.y;
    }
    (doubled / 2.0).abs()
}
