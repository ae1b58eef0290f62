//! Coordinate mapping between layout space and simulation space.
//!
//! Layout space has its origin at the container's top-left corner and measures
//! in layout units (pixels or platform length units). The simulation world has
//! its origin at the container's center and measures in world units. The two
//! are related by a constant scale factor fixed for the lifetime of one
//! simulation instance.

use glam::Vec2;

use crate::drag::TouchEvent;
use crate::error::SyncResult;
use crate::shapes::Shape;
use crate::simulation::Transformation;

/// Converts layout-space quantities into world-space ones.
#[derive(Debug, Clone, Copy)]
pub struct LayoutToSimulation {
    scale: f32,
}

impl LayoutToSimulation {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    pub fn to_world_size(&self, length: f32) -> f32 {
        length / self.scale
    }

    pub fn to_world_vector(&self, offset: Vec2) -> Vec2 {
        offset / self.scale
    }

    /// Center position of an element relative to the container center, in
    /// layout units.
    ///
    /// The layout tree positions elements by their top-left corner relative to
    /// the container's top-left corner; the physics world is center-origin.
    /// Recompute this per element per pass since the container size can change
    /// independently of the element.
    pub fn position_from_center(
        &self,
        local_pos: Vec2,
        element_size: Vec2,
        container_size: Vec2,
    ) -> Vec2 {
        local_pos - container_size / 2.0 + element_size / 2.0
    }

    /// Same as [`Self::position_from_center`], already scaled to world units.
    pub fn world_position_from_center(
        &self,
        local_pos: Vec2,
        element_size: Vec2,
        container_size: Vec2,
    ) -> Vec2 {
        self.to_world_vector(self.position_from_center(local_pos, element_size, container_size))
    }

    /// Scales a layout-space shape down into world units.
    pub fn to_world_shape(&self, shape: &Shape) -> SyncResult<Shape> {
        shape.validate()?;
        let converted = match shape {
            Shape::Circle { radius } => Shape::Circle {
                radius: self.to_world_size(*radius),
            },
            Shape::Rectangle { width, height } => Shape::Rectangle {
                width: self.to_world_size(*width),
                height: self.to_world_size(*height),
            },
            Shape::RoundedRect {
                width,
                height,
                corner_radius,
            } => Shape::RoundedRect {
                width: self.to_world_size(*width),
                height: self.to_world_size(*height),
                corner_radius: self.to_world_size(*corner_radius),
            },
            Shape::CutCornerRect {
                width,
                height,
                cut_length,
            } => Shape::CutCornerRect {
                width: self.to_world_size(*width),
                height: self.to_world_size(*height),
                cut_length: self.to_world_size(*cut_length),
            },
            Shape::Polygon { vertices } => Shape::Polygon {
                vertices: vertices.iter().map(|v| self.to_world_vector(*v)).collect(),
            },
        };
        Ok(converted)
    }

    pub fn convert_touch_event(&self, event: &TouchEvent) -> TouchEvent {
        TouchEvent {
            pointer_id: event.pointer_id,
            offset: self.to_world_vector(event.offset),
            kind: event.kind,
        }
    }
}

/// Converts world-space simulation output back into layout space.
#[derive(Debug, Clone, Copy)]
pub struct SimulationToLayout {
    scale: f32,
}

impl SimulationToLayout {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    pub fn to_layout_size(&self, length: f32) -> f32 {
        length * self.scale
    }

    pub fn to_layout_vector(&self, offset: Vec2) -> Vec2 {
        offset * self.scale
    }

    /// Re-expresses a published transformation as a translation relative to
    /// the element's declared layout slot, given the element's center offset
    /// from the container center (in layout units).
    pub fn convert_transformation(
        &self,
        center_offset: Vec2,
        transformation: &Transformation,
    ) -> Transformation {
        Transformation {
            translation_x: transformation.translation_x - center_offset.x,
            translation_y: transformation.translation_y - center_offset.y,
            rotation_degrees: transformation.rotation_degrees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_layout_round_trip() {
        let to_world = LayoutToSimulation::new(64.0);
        let to_layout = SimulationToLayout::new(64.0);

        let original = Vec2::new(137.5, -42.25);
        let world = to_world.to_world_vector(original);
        let back = to_layout.to_layout_vector(world);

        assert!((back - original).length() < 1e-4);
        assert!((to_layout.to_layout_size(to_world.to_world_size(640.0)) - 640.0).abs() < 1e-4);
    }

    #[test]
    fn center_origin_correction() {
        let mapper = LayoutToSimulation::new(64.0);

        // A 32x32 element at the top-left corner of a 640x480 container: its
        // center sits half the container left and up of center, plus half the
        // element back in.
        let center = mapper.position_from_center(
            Vec2::ZERO,
            Vec2::new(32.0, 32.0),
            Vec2::new(640.0, 480.0),
        );
        assert_eq!(center, Vec2::new(-304.0, -224.0));

        // An element whose center coincides with the container center maps to
        // the world origin.
        let centered = mapper.world_position_from_center(
            Vec2::new(304.0, 224.0),
            Vec2::new(32.0, 32.0),
            Vec2::new(640.0, 480.0),
        );
        assert!(centered.length() < 1e-6);
    }

    #[test]
    fn shape_dimensions_scale_down() {
        let mapper = LayoutToSimulation::new(64.0);
        let world = mapper
            .to_world_shape(&Shape::RoundedRect {
                width: 128.0,
                height: 64.0,
                corner_radius: 16.0,
            })
            .unwrap();
        assert_eq!(
            world,
            Shape::RoundedRect {
                width: 2.0,
                height: 1.0,
                corner_radius: 0.25,
            }
        );
    }
}
