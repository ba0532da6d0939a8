use anyhow::{Result, ensure};

use crate::geometry::primitives::{BBox2D, BBox3D, Vector2, Vector3};
use crate::geometry::{HalfAxis, Transform3D};

/// Position of a cell inside a 2D layer.
/// The cell spans `length` along `length_axis` and `width` along `width_axis`, starting at `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerPosition {
    pub position: Vector2,
    pub length_axis: HalfAxis,
    pub width_axis: HalfAxis,
}

impl LayerPosition {
    pub fn footprint(&self, length: f64, width: f64) -> BBox2D {
        let la = self.length_axis.to_vector().xy();
        let wa = self.width_axis.to_vector().xy();
        BBox2D::from_corners(self.position, self.position + la * length + wa * width)
    }
}

/// Placement of a box: the corner at `position` and the directions its length and width point to.
/// The height direction is implied (right-handed).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxPosition {
    position: Vector3,
    dir_length: HalfAxis,
    dir_width: HalfAxis,
}

impl BoxPosition {
    pub fn new(position: Vector3, dir_length: HalfAxis, dir_width: HalfAxis) -> Result<Self> {
        ensure!(
            dir_length.direction() != dir_width.direction(),
            "length and width directions must be orthogonal: {dir_length} / {dir_width}"
        );
        ensure!(position.is_finite(), "box position is not finite: {position:?}");
        Ok(Self {
            position,
            dir_length,
            dir_width,
        })
    }

    /// Places a box of dimensions `dims` so that its bounding box starts at `min_corner`
    pub fn from_min_corner(min_corner: Vector3, dims: Vector3, dir_length: HalfAxis, dir_width: HalfAxis) -> Result<Self> {
        let at_origin = BoxPosition::new(Vector3::ZERO, dir_length, dir_width)?;
        let offset = at_origin.bbox(dims).min;
        BoxPosition::new(min_corner - offset, dir_length, dir_width)
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn dir_length(&self) -> HalfAxis {
        self.dir_length
    }

    pub fn dir_width(&self) -> HalfAxis {
        self.dir_width
    }

    pub fn dir_height(&self) -> HalfAxis {
        self.dir_length
            .cross(self.dir_width)
            .expect("length and width directions are orthogonal")
    }

    /// Axis-aligned space occupied by a box of dimensions `dims` (length, width, height)
    pub fn bbox(&self, dims: Vector3) -> BBox3D {
        let far = self.position
            + self.dir_length.to_vector() * dims.x
            + self.dir_width.to_vector() * dims.y
            + self.dir_height().to_vector() * dims.z;
        BBox3D::from_corners(self.position, far)
    }

    pub fn translate(self, t: Vector3) -> Self {
        Self {
            position: self.position + t,
            ..self
        }
    }

    pub fn transform(&self, t: &Transform3D) -> Self {
        Self {
            position: t.transform_point(self.position),
            dir_length: t.transform_half_axis(self.dir_length),
            dir_width: t.transform_half_axis(self.dir_width),
        }
    }
}

/// Placement of a cylinder: centre of its base face and the direction of its axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CylPosition {
    pub position: Vector3,
    pub axis: HalfAxis,
}

impl CylPosition {
    pub fn upright(position: Vector3) -> Self {
        Self {
            position,
            axis: HalfAxis::ZP,
        }
    }

    pub fn bbox(&self, radius: f64, height: f64) -> BBox3D {
        let along = self.axis.to_vector();
        let across = Vector3::new(1.0, 1.0, 1.0) - Vector3::new(along.x.abs(), along.y.abs(), along.z.abs());
        BBox3D::from_corners(
            self.position - across * radius,
            self.position + across * radius + along * height,
        )
    }

    pub fn translate(self, t: Vector3) -> Self {
        Self {
            position: self.position + t,
            ..self
        }
    }

    pub fn transform(&self, t: &Transform3D) -> Self {
        Self {
            position: t.transform_point(self.position),
            axis: t.transform_half_axis(self.axis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_of_flipped_box() {
        let dims = Vector3::new(4.0, 3.0, 2.0);
        // length along Y+, width along X-: height points up (Y x -X = Z)
        let bp = BoxPosition::new(Vector3::new(3.0, 0.0, 0.0), HalfAxis::YP, HalfAxis::XN).unwrap();
        assert_eq!(bp.dir_height(), HalfAxis::ZP);
        let bbox = bp.bbox(dims);
        assert_eq!(bbox.min, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(bbox.max, Vector3::new(3.0, 4.0, 2.0));
    }

    #[test]
    fn from_min_corner_matches_bbox() {
        let dims = Vector3::new(4.0, 3.0, 2.0);
        let min = Vector3::new(10.0, 20.0, 30.0);
        for (l, w) in [
            (HalfAxis::XP, HalfAxis::YN),
            (HalfAxis::ZN, HalfAxis::XP),
            (HalfAxis::YN, HalfAxis::ZP),
        ] {
            let bp = BoxPosition::from_min_corner(min, dims, l, w).unwrap();
            assert_eq!(bp.bbox(dims).min, min);
            assert!((bp.bbox(dims).volume() - dims.volume()).abs() < 1e-9);
        }
    }

    #[test]
    fn parallel_directions_are_rejected() {
        assert!(BoxPosition::new(Vector3::ZERO, HalfAxis::XP, HalfAxis::XN).is_err());
    }

    #[test]
    fn cylinder_bbox() {
        let cp = CylPosition::upright(Vector3::new(5.0, 5.0, 0.0));
        let bbox = cp.bbox(2.0, 7.0);
        assert_eq!(bbox.min, Vector3::new(3.0, 3.0, 0.0));
        assert_eq!(bbox.max, Vector3::new(7.0, 7.0, 7.0));
    }
}
