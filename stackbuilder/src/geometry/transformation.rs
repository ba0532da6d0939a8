use crate::geometry::HalfAxis;
use crate::geometry::primitives::{BBox3D, Vector3};

/// Proper rigid transformation restricted to quarter-turn rotations.
/// The rotational part is stored as the images of the X, Y and Z axes, which keeps
/// orientations exact: a transformed half-axis is always a half-axis again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3D {
    /// images of the positive X, Y and Z axes
    axes: [HalfAxis; 3],
    translation: Vector3,
}

impl Transform3D {
    pub const fn identity() -> Self {
        Self {
            axes: HalfAxis::POSITIVES,
            translation: Vector3::ZERO,
        }
    }

    pub fn from_translation(t: Vector3) -> Self {
        Self {
            axes: HalfAxis::POSITIVES,
            translation: t,
        }
    }

    /// Rotation of `quarter_turns * 90°` around the axis with index `direction` (right-hand rule)
    pub fn from_rotation(direction: usize, quarter_turns: i32) -> Self {
        let (a, b) = ((direction + 1) % 3, (direction + 2) % 3);
        // single quarter turn: e_a -> e_b, e_b -> -e_a
        let quarter = |h: HalfAxis| -> HalfAxis {
            let d = h.direction();
            let image = match d {
                _ if d == a => HalfAxis::from_direction(b, true),
                _ if d == b => HalfAxis::from_direction(a, false),
                _ => HalfAxis::from_direction(d, true),
            };
            match h.is_positive() {
                true => image,
                false => image.opposite(),
            }
        };
        let mut axes = HalfAxis::POSITIVES;
        for _ in 0..quarter_turns.rem_euclid(4) {
            axes = axes.map(quarter);
        }
        Self {
            axes,
            translation: Vector3::ZERO,
        }
    }

    /// Applies `other` after `self`
    pub fn then(self, other: &Transform3D) -> Self {
        Self {
            axes: self.axes.map(|a| other.transform_half_axis(a)),
            translation: other.transform_point(self.translation),
        }
    }

    pub fn translate(self, t: Vector3) -> Self {
        self.then(&Transform3D::from_translation(t))
    }

    pub fn rotate(self, direction: usize, quarter_turns: i32) -> Self {
        self.then(&Transform3D::from_rotation(direction, quarter_turns))
    }

    pub fn translation(&self) -> Vector3 {
        self.translation
    }

    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        (0..3)
            .map(|i| self.axes[i].to_vector() * v[i])
            .fold(Vector3::ZERO, |acc, c| acc + c)
    }

    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        self.transform_vector(p) + self.translation
    }

    pub fn transform_half_axis(&self, axis: HalfAxis) -> HalfAxis {
        let image = self.axes[axis.direction()];
        match axis.is_positive() {
            true => image,
            false => image.opposite(),
        }
    }

    pub fn transform_bbox(&self, bbox: &BBox3D) -> BBox3D {
        BBox3D::from_corners(
            self.transform_point(bbox.min),
            self.transform_point(bbox.max),
        )
    }

    /// Extents of a cuboid with dimensions `dims` after being rotated by `self`
    pub fn rotated_dimensions(&self, dims: Vector3) -> Vector3 {
        let mut out = [0.0; 3];
        for (i, img) in self.axes.iter().enumerate() {
            out[img.direction()] = dims[i];
        }
        Vector3::new(out[0], out[1], out[2])
    }

    /// Inverse of [`Transform3D::rotated_dimensions`]
    pub fn unrotated_dimensions(&self, dims: Vector3) -> Vector3 {
        Vector3::new(
            dims[self.axes[0].direction()],
            dims[self.axes[1].direction()],
            dims[self.axes[2].direction()],
        )
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turn_around_z() {
        let t = Transform3D::from_rotation(2, 1);
        assert_eq!(t.transform_half_axis(HalfAxis::XP), HalfAxis::YP);
        assert_eq!(t.transform_half_axis(HalfAxis::YP), HalfAxis::XN);
        assert_eq!(t.transform_half_axis(HalfAxis::ZP), HalfAxis::ZP);
        assert_eq!(
            t.transform_point(Vector3::new(1.0, 2.0, 3.0)),
            Vector3::new(-2.0, 1.0, 3.0)
        );
    }

    #[test]
    fn quarter_turn_around_x_then_translation() {
        // (x, y, z) -> (x, Y - z, y)
        let t = Transform3D::from_rotation(0, 1).translate(Vector3::new(0.0, 10.0, 0.0));
        assert_eq!(
            t.transform_point(Vector3::new(1.0, 2.0, 3.0)),
            Vector3::new(1.0, 7.0, 2.0)
        );
        assert_eq!(
            t.rotated_dimensions(Vector3::new(4.0, 5.0, 6.0)),
            Vector3::new(4.0, 6.0, 5.0)
        );
    }

    #[test]
    fn full_turn_is_identity() {
        for dir in 0..3 {
            let t = Transform3D::from_rotation(dir, 4);
            assert_eq!(t, Transform3D::identity());
            let t = Transform3D::from_rotation(dir, 1).rotate(dir, -1);
            assert_eq!(t, Transform3D::identity());
        }
    }
}
