//! Packers for heterogeneous loads: an extreme point bin packer and a wall building packer.
//! Both work on axis-aligned [`Cuboid`]s in their own frame, starting at the origin.

mod extreme_point;
mod wall_builder;

#[doc(inline)]
pub use extreme_point::BinPacker;
#[doc(inline)]
pub use extreme_point::ExtremePointBin;
#[doc(inline)]
pub use extreme_point::PackResult;
#[doc(inline)]
pub use wall_builder::WallBuilder;
#[doc(inline)]
pub use wall_builder::WallResult;

use anyhow::Result;
use itertools::Itertools;

use crate::entities::{AllowedOrientations, BoxPosition};
use crate::geometry::primitives::{BBox3D, Vector3};
use crate::geometry::{HalfAxis, Transform3D};

/// A box to pack: nominal dimensions and the orientations it may take in the packer frame
#[derive(Clone, Debug, PartialEq)]
pub struct Cuboid {
    /// Identification of the item type, carried over to the placement
    pub tag: usize,
    /// Nominal dimensions (length, width, height)
    pub dims: Vector3,
    /// Permitted (length, width) directions in the packer frame, in order of preference
    pub orientations: Vec<(HalfAxis, HalfAxis)>,
    /// Items with a lower priority value are packed first
    pub priority: i32,
}

impl Cuboid {
    /// Cuboid whose orientations are those allowed by `allowed` once mapped into a packer frame,
    /// `to_real` mapping the packer frame onto the real one (Z up)
    pub fn new(tag: usize, dims: Vector3, allowed: AllowedOrientations, to_real: &Transform3D, priority: i32) -> Self {
        let orientations = ALL_ORIENTATIONS
            .into_iter()
            .filter(|(dl, dw)| allowed.allows(vertical_item_axis(to_real, *dl, *dw)))
            .collect();
        Self {
            tag,
            dims,
            orientations,
            priority,
        }
    }

    pub fn volume(&self) -> f64 {
        self.dims.volume()
    }

    /// Extents along the packer axes when oriented as `(dl, dw)`
    pub fn extents(&self, (dl, dw): (HalfAxis, HalfAxis)) -> Vector3 {
        placed_extents(self.dims, dl, dw)
    }
}

/// One representative per (vertical axis, quarter turn) for each pair of item axes
const ALL_ORIENTATIONS: [(HalfAxis, HalfAxis); 6] = [
    (HalfAxis::XP, HalfAxis::YP),
    (HalfAxis::YP, HalfAxis::XN),
    (HalfAxis::XP, HalfAxis::ZP),
    (HalfAxis::YP, HalfAxis::ZP),
    (HalfAxis::ZP, HalfAxis::XP),
    (HalfAxis::ZP, HalfAxis::YP),
];

/// Item axis (as `XP`, `YP` or `ZP` for length, width and height) ending up vertical in the real frame
fn vertical_item_axis(to_real: &Transform3D, dl: HalfAxis, dw: HalfAxis) -> HalfAxis {
    let real_dl = to_real.transform_half_axis(dl);
    let real_dw = to_real.transform_half_axis(dw);
    match (real_dl.direction(), real_dw.direction()) {
        (2, _) => HalfAxis::XP,
        (_, 2) => HalfAxis::YP,
        _ => HalfAxis::ZP,
    }
}

fn placed_extents(dims: Vector3, dl: HalfAxis, dw: HalfAxis) -> Vector3 {
    let mut out = [0.0; 3];
    out[dl.direction()] = dims.x;
    out[dw.direction()] = dims.y;
    out[3 - dl.direction() - dw.direction()] = dims.z;
    Vector3::new(out[0], out[1], out[2])
}

/// A cuboid placed by a packer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedCuboid {
    pub tag: usize,
    /// Minimum corner
    pub position: Vector3,
    /// Extents along the packer axes
    pub extents: Vector3,
    pub orientation: (HalfAxis, HalfAxis),
    /// Nominal dimensions of the cuboid
    pub dims: Vector3,
}

impl PlacedCuboid {
    pub fn bbox(&self) -> BBox3D {
        BBox3D::new(self.position, self.position + self.extents)
    }

    /// Box placement in the real frame
    pub fn to_box_position(&self, to_real: &Transform3D) -> Result<BoxPosition> {
        let (dl, dw) = self.orientation;
        let bp = BoxPosition::from_min_corner(self.position, self.dims, dl, dw)?;
        Ok(bp.transform(to_real))
    }
}

/// Placed cuboids lie within `container` and do not overlap
pub fn verify(placed: &[PlacedCuboid], container: Vector3, tol: f64) -> bool {
    let space = BBox3D::new(Vector3::ZERO, container);
    placed.iter().all(|p| space.contains(&p.bbox(), tol))
        && placed
            .iter()
            .tuple_combinations()
            .all(|(a, b)| !a.bbox().overlaps(&b.bbox(), tol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upright_only_keeps_two_orientations() {
        let c = Cuboid::new(
            0,
            Vector3::new(4.0, 3.0, 2.0),
            AllowedOrientations::UPRIGHT_ONLY,
            &Transform3D::identity(),
            0,
        );
        assert_eq!(c.orientations.len(), 2);
        for o in &c.orientations {
            assert_eq!(c.extents(*o).z, 2.0);
        }
    }

    #[test]
    fn permissions_follow_the_frame() {
        // packer z maps onto real y, packer y onto real z
        let to_real = Transform3D::from_rotation(0, 1).translate(Vector3::new(0.0, 10.0, 0.0));
        let c = Cuboid::new(
            0,
            Vector3::new(4.0, 3.0, 2.0),
            AllowedOrientations::UPRIGHT_ONLY,
            &to_real,
            0,
        );
        for o in &c.orientations {
            // the item height lies along packer y
            assert_eq!(c.extents(*o).y, 2.0);
        }
    }

    #[test]
    fn placement_maps_to_matching_box_position() {
        let dims = Vector3::new(4.0, 3.0, 2.0);
        for (dl, dw) in ALL_ORIENTATIONS {
            let extents = placed_extents(dims, dl, dw);
            let placed = PlacedCuboid {
                tag: 0,
                position: Vector3::new(1.0, 2.0, 3.0),
                extents,
                orientation: (dl, dw),
                dims,
            };
            let bp = placed.to_box_position(&Transform3D::identity()).unwrap();
            assert_eq!(bp.bbox(dims), placed.bbox());
        }
    }
}
