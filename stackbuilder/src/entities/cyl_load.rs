use crate::entities::position::CylPosition;
use crate::geometry::Transform3D;
use crate::geometry::primitives::{BBox3D, Vector2, Vector3};

/// Which limit stopped a load of lying cylinders
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitReached {
    /// No further tier fits below the height limit, or the footprint is used up
    MaxHeight,
    /// The maximum number of items was placed
    MaxCount,
}

/// Input of a lying cylinder pattern: cylinders rest on their side, axis along the pattern's length
#[derive(Clone, Debug, PartialEq)]
pub struct CylLoadFrame {
    pub radius: f64,
    /// Length of the cylinder along its axis
    pub length: f64,
    pub container: Vector2,
    /// The cylinder axis runs along the container width instead of its length
    pub swapped: bool,
    pub tolerance: f64,
}

impl CylLoadFrame {
    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    pub fn pallet_length(&self) -> f64 {
        match self.swapped {
            false => self.container.x,
            true => self.container.y,
        }
    }

    pub fn pallet_width(&self) -> f64 {
        match self.swapped {
            false => self.container.y,
            true => self.container.x,
        }
    }

    /// Maps the pattern frame onto the container footprint frame
    pub fn to_container(&self) -> Transform3D {
        match self.swapped {
            false => Transform3D::identity(),
            true => Transform3D::from_rotation(2, 1).translate(Vector3::new(self.container.x, 0.0, 0.0)),
        }
    }
}

/// Cylinders lying on their side, stacked in nested tiers.
/// Positions are the centres of the cylinders' first end face.
#[derive(Clone, Debug, PartialEq)]
pub struct CylLoad {
    pub pattern: String,
    pub swapped: bool,
    pub radius: f64,
    pub length: f64,
    pub positions: Vec<CylPosition>,
    pub limit_reached: LimitReached,
}

impl CylLoad {
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    pub fn bboxes(&self) -> impl Iterator<Item = BBox3D> + '_ {
        self.positions.iter().map(|p| p.bbox(self.radius, self.length))
    }

    /// Top of the highest cylinder, `None` for an empty load
    pub fn top(&self) -> Option<f64> {
        self.bboxes().map(|b| b.max.z).max_by(f64::total_cmp)
    }

    pub fn transform(mut self, t: &Transform3D) -> Self {
        self.positions = self.positions.iter().map(|p| p.transform(t)).collect();
        self
    }
}
