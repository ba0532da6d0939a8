use serde::{Deserialize, Serialize};

use crate::geometry::primitives::{Vector2, Vector3};

/// Axis-aligned rectangle, used for item footprints inside a layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox2D {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl BBox2D {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        debug_assert!(x_min <= x_max && y_min <= y_max);
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn from_corners(a: Vector2, b: Vector2) -> Self {
        Self::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// True if `self` lies within `[0, length] x [0, width]`, allowing for `eps` of slack
    pub fn fits_in(&self, length: f64, width: f64, eps: f64) -> bool {
        self.x_min >= -eps && self.y_min >= -eps && self.x_max <= length + eps && self.y_max <= width + eps
    }

    /// True if the interiors of both rectangles intersect by more than `eps`
    pub fn overlaps(&self, other: &BBox2D, eps: f64) -> bool {
        self.x_min < other.x_max - eps
            && other.x_min < self.x_max - eps
            && self.y_min < other.y_max - eps
            && other.y_min < self.y_max - eps
    }

    pub fn union(&self, other: &BBox2D) -> BBox2D {
        BBox2D::new(
            self.x_min.min(other.x_min),
            self.y_min.min(other.y_min),
            self.x_max.max(other.x_max),
            self.y_max.max(other.y_max),
        )
    }
}

/// Axis-aligned cuboid. An empty box is represented by `min > max` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox3D {
    pub min: Vector3,
    pub max: Vector3,
}

impl BBox3D {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vector3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Vector3::new(f64::MIN, f64::MIN, f64::MIN),
        }
    }

    pub fn from_corners(a: Vector3, b: Vector3) -> Self {
        Self {
            min: a.component_min(&b),
            max: a.component_max(&b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, other: &BBox3D) -> &mut Self {
        if !other.is_empty() {
            self.min = self.min.component_min(&other.min);
            self.max = self.max.component_max(&other.max);
        }
        self
    }

    pub fn extend_point(&mut self, p: Vector3) -> &mut Self {
        self.min = self.min.component_min(&p);
        self.max = self.max.component_max(&p);
        self
    }

    pub fn dimensions(&self) -> Vector3 {
        match self.is_empty() {
            true => Vector3::ZERO,
            false => self.max - self.min,
        }
    }

    pub fn volume(&self) -> f64 {
        self.dimensions().volume()
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    pub fn footprint(&self) -> BBox2D {
        BBox2D::new(self.min.x, self.min.y, self.max.x, self.max.y)
    }

    /// True if `other` lies within `self`, allowing for `eps` of slack
    pub fn contains(&self, other: &BBox3D, eps: f64) -> bool {
        other.min.x >= self.min.x - eps
            && other.min.y >= self.min.y - eps
            && other.min.z >= self.min.z - eps
            && other.max.x <= self.max.x + eps
            && other.max.y <= self.max.y + eps
            && other.max.z <= self.max.z + eps
    }

    /// True if the interiors of both boxes intersect by more than `eps` on every axis
    pub fn overlaps(&self, other: &BBox3D, eps: f64) -> bool {
        (0..3).all(|i| self.min[i] < other.max[i] - eps && other.min[i] < self.max[i] - eps)
    }
}
