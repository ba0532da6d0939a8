use std::hash::{Hash, Hasher};

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::geometry::primitives::Vector3;

/// A box, case or bundle. Bundles are described by their envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxProperties {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    /// Extra footprint per axis reserved around the box (deformation of soft cases)
    #[serde(default)]
    pub bulge: Vector3,
}

impl BoxProperties {
    pub fn new(name: impl Into<String>, length: f64, width: f64, height: f64, weight: f64) -> Result<Self> {
        let bp = BoxProperties {
            name: name.into(),
            length,
            width,
            height,
            weight,
            bulge: Vector3::ZERO,
        };
        bp.validate()?;
        Ok(bp)
    }

    pub fn with_bulge(mut self, bulge: Vector3) -> Result<Self> {
        ensure!(
            bulge.is_finite() && bulge.x >= 0.0 && bulge.y >= 0.0 && bulge.z >= 0.0,
            "bulge of box {:?} must be non-negative: {bulge:?}",
            self.name
        );
        self.bulge = bulge;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            [self.length, self.width, self.height]
                .iter()
                .all(|d| d.is_finite() && *d > 0.0),
            "box {:?} has degenerate dimensions: {} x {} x {}",
            self.name,
            self.length,
            self.width,
            self.height
        );
        ensure!(
            self.weight.is_finite() && self.weight >= 0.0,
            "box {:?} has an invalid weight: {}",
            self.name,
            self.weight
        );
        Ok(())
    }

    /// Nominal dimensions (length, width, height)
    pub fn dimensions(&self) -> Vector3 {
        Vector3::new(self.length, self.width, self.height)
    }

    /// Dimensions including the bulge, the space the box effectively claims in a layer
    pub fn outer_dimensions(&self) -> Vector3 {
        self.dimensions() + self.bulge
    }

    pub fn volume(&self) -> f64 {
        self.dimensions().volume()
    }
}

impl Eq for BoxProperties {}

impl Hash for BoxProperties {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.dimensions().hash(state);
        self.weight.to_bits().hash(state);
        self.bulge.hash(state);
    }
}

/// A cylinder, stacked in layers standing on one of its circular faces or loaded lying in tiers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CylinderProperties {
    pub name: String,
    pub radius: f64,
    pub height: f64,
    pub weight: f64,
}

impl CylinderProperties {
    pub fn new(name: impl Into<String>, radius: f64, height: f64, weight: f64) -> Result<Self> {
        let cp = CylinderProperties {
            name: name.into(),
            radius,
            height,
            weight,
        };
        cp.validate()?;
        Ok(cp)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.radius.is_finite() && self.radius > 0.0 && self.height.is_finite() && self.height > 0.0,
            "cylinder {:?} has degenerate dimensions: radius {}, height {}",
            self.name,
            self.radius,
            self.height
        );
        ensure!(
            self.weight.is_finite() && self.weight >= 0.0,
            "cylinder {:?} has an invalid weight: {}",
            self.name,
            self.weight
        );
        Ok(())
    }

    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    pub fn volume(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius * self.height
    }
}

/// Anything that can be arranged in layers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Packable {
    Box(BoxProperties),
    Cylinder(CylinderProperties),
}

impl Packable {
    pub fn name(&self) -> &str {
        match self {
            Packable::Box(b) => &b.name,
            Packable::Cylinder(c) => &c.name,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Packable::Box(b) => b.weight,
            Packable::Cylinder(c) => c.weight,
        }
    }

    pub fn volume(&self) -> f64 {
        match self {
            Packable::Box(b) => b.volume(),
            Packable::Cylinder(c) => c.volume(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Packable::Box(b) => b.validate(),
            Packable::Cylinder(c) => c.validate(),
        }
    }
}
