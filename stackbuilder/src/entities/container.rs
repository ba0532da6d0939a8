use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::geometry::primitives::{BBox3D, Vector3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Items are stacked on top of the pallet deck
    Pallet,
    /// Items are loaded inside the case, its height bounds the load
    Case,
    /// Items are loaded on the truck floor, its height bounds the load
    Truck,
}

/// The support or enclosure items are loaded onto or into
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainerProperties {
    pub name: String,
    pub kind: ContainerKind,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

impl ContainerProperties {
    pub fn pallet(name: impl Into<String>, length: f64, width: f64, height: f64, weight: f64) -> Result<Self> {
        let cp = ContainerProperties {
            name: name.into(),
            kind: ContainerKind::Pallet,
            length,
            width,
            height,
            weight,
        };
        cp.validate()?;
        Ok(cp)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.length.is_finite() && self.length > 0.0 && self.width.is_finite() && self.width > 0.0,
            "container {:?} has a degenerate footprint: {} x {}",
            self.name,
            self.length,
            self.width
        );
        ensure!(
            self.height.is_finite() && self.height >= 0.0,
            "container {:?} has an invalid height: {}",
            self.name,
            self.height
        );
        ensure!(
            self.weight.is_finite() && self.weight >= 0.0,
            "container {:?} has an invalid weight: {}",
            self.name,
            self.weight
        );
        Ok(())
    }

    /// Height at which the first layer rests
    pub fn load_base_z(&self) -> f64 {
        match self.kind {
            ContainerKind::Pallet => self.height,
            ContainerKind::Case | ContainerKind::Truck => 0.0,
        }
    }

    /// Height limit imposed by the container itself, if any
    pub fn height_limit(&self) -> Option<f64> {
        match self.kind {
            ContainerKind::Pallet => None,
            ContainerKind::Case | ContainerKind::Truck => Some(self.height),
        }
    }

    pub fn bbox(&self) -> BBox3D {
        BBox3D::new(Vector3::ZERO, Vector3::new(self.length, self.width, self.height))
    }
}

/// Sheet (cardboard, slip sheet) inserted between layers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterlayerProperties {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
    pub weight: f64,
}

impl InterlayerProperties {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            [self.length, self.width, self.thickness]
                .iter()
                .all(|d| d.is_finite() && *d >= 0.0),
            "interlayer {:?} has invalid dimensions",
            self.name
        );
        ensure!(
            self.weight.is_finite() && self.weight >= 0.0,
            "interlayer {:?} has an invalid weight: {}",
            self.name,
            self.weight
        );
        Ok(())
    }
}
