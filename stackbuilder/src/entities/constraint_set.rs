use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::geometry::HalfAxis;
use crate::geometry::primitives::Vector2;

/// Which item axes (length, width, height) may point upwards.
/// Textual form: `"x,y,z"` with `1` for allowed and `0` for forbidden, e.g. `"0,0,1"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AllowedOrientations(pub [bool; 3]);

impl AllowedOrientations {
    pub const ALL: AllowedOrientations = AllowedOrientations([true; 3]);
    pub const UPRIGHT_ONLY: AllowedOrientations = AllowedOrientations([false, false, true]);

    /// True if the item may stand with its `axis` direction vertical
    pub fn allows(&self, axis: HalfAxis) -> bool {
        self.0[axis.direction()]
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|b| *b)
    }
}

impl Default for AllowedOrientations {
    fn default() -> Self {
        AllowedOrientations::ALL
    }
}

impl FromStr for AllowedOrientations {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let flags = s
            .split(',')
            .map(|t| match t.trim() {
                "1" => Ok(true),
                "0" => Ok(false),
                other => bail!("invalid orientation flag {other:?} in {s:?}"),
            })
            .collect::<Result<Vec<bool>>>()?;
        match flags.as_slice() {
            [x, y, z] => Ok(AllowedOrientations([*x, *y, *z])),
            _ => bail!("expected three comma separated orientation flags, got {s:?}"),
        }
    }
}

impl TryFrom<String> for AllowedOrientations {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl Display for AllowedOrientations {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [x, y, z] = self.0.map(|b| b as u8);
        write!(f, "{x},{y},{z}")
    }
}

impl From<AllowedOrientations> for String {
    fn from(ao: AllowedOrientations) -> Self {
        ao.to_string()
    }
}

/// Constraints a stacking solution has to respect.
/// Optional limits are inactive when `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSet {
    #[serde(default)]
    pub allowed_orientations: AllowedOrientations,
    /// Maximum total height, container included
    pub max_height: Option<f64>,
    /// Maximum total weight, container and interlayers included
    pub max_weight: Option<f64>,
    /// Maximum number of items
    pub max_count: Option<usize>,
    /// Allowed excess of the load beyond each side of the container footprint (negative values shrink it)
    #[serde(default)]
    pub overhang: Vector2,
    /// Forced gap between neighbouring items of a layer
    #[serde(default)]
    pub min_space: f64,
    /// Layers are rejected when their largest gap exceeds this value
    #[serde(default)]
    pub max_space_allowed: Option<f64>,
    /// Layers are rejected when their combined item weight exceeds this value
    #[serde(default)]
    pub max_layer_weight: Option<f64>,
    /// An interlayer is inserted every `interlayer_period` layers (when an interlayer is provided)
    #[serde(default = "default_period")]
    pub interlayer_period: usize,
    /// Insert an interlayer below the first layer
    #[serde(default)]
    pub has_first_interlayer: bool,
    /// Every `layer_swap_period` layers, the layer is rotated half a turn
    #[serde(default = "default_period")]
    pub layer_swap_period: usize,
}

fn default_period() -> usize {
    1
}

impl ConstraintSet {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.allowed_orientations.any(),
            "at least one orientation must be allowed"
        );
        ensure!(
            self.max_height.is_some() || self.max_weight.is_some() || self.max_count.is_some(),
            "at least one stop criterion (max height, max weight or max count) must be active"
        );
        if let Some(h) = self.max_height {
            ensure!(h.is_finite() && h > 0.0, "invalid max height: {h}");
        }
        if let Some(w) = self.max_weight {
            ensure!(w.is_finite() && w > 0.0, "invalid max weight: {w}");
        }
        if let Some(c) = self.max_count {
            ensure!(c > 0, "max count must be strictly positive");
        }
        ensure!(
            self.min_space.is_finite() && self.min_space >= 0.0,
            "invalid minimum space: {}",
            self.min_space
        );
        ensure!(
            self.overhang.x.is_finite() && self.overhang.y.is_finite(),
            "invalid overhang: {:?}",
            self.overhang
        );
        ensure!(self.interlayer_period > 0, "interlayer period must be at least 1");
        ensure!(self.layer_swap_period > 0, "layer swap period must be at least 1");
        Ok(())
    }

    pub fn allows(&self, axis: HalfAxis) -> bool {
        self.allowed_orientations.allows(axis)
    }
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self {
            allowed_orientations: AllowedOrientations::ALL,
            max_height: Some(1700.0),
            max_weight: None,
            max_count: None,
            overhang: Vector2::ZERO,
            min_space: 0.0,
            max_space_allowed: None,
            max_layer_weight: None,
            interlayer_period: 1,
            has_first_interlayer: false,
            layer_swap_period: 1,
        }
    }
}
