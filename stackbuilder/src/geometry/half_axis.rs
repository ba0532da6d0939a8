use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::geometry::primitives::Vector3;

/// One of the six signed coordinate axes.
/// Used to express item orientations: which way an item's length, width or height points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HalfAxis {
    XN,
    XP,
    YN,
    YP,
    ZN,
    ZP,
}

impl HalfAxis {
    pub const POSITIVES: [HalfAxis; 3] = [HalfAxis::XP, HalfAxis::YP, HalfAxis::ZP];

    pub const ALL: [HalfAxis; 6] = [
        HalfAxis::XN,
        HalfAxis::XP,
        HalfAxis::YN,
        HalfAxis::YP,
        HalfAxis::ZN,
        HalfAxis::ZP,
    ];

    pub fn from_direction(direction: usize, positive: bool) -> HalfAxis {
        match (direction, positive) {
            (0, false) => HalfAxis::XN,
            (0, true) => HalfAxis::XP,
            (1, false) => HalfAxis::YN,
            (1, true) => HalfAxis::YP,
            (2, false) => HalfAxis::ZN,
            _ => HalfAxis::ZP,
        }
    }

    /// Index of the underlying axis: 0 for X, 1 for Y, 2 for Z
    pub fn direction(self) -> usize {
        match self {
            HalfAxis::XN | HalfAxis::XP => 0,
            HalfAxis::YN | HalfAxis::YP => 1,
            HalfAxis::ZN | HalfAxis::ZP => 2,
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, HalfAxis::XP | HalfAxis::YP | HalfAxis::ZP)
    }

    pub fn sign(self) -> f64 {
        match self.is_positive() {
            true => 1.0,
            false => -1.0,
        }
    }

    pub fn opposite(self) -> HalfAxis {
        HalfAxis::from_direction(self.direction(), !self.is_positive())
    }

    pub fn to_vector(self) -> Vector3 {
        let mut v = [0.0; 3];
        v[self.direction()] = self.sign();
        Vector3::new(v[0], v[1], v[2])
    }

    /// Half-axis along the dominant component of `v`, `None` for a (near) zero vector
    pub fn from_vector(v: Vector3) -> Option<HalfAxis> {
        let (direction, value) = (0..3)
            .map(|i| (i, v[i]))
            .max_by(|(_, a), (_, b)| a.abs().total_cmp(&b.abs()))?;
        match value.abs() < 1e-9 {
            true => None,
            false => Some(HalfAxis::from_direction(direction, value > 0.0)),
        }
    }

    /// Cross product of two half-axes, `None` if they are parallel
    pub fn cross(self, other: HalfAxis) -> Option<HalfAxis> {
        HalfAxis::from_vector(self.to_vector().cross(&other.to_vector()))
    }

    /// Human readable abbreviation, e.g. "X+"
    pub fn abbreviation(self) -> &'static str {
        match self {
            HalfAxis::XN => "X-",
            HalfAxis::XP => "X+",
            HalfAxis::YN => "Y-",
            HalfAxis::YP => "Y+",
            HalfAxis::ZN => "Z-",
            HalfAxis::ZP => "Z+",
        }
    }

    fn code(self) -> &'static str {
        match self {
            HalfAxis::XN => "XN",
            HalfAxis::XP => "XP",
            HalfAxis::YN => "YN",
            HalfAxis::YP => "YP",
            HalfAxis::ZN => "ZN",
            HalfAxis::ZP => "ZP",
        }
    }
}

impl Display for HalfAxis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for HalfAxis {
    type Err = anyhow::Error;

    /// Accepts both the code ("XP") and the abbreviation ("X+")
    fn from_str(s: &str) -> Result<Self> {
        match HalfAxis::ALL
            .into_iter()
            .find(|a| a.code() == s || a.abbreviation() == s)
        {
            Some(axis) => Ok(axis),
            None => bail!("invalid half-axis: {s:?}"),
        }
    }
}
