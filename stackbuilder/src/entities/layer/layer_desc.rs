use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::geometry::HalfAxis;

/// Compact, persistable identification of a layer: enough to rebuild it for a given item and container.
/// Textual form: `pattern|axis|swapped|inverted`, e.g. `Symmetric Interlocked|ZP|1|0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LayerDesc {
    pub pattern: String,
    /// Item axis pointing upwards (always `ZP` for cylinder layers)
    pub axis_ortho: HalfAxis,
    /// Pattern frame rotated a quarter turn relative to the container
    pub swapped: bool,
    /// Pattern mirrored along its length axis
    pub inverted: bool,
}

impl LayerDesc {
    pub fn new(pattern: impl Into<String>, axis_ortho: HalfAxis, swapped: bool, inverted: bool) -> Self {
        Self {
            pattern: pattern.into(),
            axis_ortho,
            swapped,
            inverted,
        }
    }
}

impl Display for LayerDesc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.pattern, self.axis_ortho, self.swapped as u8, self.inverted as u8
        )
    }
}

fn parse_flag(s: &str) -> Result<bool> {
    match s {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => bail!("invalid flag {s:?}, expected 0 or 1"),
    }
}

impl FromStr for LayerDesc {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse = || -> Result<LayerDesc> {
            match s.split('|').collect::<Vec<_>>().as_slice() {
                [pattern, axis, swapped, inverted] if !pattern.is_empty() => Ok(LayerDesc {
                    pattern: pattern.to_string(),
                    axis_ortho: axis.parse()?,
                    swapped: parse_flag(swapped)?,
                    inverted: parse_flag(inverted)?,
                }),
                _ => bail!("expected four '|' separated fields"),
            }
        };
        parse().with_context(|| format!("could not parse layer descriptor {s:?}"))
    }
}

impl TryFrom<String> for LayerDesc {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<LayerDesc> for String {
    fn from(desc: LayerDesc) -> Self {
        desc.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textual_form() {
        let desc = LayerDesc::new("Symmetric Interlocked", HalfAxis::YP, true, false);
        assert_eq!(desc.to_string(), "Symmetric Interlocked|YP|1|0");
        assert_eq!(desc.to_string().parse::<LayerDesc>().unwrap(), desc);
    }

    #[test]
    fn malformed_descriptors() {
        for s in ["", "Aligned", "Aligned|ZP|1", "|ZP|0|0", "Aligned|QP|0|0", "Aligned|ZP|2|0"] {
            assert!(s.parse::<LayerDesc>().is_err(), "{s:?} should not parse");
        }
    }
}
