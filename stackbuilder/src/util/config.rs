use serde::{Deserialize, Serialize};

use crate::util::UnitSystem;

/// Configuration shared by all solvers of the engine
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct SolverConfig {
    /// Unit system of all input values, drives the geometric tolerance
    #[serde(default)]
    pub unit_system: UnitSystem,
    /// Configuration of the heterogeneous solver
    #[serde(default)]
    pub hsolver: HSolverConfig,
}

/// Configuration of the heterogeneous (mixed items) solver
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HSolverConfig {
    /// Run the extreme point bin packer
    pub bin_packing: bool,
    /// Container wall variants (1 to 5) for which the wall building packer is run
    pub wall_variants: Vec<u8>,
    /// Item orderings tried by the extreme point bin packer, the best result is kept
    pub orderings: Vec<ItemOrdering>,
    /// Which bin packing results are checked for overlaps and containment
    pub verify: VerifyOption,
}

impl Default for HSolverConfig {
    fn default() -> Self {
        Self {
            bin_packing: true,
            wall_variants: vec![1, 2, 3, 4, 5],
            orderings: vec![
                ItemOrdering::VolumeDesc,
                ItemOrdering::HeightDesc,
                ItemOrdering::FootprintDesc,
            ],
            verify: VerifyOption::BestOnly,
        }
    }
}

/// Order in which the bin packer considers items (within a priority level)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemOrdering {
    VolumeDesc,
    HeightDesc,
    FootprintDesc,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerifyOption {
    Disabled,
    BestOnly,
    All,
}
