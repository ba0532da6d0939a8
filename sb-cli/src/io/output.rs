use serde::{Deserialize, Serialize};
use stackbuilder::io::ext_repr::{ExtHSolution, ExtHeteroAnalysis, ExtHomoAnalysis, ExtSolution};

use crate::config::SBConfig;

#[derive(Serialize, Deserialize, Clone)]
pub struct HomoOutput {
    #[serde(flatten)]
    pub analysis: ExtHomoAnalysis,
    /// Stacking solutions, most items first
    pub solutions: Vec<ExtSolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_combination: Option<ExtSolution>,
    pub config: SBConfig,
    pub run_time_ms: u64,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct HeteroOutput {
    #[serde(flatten)]
    pub analysis: ExtHeteroAnalysis,
    /// One solution per packing algorithm
    pub solutions: Vec<ExtHSolution>,
    pub config: SBConfig,
    pub run_time_ms: u64,
}
