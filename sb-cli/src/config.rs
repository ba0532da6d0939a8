use serde::{Deserialize, Serialize};

use stackbuilder::util::SolverConfig;

use crate::io::svg_util::SvgDrawOptions;

/// Configuration of the command line driver
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SBConfig {
    /// Configuration handed to the engine's solvers
    #[serde(default)]
    pub solver: SolverConfig,
    /// Only stack the layers achieving the best item count
    pub keep_only_best: bool,
    /// Also search the best combination of two layer types (boxes with a height limit only)
    pub best_combination: bool,
    /// Optional SVG drawing options
    #[serde(default)]
    pub svg_draw_options: SvgDrawOptions,
}

impl Default for SBConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            keep_only_best: true,
            best_combination: true,
            svg_draw_options: SvgDrawOptions::default(),
        }
    }
}
