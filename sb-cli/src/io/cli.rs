use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Builds layered loads for a pallet, case or truck analysis
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Analysis to solve (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub input_file: PathBuf,
    /// Receives `sol_<input>.json` and the SVG top views
    #[arg(short, long, value_name = "FOLDER")]
    pub solution_folder: PathBuf,
    /// Solver and drawing configuration (JSON), defaults are used when absent
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    #[arg(short, long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
    /// Kind of analysis stored in the input file
    #[arg(short, long, value_enum, default_value = "homogeneous")]
    pub prob_var: ProblemVariant,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum ProblemVariant {
    /// A single item type stacked in layers
    Homogeneous,
    /// A mix of box types packed in containers
    Heterogeneous,
}
