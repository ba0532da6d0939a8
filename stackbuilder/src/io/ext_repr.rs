use serde::{Deserialize, Serialize};

use crate::entities::ContainerKind;
use crate::geometry::HalfAxis;

/// External representation of a [`BoxProperties`](crate::entities::BoxProperties)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtBox {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    /// Extra space reserved around the box along its (length, width, height)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bulge: Option<(f64, f64, f64)>,
}

/// External representation of a [`CylinderProperties`](crate::entities::CylinderProperties)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtCylinder {
    pub name: String,
    pub diameter: f64,
    pub height: f64,
    pub weight: f64,
}

/// Item to arrange in layers
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ExtPackable {
    Box(ExtBox),
    Cylinder(ExtCylinder),
}

/// External representation of a [`ContainerProperties`](crate::entities::ContainerProperties)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtContainer {
    pub name: String,
    pub kind: ContainerKind,
    pub length: f64,
    pub width: f64,
    /// Deck height of a pallet, inner height of a case or truck
    pub height: f64,
    #[serde(default)]
    pub weight: f64,
}

/// External representation of an [`InterlayerProperties`](crate::entities::InterlayerProperties)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtInterlayer {
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
    #[serde(default)]
    pub weight: f64,
}

/// External representation of a [`ConstraintSet`](crate::entities::ConstraintSet).
/// Absent limits are inactive.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtConstraintSet {
    /// Which item axes may point upwards, `"x,y,z"` with 0/1 flags
    #[serde(default = "all_orientations")]
    pub allowed_orientations: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_count: Option<usize>,
    /// Overhang (length, width) beyond each side of the container
    #[serde(default)]
    pub overhang: (f64, f64),
    #[serde(default)]
    pub min_space: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_space_allowed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_layer_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub interlayer_period: Option<usize>,
    #[serde(default)]
    pub has_first_interlayer: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub layer_swap_period: Option<usize>,
}

fn all_orientations() -> String {
    "1,1,1".to_string()
}

/// A homogeneous analysis: one item type stacked on one container
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtHomoAnalysis {
    pub name: String,
    pub item: ExtPackable,
    pub container: ExtContainer,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub interlayer: Option<ExtInterlayer>,
    pub constraints: ExtConstraintSet,
}

/// A type of box in a heterogeneous analysis, with its demand
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtContentItem {
    pub item: ExtBox,
    pub number: usize,
    #[serde(default = "all_orientations")]
    pub allowed_orientations: String,
    #[serde(default)]
    pub priority: i32,
}

/// A heterogeneous analysis: a mix of box types loaded in containers of one type
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtHeteroAnalysis {
    pub name: String,
    pub container: ExtContainer,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_height: Option<f64>,
    pub content: Vec<ExtContentItem>,
}

/// A placed item: the corner it is anchored at and the directions of its axes
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtPlacement {
    Box {
        position: (f64, f64, f64),
        dir_length: HalfAxis,
        dir_width: HalfAxis,
    },
    Cylinder {
        /// Centre of the base face
        position: (f64, f64, f64),
        axis: HalfAxis,
    },
}

/// A level of a stacked solution
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExtSolutionLayer {
    Items {
        /// Index into [`ExtSolution::layer_descs`]
        layer_type: usize,
        z: f64,
        rotated: bool,
        placements: Vec<ExtPlacement>,
    },
    Interlayer {
        z: f64,
    },
}

/// Statistics of a stacked solution
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtSolutionStats {
    pub item_count: usize,
    pub layer_count: usize,
    pub interlayer_count: usize,
    pub load_weight: f64,
    pub total_weight: f64,
    pub height: f64,
    /// Load bounding box as (min, max) corners
    pub bbox: ((f64, f64, f64), (f64, f64, f64)),
    /// Percentage of the loadable volume filled by items
    pub volume_efficiency: f64,
    /// Percentage of the maximum load weight used, when a weight limit is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_efficiency: Option<f64>,
}

/// External representation of a [`Solution`](crate::entities::Solution)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtSolution {
    /// Textual layer descriptors (`pattern|axis|swapped|inverted`) of the distinct layer types
    pub layer_descs: Vec<String>,
    pub pallet_map_phrase: String,
    pub layers: Vec<ExtSolutionLayer>,
    pub statistics: ExtSolutionStats,
}

/// An item placed by the heterogeneous solver
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtHPlacedItem {
    /// Index into [`ExtHeteroAnalysis::content`]
    pub content_index: usize,
    pub name: String,
    pub placement: ExtPlacement,
}

/// Content of one container of a heterogeneous solution
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtHContainerLoad {
    pub placed_items: Vec<ExtHPlacedItem>,
    pub load_volume: f64,
    pub load_weight: f64,
    /// Percentage of the container volume filled by items
    pub volume_efficiency: f64,
}

/// External representation of an [`HSolution`](crate::entities::HSolution)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtHSolution {
    pub algorithm: String,
    pub containers: Vec<ExtHContainerLoad>,
    /// Number of items left out, per content type
    pub unpacked: Vec<usize>,
}
