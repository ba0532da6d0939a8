mod analysis;
mod constraint_set;
mod container;
mod cyl_load;
mod h_solution;
mod packable;
mod position;
mod solution;

pub mod layer;

#[doc(inline)]
pub use analysis::ContentItem;
#[doc(inline)]
pub use analysis::HAnalysis;
#[doc(inline)]
pub use analysis::HomoAnalysis;

#[doc(inline)]
pub use constraint_set::AllowedOrientations;
#[doc(inline)]
pub use constraint_set::ConstraintSet;

#[doc(inline)]
pub use container::ContainerKind;
#[doc(inline)]
pub use container::ContainerProperties;
#[doc(inline)]
pub use container::InterlayerProperties;

#[doc(inline)]
pub use cyl_load::CylLoad;
#[doc(inline)]
pub use cyl_load::CylLoadFrame;
#[doc(inline)]
pub use cyl_load::LimitReached;

#[doc(inline)]
pub use h_solution::HSolElement;
#[doc(inline)]
pub use h_solution::HSolItem;
#[doc(inline)]
pub use h_solution::HSolution;

#[doc(inline)]
pub use packable::BoxProperties;
#[doc(inline)]
pub use packable::CylinderProperties;
#[doc(inline)]
pub use packable::Packable;

#[doc(inline)]
pub use position::BoxPosition;
#[doc(inline)]
pub use position::CylPosition;
#[doc(inline)]
pub use position::LayerPosition;

#[doc(inline)]
pub use solution::LayerPlacements;
#[doc(inline)]
pub use solution::Solution;
#[doc(inline)]
pub use solution::SolutionLayer;
