mod hsolver;
mod layer_solver;
mod stack_composer;

/// Packers used by the heterogeneous solver
pub mod bin_packing;

#[doc(inline)]
pub use hsolver::HSolver;
#[doc(inline)]
pub use hsolver::variant_transform;
#[doc(inline)]
pub use layer_solver::CandidateEval;
#[doc(inline)]
pub use layer_solver::LayerSolver;
#[doc(inline)]
pub use stack_composer::StackComposer;
