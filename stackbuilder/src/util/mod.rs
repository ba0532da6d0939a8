/// Set of functions used throughout assure the correctness of the library.
pub mod assertions;

/// Tolerant float comparisons
pub mod fpa;

mod config;
mod units;

#[doc(inline)]
pub use config::HSolverConfig;
#[doc(inline)]
pub use config::ItemOrdering;
#[doc(inline)]
pub use config::SolverConfig;
#[doc(inline)]
pub use config::VerifyOption;
#[doc(inline)]
pub use units::UnitSystem;
