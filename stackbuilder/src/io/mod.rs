/// External (serializable) representations of analyses and solutions.
pub mod ext_repr;

/// All logic for converting external representations into internal ones
pub mod import;

/// All logic for exporting solutions out of the library
pub mod export;

#[doc(inline)]
pub use import::Importer;
