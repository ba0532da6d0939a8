#![doc = document_features::document_features!()]
//! Layer and stack optimisation engine: arranges boxes and cylinders into 2D layers,
//! stacks those layers on pallets, cases or trucks, and packs heterogeneous loads.

/// Entities to model items, containers, constraints, layers and solutions
pub mod entities;

/// Geometric primitives and half-axis algebra
pub mod geometry;

/// Importing analyses into and exporting solutions out of this library
pub mod io;

/// Strategies that generate 2D layer arrangements
pub mod patterns;

/// Layer builder, stack composer and heterogeneous solver
pub mod solvers;

/// Helper functions which do not belong to any specific module
pub mod util;
