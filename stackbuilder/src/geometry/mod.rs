mod half_axis;
mod transformation;

/// Geometric primitives: vectors and axis-aligned bounding boxes
pub mod primitives;

#[doc(inline)]
pub use half_axis::HalfAxis;
#[doc(inline)]
pub use transformation::Transform3D;
