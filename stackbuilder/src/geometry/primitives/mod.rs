mod bbox;
mod vector;

#[doc(inline)]
pub use bbox::BBox2D;
#[doc(inline)]
pub use bbox::BBox3D;
#[doc(inline)]
pub use vector::Vector2;
#[doc(inline)]
pub use vector::Vector3;
