//! Procedural generation for the starfield, trail geometry, and built-in models.

pub mod curve;
pub mod shapes;
pub mod starfield;
pub mod tube;

pub use curve::*;
pub use shapes::*;
pub use starfield::*;
pub use tube::*;
