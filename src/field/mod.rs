//! Level elements that act on molecules through space: barriers, portals,
//! brownian elements and molecule releasers.
//!
//! All shapes evaluate distances in their local frame and share the Wendland
//! falloff from [`kernel`].

pub mod barrier;
pub mod brownian;
pub mod kernel;
pub mod portal;
pub mod releaser;
pub mod transform;

pub use barrier::*;
pub use brownian::*;
pub use kernel::{wendland_2_1, Falloff};
pub use portal::*;
pub use releaser::*;
pub use transform::Transform;
