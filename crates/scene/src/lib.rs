pub mod camera;
pub mod distance;
pub mod isoline;
pub mod picking;
pub mod selection;

pub use isoline::*;
