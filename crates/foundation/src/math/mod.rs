pub mod mat;
pub mod quat;
pub mod sphere;
pub mod vec;

pub use mat::*;
pub use quat::*;
pub use sphere::*;
pub use vec::*;
