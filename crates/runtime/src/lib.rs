pub mod frame;
pub mod input;
pub mod transition;

pub use frame::*;
pub use input::*;
pub use transition::*;
