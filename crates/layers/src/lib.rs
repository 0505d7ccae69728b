pub mod isolines;

pub use isolines::*;
