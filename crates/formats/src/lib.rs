pub mod isoline_file;

pub use isoline_file::*;
