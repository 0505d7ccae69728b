pub mod config;
pub mod group;
pub mod trackball;
pub mod view;

pub use config::{ConfigError, ViewerConfig};
pub use view::View;
