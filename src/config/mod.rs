pub mod descriptor;
pub mod registry;

pub use descriptor::{ServiceConfiguration, CONFIG_DEFAULT};
pub use registry::ConfigRegistry;
