pub mod config;
pub mod paths;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, resolve_config};
pub use paths::AppPaths;
pub use wiring::build_controller;
