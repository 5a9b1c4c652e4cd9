//! Optional TOML configuration supplying CLI defaults.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, Defaults, OutputFormat};
