//! Runtime configuration
//!
//! Settings come from environment variables at startup and can be adjusted
//! at runtime through the global config handle.

pub mod settings;

pub use settings::{Config, GLOBAL_CONFIG};
