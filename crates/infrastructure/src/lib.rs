//! Parley Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings loading.

pub mod adapters;
pub mod persistence;
mod serialization;
pub mod settings;

pub use adapters::ReqwestHttpClient;
pub use persistence::FileTokenStore;
pub use settings::{ConfigError, ENV_PREFIX, default_config_path, load_settings};
