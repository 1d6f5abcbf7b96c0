//! Application configuration module.
//!
//! Manages the TOML config file holding OMDb access settings, and
//! resolves where config, database and log files live.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{API_KEY_ENV, AppConfig, mask_key};
pub use paths::{resolve_config_path, resolve_log_path};
