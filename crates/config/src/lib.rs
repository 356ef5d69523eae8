//! Dotted-key configuration on top of `jsoncraft-store`.
//!
//! [`ConfigManager`] wraps a JSON mapping file and adds path evaluation,
//! `.env` loading and per-key file loggers. A process-wide instance can be
//! installed through [`shared`].

pub mod constants;
pub mod env;
mod error;
pub mod logger;
mod manager;
pub mod path;
pub mod shared;

pub use env::env_var_or_none;
pub use error::ConfigError;
pub use logger::{ConfigLogger, LogFormat};
pub use manager::ConfigManager;
pub use path::PathKind;
