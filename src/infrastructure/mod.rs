//! Infrastructure layer for filesystem and environment interactions.
//!
//! Platform-specific locations for data and configuration files, and tilde
//! expansion for user-supplied paths.

pub mod paths;

pub use paths::{data_dir, default_config_path, expand_tilde};
