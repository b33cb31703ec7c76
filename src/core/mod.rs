// src/core/mod.rs
//! Configuration, file system and HTTP plumbing shared by the rest of the crate

pub mod config_manager;
pub mod fs_ops;
pub mod service_client;

pub use config_manager::{AppConfig, ConfigManager};
pub use fs_ops::FsOps;
pub use service_client::ProfileClient;
