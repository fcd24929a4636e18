// src/config/mod.rs

//! Task file loading and validation.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading a file from disk.
//! - `validate.rs`: basic invariants (tasks present, no empty commands).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{CommandList, ConfigFile, ConfigSection, RawConfigFile, TaskConfig};
