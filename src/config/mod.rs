//! Configuration module for pixed
//!
//! Provides types, discovery and loading for `pixed.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
