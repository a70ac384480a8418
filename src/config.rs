//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive the server
//! and helpers to load configuration from disk and the environment.

mod load;
mod schema;

pub use load::{ConfigSource, resolve_config_source};
pub use schema::*;
