//! Music library catalog.
//!
//! Walks the library root, resolves metadata for each audio file (sidecar
//! overrides first, embedded tags second) and produces `TrackDescriptor`s.

mod model;
mod overrides;
mod resolve;
mod scan;
mod tags;

pub use model::*;
pub use overrides::{OverrideEntry, Overrides, load_overrides};
pub use scan::{build_catalog, scan};

#[cfg(test)]
mod tests;
