//! Output Generation
//!
//! Metrics CSV export and world snapshots for external collaborators.

pub mod export;
pub mod snapshot;

pub use export::*;
pub use snapshot::*;
