//! ECS Systems
//!
//! One simulation step runs these in a fixed order: party strategy, spatial
//! index rebuild, media sampling, per-agent forces, metrics, log append,
//! warning sampling.

pub mod forces;
pub mod metrics;
pub mod parties;
pub mod spatial;

// Re-export commonly used systems
pub use forces::{apply_forces, sample_media_shock, MediaShock};
pub use metrics::{
    compute_metrics, gini, polarization, record_metrics, sample_institution_warnings,
    METRICS_LOG_INTERVAL,
};
pub use parties::update_party_strategies;
pub use spatial::{rebuild_spatial_index, CellKey, SpatialIndex};
