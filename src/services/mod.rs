pub mod aggregation;
pub mod pacing;
pub mod snapshot;
pub mod snapshot_store;
pub mod sources;

pub use aggregation::{AggregationEngine, AggregationReport, ProgressFn};
pub use pacing::{CallBoundary, FixedDelayPacing, NoPacing, PacingPolicy};
pub use snapshot::{BuildRequest, Credentials, HttpSourceFactory, SnapshotService, SourceFactory};
pub use snapshot_store::SnapshotStore;
