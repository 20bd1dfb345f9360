//! Core data layer: records, derived metrics, fetch abstraction and snapshots

pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod log;
pub mod metrics;
pub mod records;
pub mod snapshot;

// Re-export main types for cleaner imports
pub use error::{FetchError, MetricsError, PanelError, Resource};
pub use fetch::{Endpoint, FetchClient};
pub use metrics::{DerivedMetrics, PanelDetail, Trend};
pub use snapshot::{PanelSnapshot, PanelStatus};
