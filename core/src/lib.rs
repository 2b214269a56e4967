//! cecl-core — synthetic CECL portfolio data pipeline.
//!
//! The library generates a deterministic synthetic loan book and the
//! derived views a credit-risk dashboard renders: quarterly risk
//! snapshots, pre-charge-off trajectories, portfolio/segment/state
//! rollups, and backtesting statistics.
//!
//! RULES:
//!   - All randomness flows through `rng::LcgRng`; no platform RNG.
//!   - Each generator family owns a seed stream (`rng::StreamSlot`).
//!   - Generated data is immutable; aggregation is read-only.
//!   - The external clients (narrative, macro series) consume the
//!     aggregates and degrade to deterministic local fallbacks; they
//!     never feed back into generation.

pub mod aggregation;
pub mod backtest;
pub mod calendar;
pub mod chargeoff;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loan;
pub mod macro_data;
pub mod narrative;
pub mod rng;
pub mod snapshot;
pub mod types;

pub use aggregation::{
    all_segment_metrics, geographic_metrics, geographic_summary, portfolio_metrics,
    report_data, segment_metrics, PortfolioMetrics, ReportData, SegmentMetrics,
};
pub use config::{GeneratorConfig, Segment, SEGMENTS};
pub use dataset::{DatasetParams, PortfolioDataset};
pub use error::{CoreError, CoreResult};
