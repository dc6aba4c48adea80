//! Service implementations
//!
//! File-backed input loading and the report sinks used by the workflow runner.

pub mod file_system;
pub mod reporting;

pub use file_system::{load_clusters, load_ground_truth, load_profiles, write_results};
pub use reporting::{format_event, ChannelReportSink, ResultsCollector};
