//! Core workflow logic
//!
//! Pure block-level computations with no I/O: comparison counting,
//! block building dispatch, performance evaluation and single-pass
//! block processing.

pub mod comparisons;
pub mod dispatcher;
pub mod performance;
pub mod processing;

pub use comparisons::count_comparisons;
pub use dispatcher::{run_block_building, run_block_building_for_label};
pub use performance::{evaluate_blocks, pair_completeness, DuplicatePropagation, PerformanceSnapshot};
pub use processing::{run_block_processing, BlockProcessingOutcome};
