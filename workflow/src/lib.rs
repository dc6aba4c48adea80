//! Blocking-based entity resolution workflow
//!
//! Groups candidate-matching profiles into blocks, refines the blocks through
//! pluggable cleaning methods and can tune every cleaning method against a
//! ground truth, maximizing recall times comparison reduction.

pub mod config;
pub mod core;
pub mod error;
pub mod methods;
pub mod models;
pub mod optimization;
pub mod runner;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use config::{Args, CleaningStep, StepConfiguration, WorkflowConfig};
pub use crate::core::{
    count_comparisons, evaluate_blocks, run_block_building, run_block_processing, BlockProcessingOutcome,
    DuplicatePropagation, PerformanceSnapshot,
};
pub use error::{WorkflowError, WorkflowResult};
pub use models::{StepReport, WorkflowResults};
pub use optimization::{ConfigurationOptimizer, OptimizationOutcome, SearchMode, StopSignal};
pub use runner::{WorkflowInputs, WorkflowRun, WorkflowRunner};
pub use traits::{BlockBuildingMethod, BlockRefinementMethod, GroundTruth, ReportSink};
