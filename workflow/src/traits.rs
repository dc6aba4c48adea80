//! Capability traits with mockall annotations for testing
//!
//! Block building, block refinement, ground truth and reporting are all
//! collaborators of the workflow core. The core only ever talks to them
//! through these traits, so concrete algorithms stay swappable and every
//! component can be exercised against generated mocks.

use shared::{AttributeClusters, Block, EntityProfile};

use crate::core::comparisons::count_comparisons;
use crate::core::performance::pair_completeness;
use crate::error::WorkflowResult;
use crate::models::StepReport;

/// Block building strategy
///
/// Exactly one of the four entry points is used per invocation, chosen by
/// the dispatcher from the resolution mode and the presence of schema clusters.
#[mockall::automock]
pub trait BlockBuildingMethod: Send + Sync {
    /// Human-readable method name
    fn name(&self) -> String;

    /// Dirty ER without schema clusters
    fn build(&self, profiles: &[EntityProfile]) -> Vec<Block>;

    /// Dirty ER scoped by schema clusters
    fn build_with_clusters(&self, profiles: &[EntityProfile], clusters: &[AttributeClusters]) -> Vec<Block>;

    /// Clean-clean ER without schema clusters
    fn build_clean_clean(&self, source: &[EntityProfile], target: &[EntityProfile]) -> Vec<Block>;

    /// Clean-clean ER scoped by schema clusters
    fn build_clean_clean_with_clusters(
        &self,
        source: &[EntityProfile],
        target: &[EntityProfile],
        clusters: &[AttributeClusters],
    ) -> Vec<Block>;
}

/// Block refinement (block cleaning or comparison cleaning) strategy
///
/// Applying a configuration replaces the strategy's parameter state
/// wholesale. `set_random_configuration(j)` must reproduce the j-th value
/// that `set_next_random_configuration` yields on a freshly created instance,
/// and the next sequential draw after it is draw `j + 1`.
#[mockall::automock]
pub trait BlockRefinementMethod: Send + Sync {
    /// Human-readable method name
    fn name(&self) -> String;

    /// Description of the currently active parameters
    fn describe_configuration(&self) -> String;

    /// Produce a new, refined block collection
    fn refine(&self, blocks: &[Block]) -> Vec<Block>;

    /// Size of the finite grid of configurations
    fn grid_configuration_count(&self) -> WorkflowResult<usize>;

    /// Activate the grid configuration at `index`
    fn set_grid_configuration(&mut self, index: usize) -> WorkflowResult<()>;

    /// Draw the next configuration from the method's random generator
    fn set_next_random_configuration(&mut self) -> WorkflowResult<()>;

    /// Replay the random configuration drawn at `index` and continue the walk after it
    fn set_random_configuration(&mut self, index: usize) -> WorkflowResult<()>;

    /// Independent copy carrying its own configuration state
    fn boxed_clone(&self) -> Box<dyn BlockRefinementMethod>;
}

/// Known true matches used to evaluate block collections
#[mockall::automock]
pub trait GroundTruth: Send + Sync {
    /// Number of known matching pairs
    fn existing_duplicates(&self) -> usize;

    /// Number of known matching pairs co-occurring in at least one block
    fn detected_duplicates(&self, blocks: &[Block]) -> usize;

    /// Pair completeness (recall) of a block collection
    fn pair_completeness(&self, blocks: &[Block]) -> f64 {
        pair_completeness(self.detected_duplicates(blocks), self.existing_duplicates())
    }

    /// Total comparisons implied by a block collection
    fn aggregate_cardinality(&self, blocks: &[Block]) -> f64 {
        count_comparisons(blocks)
    }
}

/// Destination for per-step performance reports
///
/// Reporting is diagnostic: callers log and drop any error returned here.
#[mockall::automock]
pub trait ReportSink: Send + Sync {
    fn report(&self, report: &StepReport) -> WorkflowResult<()>;
}
