//! Search strategy trait definition

use crate::error::WorkflowResult;
use crate::traits::BlockRefinementMethod;

/// Walks the configuration space of a block refinement method
///
/// `apply_trial` is used by the sequential search and may consume method
/// state (such as a random generator). `replay` must put the method into the
/// exact configuration trial `index` used, on any instance, which lets the
/// winner be restored and lets isolated clones run trials in parallel.
pub trait SearchStrategy: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Number of trials this search will run for the method
    fn trial_count(&self, method: &dyn BlockRefinementMethod) -> WorkflowResult<usize>;

    /// Activate the configuration of trial `index` in a sequential walk
    fn apply_trial(&self, method: &mut dyn BlockRefinementMethod, index: usize) -> WorkflowResult<()>;

    /// Re-activate the configuration of trial `index`
    fn replay(&self, method: &mut dyn BlockRefinementMethod, index: usize) -> WorkflowResult<()>;
}
