//! Exhaustive grid search
//!
//! Visits every grid configuration a method reports, in index order.

use crate::error::WorkflowResult;
use crate::optimization::traits::SearchStrategy;
use crate::traits::BlockRefinementMethod;

#[derive(Debug, Clone, Copy, Default)]
pub struct GridSearch;

impl SearchStrategy for GridSearch {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn trial_count(&self, method: &dyn BlockRefinementMethod) -> WorkflowResult<usize> {
        method.grid_configuration_count()
    }

    fn apply_trial(&self, method: &mut dyn BlockRefinementMethod, index: usize) -> WorkflowResult<()> {
        method.set_grid_configuration(index)
    }

    fn replay(&self, method: &mut dyn BlockRefinementMethod, index: usize) -> WorkflowResult<()> {
        method.set_grid_configuration(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockBlockRefinementMethod;
    use mockall::predicate::eq;

    #[test]
    fn test_grid_uses_numbered_configurations() {
        let mut method = MockBlockRefinementMethod::new();
        method.expect_grid_configuration_count().returning(|| Ok(7));
        method.expect_set_grid_configuration().with(eq(3)).times(2).returning(|_| Ok(()));
        method.expect_set_next_random_configuration().never();

        let search = GridSearch;
        assert_eq!(search.trial_count(&method).unwrap(), 7);
        search.apply_trial(&mut method, 3).unwrap();
        search.replay(&mut method, 3).unwrap();
    }
}
