//! Random search with a fixed trial budget
//!
//! Trial `j` uses the method's random draw `j`. The first trial replays draw
//! 0, which restarts the method's walk, and every later trial takes the next
//! draw. The budget is passed in explicitly so callers control it per run.

use crate::error::WorkflowResult;
use crate::optimization::traits::SearchStrategy;
use crate::traits::BlockRefinementMethod;

#[derive(Debug, Clone, Copy)]
pub struct RandomSearch {
    trials: usize,
}

impl RandomSearch {
    pub fn new(trials: usize) -> Self {
        Self { trials }
    }

    pub fn trials(&self) -> usize {
        self.trials
    }
}

impl SearchStrategy for RandomSearch {
    fn name(&self) -> &'static str {
        "random"
    }

    fn trial_count(&self, _method: &dyn BlockRefinementMethod) -> WorkflowResult<usize> {
        Ok(self.trials)
    }

    fn apply_trial(&self, method: &mut dyn BlockRefinementMethod, index: usize) -> WorkflowResult<()> {
        if index == 0 {
            method.set_random_configuration(0)
        } else {
            method.set_next_random_configuration()
        }
    }

    fn replay(&self, method: &mut dyn BlockRefinementMethod, index: usize) -> WorkflowResult<()> {
        method.set_random_configuration(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockBlockRefinementMethod;
    use mockall::predicate::eq;

    #[test]
    fn test_random_restarts_walk_then_draws_then_replays() {
        let mut method = MockBlockRefinementMethod::new();
        method.expect_grid_configuration_count().never();
        method.expect_set_random_configuration().with(eq(0)).times(1).returning(|_| Ok(()));
        method.expect_set_next_random_configuration().times(2).returning(|| Ok(()));
        method.expect_set_random_configuration().with(eq(5)).times(1).returning(|_| Ok(()));

        let search = RandomSearch::new(25);
        assert_eq!(search.trial_count(&method).unwrap(), 25);
        for index in 0..3 {
            search.apply_trial(&mut method, index).unwrap();
        }
        search.replay(&mut method, 5).unwrap();
    }
}
