//! Block filtering: keep every profile only in its smallest blocks
//!
//! Blocks are ranked by cardinality. Each profile is retained in the first
//! `round(ratio × blocks containing it)` blocks of that ranking and removed
//! from the rest.

use std::collections::HashMap;

use shared::{Block, EntityId};

use crate::error::WorkflowResult;
use crate::methods::parameters::{ParameterRange, TunableParameter};
use crate::traits::BlockRefinementMethod;

#[derive(Debug, Clone)]
pub struct BlockFiltering {
    ratio: TunableParameter,
}

/// Per-profile block budget and usage for one collection side
#[derive(Default)]
struct Budget {
    limits: HashMap<EntityId, usize>,
    used: HashMap<EntityId, usize>,
}

impl Budget {
    fn count<'a>(&mut self, entities: impl IntoIterator<Item = &'a EntityId>) {
        for entity in entities {
            *self.limits.entry(*entity).or_default() += 1;
        }
    }

    fn apply_ratio(&mut self, ratio: f64) {
        for limit in self.limits.values_mut() {
            *limit = (ratio * *limit as f64).round() as usize;
        }
    }

    fn retain(&mut self, entities: &[EntityId]) -> Vec<EntityId> {
        entities
            .iter()
            .copied()
            .filter(|entity| {
                let limit = self.limits.get(entity).copied().unwrap_or(0);
                let used = self.used.entry(*entity).or_default();
                if *used < limit {
                    *used += 1;
                    true
                } else {
                    false
                }
            })
            .collect()
    }
}

impl BlockFiltering {
    pub const NAME: &'static str = "Block Filtering";
    pub const DEFAULT_RATIO: f64 = 0.8;
    pub const RANGE: ParameterRange = ParameterRange::new(0.025, 1.0, 0.025);

    pub fn new(seed: u64) -> Self {
        Self::with_ratio(Self::DEFAULT_RATIO, seed)
    }

    pub fn with_ratio(ratio: f64, seed: u64) -> Self {
        Self {
            ratio: TunableParameter::new("filtering_ratio", Self::RANGE, ratio, seed),
        }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio.value()
    }
}

impl BlockRefinementMethod for BlockFiltering {
    fn name(&self) -> String {
        Self::NAME.to_string()
    }

    fn describe_configuration(&self) -> String {
        self.ratio.describe()
    }

    fn refine(&self, blocks: &[Block]) -> Vec<Block> {
        let mut ranked: Vec<&Block> = blocks.iter().collect();
        ranked.sort_by(|a, b| a.comparisons().total_cmp(&b.comparisons()));

        let mut source_budget = Budget::default();
        let mut target_budget = Budget::default();
        for block in &ranked {
            match block {
                Block::Unilateral { entities } => source_budget.count(entities),
                Block::Bilateral { source, target } => {
                    source_budget.count(source);
                    target_budget.count(target);
                }
            }
        }
        source_budget.apply_ratio(self.ratio());
        target_budget.apply_ratio(self.ratio());

        ranked
            .into_iter()
            .filter_map(|block| match block {
                Block::Unilateral { entities } => {
                    let kept = source_budget.retain(entities);
                    (kept.len() > 1).then(|| Block::unilateral(kept))
                }
                Block::Bilateral { source, target } => {
                    let source = source_budget.retain(source);
                    let target = target_budget.retain(target);
                    (!source.is_empty() && !target.is_empty()).then(|| Block::bilateral(source, target))
                }
            })
            .collect()
    }

    fn grid_configuration_count(&self) -> WorkflowResult<usize> {
        Ok(self.ratio.grid_count())
    }

    fn set_grid_configuration(&mut self, index: usize) -> WorkflowResult<()> {
        self.ratio.set_grid(Self::NAME, index)
    }

    fn set_next_random_configuration(&mut self) -> WorkflowResult<()> {
        self.ratio.set_next_random();
        Ok(())
    }

    fn set_random_configuration(&mut self, index: usize) -> WorkflowResult<()> {
        self.ratio.set_random(index);
        Ok(())
    }

    fn boxed_clone(&self) -> Box<dyn BlockRefinementMethod> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_ratio_keeps_non_trivial_blocks() {
        let filtering = BlockFiltering::with_ratio(1.0, 0);
        let blocks = vec![
            Block::unilateral(vec![0, 1, 2]),
            Block::unilateral(vec![0, 1]),
        ];
        // ranked by cardinality, smallest first
        assert_eq!(
            filtering.refine(&blocks),
            vec![Block::unilateral(vec![0, 1]), Block::unilateral(vec![0, 1, 2])]
        );
    }

    #[test]
    fn test_half_ratio_keeps_smallest_blocks_per_profile() {
        let filtering = BlockFiltering::with_ratio(0.5, 0);
        let blocks = vec![
            Block::unilateral(vec![0, 1, 2, 3]),
            Block::unilateral(vec![0, 1]),
            Block::unilateral(vec![2, 3]),
            Block::unilateral(vec![0, 2]),
        ];
        // 0 and 2 appear in three blocks (limit 2), 1 and 3 in two (limit 1)
        assert_eq!(
            filtering.refine(&blocks),
            vec![
                Block::unilateral(vec![0, 1]),
                Block::unilateral(vec![2, 3]),
                Block::unilateral(vec![0, 2]),
            ]
        );
    }

    #[test]
    fn test_bilateral_sides_have_separate_budgets() {
        let filtering = BlockFiltering::with_ratio(0.5, 0);
        let blocks = vec![
            Block::bilateral(vec![0], vec![0]),
            Block::bilateral(vec![0, 1], vec![0, 1]),
        ];
        // source 0 and target 0 each keep one of their two blocks
        assert_eq!(
            filtering.refine(&blocks),
            vec![Block::bilateral(vec![0], vec![0]), Block::bilateral(vec![1], vec![1])]
        );
    }

    #[test]
    fn test_grid_and_random_configuration() {
        let mut filtering = BlockFiltering::new(3);
        assert_eq!(filtering.grid_configuration_count().unwrap(), 40);
        assert_eq!(filtering.describe_configuration(), "filtering_ratio=0.8000");

        filtering.set_grid_configuration(39).unwrap();
        assert!((filtering.ratio() - 1.0).abs() < 1e-9);

        filtering.set_random_configuration(0).unwrap();
        assert!(filtering.ratio() >= 0.025 && filtering.ratio() <= 1.0);
    }
}
