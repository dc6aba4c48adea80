//! Block purging: drop oversized blocks wholesale
//!
//! Size-based purging bounds the number of profiles per block relative to the
//! collection size. Comparison-based purging derives a comparison threshold
//! from the distribution of block cardinalities.

use shared::{Block, EntityId};

use crate::error::WorkflowResult;
use crate::methods::parameters::{ParameterRange, TunableParameter};
use crate::traits::BlockRefinementMethod;

/// Number of distinct ids per side, taken as max id + 1
fn collection_sizes(blocks: &[Block]) -> (usize, usize) {
    let max_plus_one = |ids: &[EntityId]| ids.iter().max().map_or(0, |max| max + 1);

    blocks.iter().fold((0, 0), |(source, target), block| match block {
        Block::Unilateral { entities } => (source.max(max_plus_one(entities)), target),
        Block::Bilateral {
            source: left,
            target: right,
        } => (source.max(max_plus_one(left)), target.max(max_plus_one(right))),
    })
}

#[derive(Debug, Clone)]
pub struct SizeBasedBlockPurging {
    factor: TunableParameter,
}

impl SizeBasedBlockPurging {
    pub const NAME: &'static str = "Size-based Block Purging";
    pub const DEFAULT_FACTOR: f64 = 0.2;
    pub const RANGE: ParameterRange = ParameterRange::new(0.025, 1.0, 0.025);

    pub fn new(seed: u64) -> Self {
        Self::with_factor(Self::DEFAULT_FACTOR, seed)
    }

    pub fn with_factor(factor: f64, seed: u64) -> Self {
        Self {
            factor: TunableParameter::new("purging_factor", Self::RANGE, factor, seed),
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor.value()
    }
}

impl BlockRefinementMethod for SizeBasedBlockPurging {
    fn name(&self) -> String {
        Self::NAME.to_string()
    }

    fn describe_configuration(&self) -> String {
        self.factor.describe()
    }

    fn refine(&self, blocks: &[Block]) -> Vec<Block> {
        let (source_size, target_size) = collection_sizes(blocks);
        let factor = self.factor();

        blocks
            .iter()
            .filter(|block| block.comparisons() > 0.0)
            .filter(|block| match block {
                Block::Unilateral { entities } => entities.len() as f64 <= factor * source_size as f64,
                Block::Bilateral { source, target } => {
                    let limit = factor * source_size.min(target_size) as f64;
                    source.len() as f64 <= limit && target.len() as f64 <= limit
                }
            })
            .cloned()
            .collect()
    }

    fn grid_configuration_count(&self) -> WorkflowResult<usize> {
        Ok(self.factor.grid_count())
    }

    fn set_grid_configuration(&mut self, index: usize) -> WorkflowResult<()> {
        self.factor.set_grid(Self::NAME, index)
    }

    fn set_next_random_configuration(&mut self) -> WorkflowResult<()> {
        self.factor.set_next_random();
        Ok(())
    }

    fn set_random_configuration(&mut self, index: usize) -> WorkflowResult<()> {
        self.factor.set_random(index);
        Ok(())
    }

    fn boxed_clone(&self) -> Box<dyn BlockRefinementMethod> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone)]
pub struct ComparisonBasedBlockPurging {
    smoothing: TunableParameter,
}

impl ComparisonBasedBlockPurging {
    pub const NAME: &'static str = "Comparison-based Block Purging";
    pub const DEFAULT_SMOOTHING: f64 = 1.025;
    pub const RANGE: ParameterRange = ParameterRange::new(1.0, 2.0, 0.025);

    pub fn new(seed: u64) -> Self {
        Self::with_smoothing(Self::DEFAULT_SMOOTHING, seed)
    }

    pub fn with_smoothing(smoothing: f64, seed: u64) -> Self {
        Self {
            smoothing: TunableParameter::new("smoothing_factor", Self::RANGE, smoothing, seed),
        }
    }

    /// Largest comparison count a retained block may have
    ///
    /// Levels are the distinct block cardinalities in ascending order, each
    /// carrying cumulative block assignments and comparisons. Walking down
    /// from the top level, the walk stops at the first level whose
    /// assignments-per-comparison ratio is not at least `smoothing` times the
    /// ratio of the level above it; that upper level becomes the threshold.
    fn max_comparisons(&self, blocks: &[Block]) -> f64 {
        let mut cardinalities: Vec<(f64, f64)> = blocks
            .iter()
            .map(|block| (block.comparisons(), block.size() as f64))
            .filter(|(comparisons, _)| *comparisons > 0.0)
            .collect();
        cardinalities.sort_by(|a, b| a.0.total_cmp(&b.0));

        // (level, cumulative assignments, cumulative comparisons)
        let mut levels: Vec<(f64, f64, f64)> = Vec::new();
        for (comparisons, assignments) in cardinalities {
            match levels.last_mut() {
                Some(level) if level.0 == comparisons => {
                    level.1 += assignments;
                    level.2 += comparisons;
                }
                _ => {
                    let (_, assigned, compared) = levels.last().copied().unwrap_or((0.0, 0.0, 0.0));
                    levels.push((comparisons, assigned + assignments, compared + comparisons));
                }
            }
        }

        let Some(top) = levels.last() else {
            return 0.0;
        };
        if levels.len() == 1 {
            return top.0;
        }

        let smoothing = self.smoothing.value();
        (1..levels.len())
            .rev()
            .find(|&upper| {
                let (_, upper_bc, upper_cc) = levels[upper];
                let (_, lower_bc, lower_cc) = levels[upper - 1];
                lower_bc * upper_cc < smoothing * lower_cc * upper_bc
            })
            .map_or(levels[1].0, |upper| levels[upper].0)
    }
}

impl BlockRefinementMethod for ComparisonBasedBlockPurging {
    fn name(&self) -> String {
        Self::NAME.to_string()
    }

    fn describe_configuration(&self) -> String {
        self.smoothing.describe()
    }

    fn refine(&self, blocks: &[Block]) -> Vec<Block> {
        let threshold = self.max_comparisons(blocks);
        blocks
            .iter()
            .filter(|block| {
                let comparisons = block.comparisons();
                comparisons > 0.0 && comparisons <= threshold
            })
            .cloned()
            .collect()
    }

    fn grid_configuration_count(&self) -> WorkflowResult<usize> {
        Ok(self.smoothing.grid_count())
    }

    fn set_grid_configuration(&mut self, index: usize) -> WorkflowResult<()> {
        self.smoothing.set_grid(Self::NAME, index)
    }

    fn set_next_random_configuration(&mut self) -> WorkflowResult<()> {
        self.smoothing.set_next_random();
        Ok(())
    }

    fn set_random_configuration(&mut self, index: usize) -> WorkflowResult<()> {
        self.smoothing.set_random(index);
        Ok(())
    }

    fn boxed_clone(&self) -> Box<dyn BlockRefinementMethod> {
        Box::new(self.clone())
    }
}
