//! Block collection performance against a ground truth
//!
//! Recall here is pair completeness: the share of known matching pairs that
//! still co-occur in at least one block. Aggregate cardinality is the total
//! number of comparisons the blocks imply.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use shared::{Block, EntityId, ErMode, IdDuplicates};

use crate::error::{WorkflowError, WorkflowResult};
use crate::traits::GroundTruth;

/// Performance of one block collection, computed once and never mutated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    /// Pair completeness in [0, 1]
    pub recall: f64,
    /// Pair quality: detected duplicates per comparison
    pub precision: f64,
    pub f_measure: f64,
    pub aggregate_cardinality: f64,
    pub detected_duplicates: usize,
    pub existing_duplicates: usize,
}

impl PerformanceSnapshot {
    fn from_counts(detected: usize, existing: usize, cardinality: f64) -> Self {
        let recall = pair_completeness(detected, existing);
        let precision = if cardinality > 0.0 {
            detected as f64 / cardinality
        } else {
            0.0
        };
        let f_measure = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            recall,
            precision,
            f_measure,
            aggregate_cardinality: cardinality,
            detected_duplicates: detected,
            existing_duplicates: existing,
        }
    }
}

/// Share of existing duplicates that were detected; zero with no duplicates
pub fn pair_completeness(detected: usize, existing: usize) -> f64 {
    if existing == 0 {
        0.0
    } else {
        detected as f64 / existing as f64
    }
}

/// Evaluate a block collection against the ground truth
///
/// Fails with `MissingGroundTruth` when no ground truth is bound.
pub fn evaluate_blocks(
    blocks: &[Block],
    ground_truth: Option<&dyn GroundTruth>,
) -> WorkflowResult<PerformanceSnapshot> {
    let ground_truth =
        ground_truth.ok_or_else(|| WorkflowError::missing_ground_truth("block performance evaluation"))?;

    let detected = ground_truth.detected_duplicates(blocks);
    let existing = ground_truth.existing_duplicates();
    let cardinality = ground_truth.aggregate_cardinality(blocks).max(0.0);

    Ok(PerformanceSnapshot::from_counts(detected, existing, cardinality))
}

/// Ground truth backed by an explicit set of duplicate pairs
///
/// In dirty mode pairs are order-independent and both ids index the single
/// collection. In clean-clean mode `source` ids index the first collection
/// and `target` ids the second.
#[derive(Debug, Clone)]
pub struct DuplicatePropagation {
    mode: ErMode,
    duplicates: HashSet<IdDuplicates>,
}

impl DuplicatePropagation {
    pub fn new(mode: ErMode, pairs: impl IntoIterator<Item = IdDuplicates>) -> Self {
        let duplicates = pairs
            .into_iter()
            .filter(|pair| mode == ErMode::CleanClean || pair.source != pair.target)
            .map(|pair| match mode {
                ErMode::Dirty => pair.normalized(),
                ErMode::CleanClean => pair,
            })
            .collect();

        Self { mode, duplicates }
    }

    pub fn mode(&self) -> ErMode {
        self.mode
    }

    pub fn duplicates(&self) -> &HashSet<IdDuplicates> {
        &self.duplicates
    }

    /// Sorted block ids per entity, one index per collection side
    fn block_index(blocks: &[Block]) -> (HashMap<EntityId, Vec<usize>>, HashMap<EntityId, Vec<usize>>) {
        let mut source_index: HashMap<EntityId, Vec<usize>> = HashMap::new();
        let mut target_index: HashMap<EntityId, Vec<usize>> = HashMap::new();

        for (block_id, block) in blocks.iter().enumerate() {
            match block {
                Block::Unilateral { entities } => {
                    for &entity in entities {
                        source_index.entry(entity).or_default().push(block_id);
                    }
                }
                Block::Bilateral { source, target } => {
                    for &entity in source {
                        source_index.entry(entity).or_default().push(block_id);
                    }
                    for &entity in target {
                        target_index.entry(entity).or_default().push(block_id);
                    }
                }
            }
        }

        // Block ids are pushed in ascending order; repeated ids inside one block are collapsed.
        for ids in source_index.values_mut().chain(target_index.values_mut()) {
            ids.dedup();
        }
        (source_index, target_index)
    }

    fn share_block(left: Option<&Vec<usize>>, right: Option<&Vec<usize>>) -> bool {
        let (Some(left), Some(right)) = (left, right) else {
            return false;
        };

        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            match left[i].cmp(&right[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => return true,
            }
        }
        false
    }
}

impl GroundTruth for DuplicatePropagation {
    fn existing_duplicates(&self) -> usize {
        self.duplicates.len()
    }

    fn detected_duplicates(&self, blocks: &[Block]) -> usize {
        let (source_index, target_index) = Self::block_index(blocks);

        self.duplicates
            .iter()
            .filter(|pair| match self.mode {
                ErMode::Dirty => {
                    Self::share_block(source_index.get(&pair.source), source_index.get(&pair.target))
                }
                ErMode::CleanClean => {
                    Self::share_block(source_index.get(&pair.source), target_index.get(&pair.target))
                }
            })
            .count()
    }
}
