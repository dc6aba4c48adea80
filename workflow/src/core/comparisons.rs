//! Comparison counting for block collections

use shared::Block;
use tracing::debug;

/// Total pairwise comparisons implied by a block collection
///
/// Always non-negative and additive over disjoint block collections.
pub fn count_comparisons(blocks: &[Block]) -> f64 {
    let total: f64 = blocks.iter().map(Block::comparisons).sum();
    debug!(blocks = blocks.len(), comparisons = total, "Counted comparisons");
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_counts_zero() {
        assert_eq!(count_comparisons(&[]), 0.0);
    }

    #[test]
    fn test_mixed_blocks() {
        let blocks = vec![
            Block::unilateral(vec![0, 1, 2]),       // 3
            Block::unilateral(vec![4]),             // 0
            Block::bilateral(vec![0, 1], vec![2]),  // 2
        ];
        assert_eq!(count_comparisons(&blocks), 5.0);
    }

    #[test]
    fn test_additive_over_disjoint_collections() {
        let first = vec![
            Block::unilateral(vec![0, 1, 2, 3]),
            Block::unilateral(vec![5, 6]),
        ];
        let second = vec![
            Block::unilateral(vec![7, 8, 9]),
            Block::unilateral(vec![10, 11, 12, 13, 14]),
        ];
        let union: Vec<Block> = first.iter().chain(second.iter()).cloned().collect();

        assert_eq!(
            count_comparisons(&union),
            count_comparisons(&first) + count_comparisons(&second)
        );
    }
}
