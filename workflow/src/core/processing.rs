//! Single-pass block processing
//!
//! Applies one refinement method to a block collection, times it, and on the
//! final run of a step reports its performance.

use std::time::Instant;

use shared::{stage_debug, stage_warn, Block, WorkflowStage};

use crate::core::performance::{evaluate_blocks, PerformanceSnapshot};
use crate::models::StepReport;
use crate::traits::{BlockRefinementMethod, GroundTruth, ReportSink};

/// Output of one block processing pass
#[derive(Debug, Clone)]
pub struct BlockProcessingOutcome {
    pub blocks: Vec<Block>,
    pub performance: Option<PerformanceSnapshot>,
    pub elapsed_secs: f64,
}

impl BlockProcessingOutcome {
    fn empty() -> Self {
        Self {
            blocks: Vec::new(),
            performance: None,
            elapsed_secs: 0.0,
        }
    }
}

/// Process blocks with the given refinement method
///
/// An empty block collection short-circuits without calling the method.
/// Performance is measured and reported only when `final_run` is set and
/// a ground truth is bound; sink failures are logged and dropped.
pub fn run_block_processing(
    ground_truth: Option<&dyn GroundTruth>,
    final_run: bool,
    blocks: &[Block],
    method: &dyn BlockRefinementMethod,
    sink: &dyn ReportSink,
) -> BlockProcessingOutcome {
    if blocks.is_empty() {
        stage_debug!(WorkflowStage::BlockCleaning, "No blocks to process, skipping {}", method.name());
        return BlockProcessingOutcome::empty();
    }

    let started = Instant::now();
    let refined = method.refine(blocks);
    let elapsed_secs = started.elapsed().as_secs_f64();

    let performance = match (final_run, ground_truth) {
        (true, Some(ground_truth)) => match evaluate_blocks(&refined, Some(ground_truth)) {
            Ok(snapshot) => {
                let report = StepReport {
                    method_name: method.name(),
                    configuration: method.describe_configuration(),
                    elapsed_secs,
                    snapshot,
                };
                if let Err(err) = sink.report(&report) {
                    stage_warn!(WorkflowStage::BlockCleaning, "Failed to report {}: {}", report.method_name, err);
                }
                Some(snapshot)
            }
            Err(err) => {
                stage_warn!(WorkflowStage::BlockCleaning, "Skipping performance of {}: {}", method.name(), err);
                None
            }
        },
        _ => None,
    };

    stage_debug!(
        WorkflowStage::BlockCleaning,
        "{} refined {} blocks into {} in {:.3}s",
        method.name(),
        blocks.len(),
        refined.len(),
        elapsed_secs
    );

    BlockProcessingOutcome {
        blocks: refined,
        performance,
        elapsed_secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::performance::DuplicatePropagation;
    use crate::error::WorkflowError;
    use crate::traits::{MockBlockRefinementMethod, MockReportSink};
    use shared::{ErMode, IdDuplicates};

    fn input_blocks() -> Vec<Block> {
        vec![
            Block::unilateral(vec![0, 1, 2, 3]),
            Block::unilateral(vec![2, 3]),
        ]
    }

    fn truth() -> DuplicatePropagation {
        DuplicatePropagation::new(ErMode::Dirty, vec![IdDuplicates::new(2, 3), IdDuplicates::new(0, 9)])
    }

    fn keep_last_block() -> MockBlockRefinementMethod {
        let mut method = MockBlockRefinementMethod::new();
        method.expect_name().returning(|| "Keep Last".to_string());
        method.expect_describe_configuration().returning(|| "none".to_string());
        method.expect_refine()
            .times(1)
            .returning(|blocks| blocks.last().cloned().into_iter().collect());
        method
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let mut method = MockBlockRefinementMethod::new();
        method.expect_name().returning(|| "Never".to_string());
        method.expect_refine().never();
        let mut sink = MockReportSink::new();
        sink.expect_report().never();

        let truth = truth();
        let outcome = run_block_processing(Some(&truth), true, &[], &method, &sink);

        assert!(outcome.blocks.is_empty());
        assert!(outcome.performance.is_none());
        assert_eq!(outcome.elapsed_secs, 0.0);
    }

    #[test]
    fn test_final_run_reports_performance() {
        let method = keep_last_block();
        let mut sink = MockReportSink::new();
        sink.expect_report()
            .times(1)
            .withf(|report| report.method_name == "Keep Last" && report.configuration == "none")
            .returning(|_| Ok(()));

        let truth = truth();
        let outcome = run_block_processing(Some(&truth), true, &input_blocks(), &method, &sink);

        assert_eq!(outcome.blocks, vec![Block::unilateral(vec![2, 3])]);
        let snapshot = outcome.performance.expect("snapshot on final run");
        assert_eq!(snapshot.recall, 0.5);
        assert_eq!(snapshot.aggregate_cardinality, 1.0);
        assert!(outcome.elapsed_secs >= 0.0);
    }

    #[test]
    fn test_non_final_run_skips_evaluation() {
        let method = keep_last_block();
        let mut sink = MockReportSink::new();
        sink.expect_report().never();

        let truth = truth();
        let outcome = run_block_processing(Some(&truth), false, &input_blocks(), &method, &sink);

        assert_eq!(outcome.blocks.len(), 1);
        assert!(outcome.performance.is_none());
    }

    #[test]
    fn test_final_run_without_ground_truth_skips_evaluation() {
        let method = keep_last_block();
        let mut sink = MockReportSink::new();
        sink.expect_report().never();

        let outcome = run_block_processing(None, true, &input_blocks(), &method, &sink);
        assert!(outcome.performance.is_none());
        assert_eq!(outcome.blocks.len(), 1);
    }

    #[test]
    fn test_sink_failure_does_not_fail_run() {
        let method = keep_last_block();
        let mut sink = MockReportSink::new();
        sink.expect_report()
            .times(1)
            .returning(|_| Err(WorkflowError::ReportChannelClosed));

        let truth = truth();
        let outcome = run_block_processing(Some(&truth), true, &input_blocks(), &method, &sink);
        assert!(outcome.performance.is_some());
    }
}
