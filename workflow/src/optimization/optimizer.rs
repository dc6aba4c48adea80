//! Configuration optimizer for block refinement methods
//!
//! Every trial refines the same, untouched input blocks under one
//! configuration and is scored as `recall × (1 − cardinality / baseline)`.
//! The baseline is the comparison count of the input, fixed before the first
//! trial. After the search the method is left configured with the winner.

use std::sync::Arc;

use shared::{stage_debug, stage_info, Block, WorkflowStage};
use tokio::task::JoinSet;

use super::traits::SearchStrategy;
use super::types::{BestTrial, OptimizationOutcome, SearchMode, StopSignal, TrialScore};
use crate::core::comparisons::count_comparisons;
use crate::core::performance::evaluate_blocks;
use crate::error::{WorkflowError, WorkflowResult};
use crate::traits::{BlockRefinementMethod, GroundTruth};

/// Searches a refinement method's configuration space for the best trade-off
/// between recall and comparison reduction
pub struct ConfigurationOptimizer {
    mode: SearchMode,
    stop: StopSignal,
}

impl ConfigurationOptimizer {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            stop: StopSignal::new(),
        }
    }

    /// Attach a stop signal checked before every trial
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Handle that stops a running search at the next trial boundary
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Run the search sequentially against a single method instance
    pub fn optimize(
        &self,
        method: &mut dyn BlockRefinementMethod,
        blocks: &[Block],
        ground_truth: Option<&dyn GroundTruth>,
    ) -> WorkflowResult<OptimizationOutcome> {
        let ground_truth =
            ground_truth.ok_or_else(|| WorkflowError::missing_ground_truth("configuration optimization"))?;
        let search = self.mode.strategy();

        let baseline = count_comparisons(blocks);
        let trials = search.trial_count(method)?;
        stage_info!(
            WorkflowStage::BlockCleaning,
            "Optimizing {} with {} search: {} trials, baseline {} comparisons",
            method.name(),
            search.name(),
            trials,
            baseline
        );

        let mut best = BestTrial::default();
        let mut trials_run = 0;
        let mut trials_scored = 0;
        let mut stopped = false;

        for index in 0..trials {
            if self.stop.is_stopped() {
                stopped = true;
                break;
            }

            search.apply_trial(method, index)?;
            trials_run += 1;

            if let Some(trial) = score_trial(&*method, blocks, ground_truth, baseline, index)? {
                trials_scored += 1;
                best.offer(&trial);
            }
        }

        self.finish(method, search.as_ref(), best, baseline, trials_run, trials_scored, stopped)
    }

    /// Run the search on blocking worker threads
    ///
    /// Every trial works on its own clone of `method`, configured by replaying
    /// the trial index, so no configuration state is shared between trials.
    /// Scores are reduced in trial order, which gives the same winner as the
    /// sequential search.
    pub async fn optimize_parallel(
        &self,
        method: &mut dyn BlockRefinementMethod,
        blocks: Arc<Vec<Block>>,
        ground_truth: Option<Arc<dyn GroundTruth>>,
        workers: usize,
    ) -> WorkflowResult<OptimizationOutcome> {
        let ground_truth =
            ground_truth.ok_or_else(|| WorkflowError::missing_ground_truth("configuration optimization"))?;
        let search = self.mode.strategy();

        let baseline = count_comparisons(&blocks);
        let trials = search.trial_count(method)?;
        let workers = workers.clamp(1, trials.max(1));
        stage_info!(
            WorkflowStage::BlockCleaning,
            "Optimizing {} with parallel {} search: {} trials on {} workers, baseline {} comparisons",
            method.name(),
            search.name(),
            trials,
            workers,
            baseline
        );

        // Raised when a worker fails so the others stop at their next trial
        let abandon = StopSignal::new();
        let mut tasks = JoinSet::new();
        for worker in 0..workers {
            let template = method.boxed_clone();
            let blocks = Arc::clone(&blocks);
            let ground_truth = Arc::clone(&ground_truth);
            let stop = self.stop.clone();
            let abandon = abandon.clone();
            let mode = self.mode;

            tasks.spawn_blocking(move || -> WorkflowResult<(usize, Vec<TrialScore>)> {
                let search = mode.strategy();
                let mut attempted = 0;
                let mut scores = Vec::new();

                for index in (worker..trials).step_by(workers) {
                    if stop.is_stopped() || abandon.is_stopped() {
                        break;
                    }
                    let mut trial_method = template.boxed_clone();
                    search.replay(trial_method.as_mut(), index)?;
                    attempted += 1;

                    if let Some(trial) =
                        score_trial(trial_method.as_ref(), &blocks, ground_truth.as_ref(), baseline, index)?
                    {
                        scores.push(trial);
                    }
                }
                Ok((attempted, scores))
            });
        }

        let mut trials_run = 0;
        let mut scores = Vec::new();
        let mut failure = None;
        while let Some(joined) = tasks.join_next().await {
            let worker = joined
                .map_err(|err| WorkflowError::TrialPanicked {
                    message: err.to_string(),
                })
                .and_then(|result| result);
            match worker {
                Ok((attempted, worker_scores)) => {
                    trials_run += attempted;
                    scores.extend(worker_scores);
                }
                Err(err) => {
                    abandon.stop();
                    if failure.is_none() {
                        failure = Some(err);
                    }
                }
            }
        }
        if let Some(err) = failure {
            return Err(err);
        }

        scores.sort_by_key(|trial| trial.index);
        let mut best = BestTrial::default();
        for trial in &scores {
            best.offer(trial);
        }

        let stopped = trials_run < trials;
        self.finish(method, search.as_ref(), best, baseline, trials_run, scores.len(), stopped)
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        method: &mut dyn BlockRefinementMethod,
        search: &dyn SearchStrategy,
        best: BestTrial,
        baseline: f64,
        trials_run: usize,
        trials_scored: usize,
        stopped: bool,
    ) -> WorkflowResult<OptimizationOutcome> {
        if trials_run > 0 {
            search.replay(method, best.index)?;
        }

        stage_info!(
            WorkflowStage::BlockCleaning,
            "Best iteration: {}, best performance: {:.6} ({} of {} trials scored{})",
            best.index,
            best.score,
            trials_scored,
            trials_run,
            if stopped { ", stopped early" } else { "" }
        );
        stage_debug!(
            WorkflowStage::BlockCleaning,
            "{} configured as {}",
            method.name(),
            method.describe_configuration()
        );

        Ok(OptimizationOutcome {
            best_index: best.index,
            best_score: best.score,
            baseline,
            trials_run,
            trials_scored,
            stopped,
        })
    }
}

/// Refine the input under the active configuration and score the result
///
/// Returns `None` when refinement leaves no blocks; such a trial cannot win.
fn score_trial(
    method: &dyn BlockRefinementMethod,
    blocks: &[Block],
    ground_truth: &dyn GroundTruth,
    baseline: f64,
    index: usize,
) -> WorkflowResult<Option<TrialScore>> {
    let refined = method.refine(blocks);
    if refined.is_empty() {
        return Ok(None);
    }

    let snapshot = evaluate_blocks(&refined, Some(ground_truth))?;
    Ok(Some(TrialScore::new(
        index,
        snapshot.recall,
        snapshot.aggregate_cardinality,
        baseline,
    )))
}
