//! Optimization-related types and data structures

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::strategies::{GridSearch, RandomSearch};
use super::traits::SearchStrategy;

/// Random search trial budget used when none is given
pub const DEFAULT_RANDOM_TRIALS: usize = 100;

/// How the configuration space is explored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Every grid configuration, in index order
    Grid,
    /// A fixed number of random draws
    Random { trials: usize },
}

impl SearchMode {
    pub fn random() -> Self {
        SearchMode::Random {
            trials: DEFAULT_RANDOM_TRIALS,
        }
    }

    /// Search strategy implementing this mode
    pub fn strategy(&self) -> Box<dyn SearchStrategy> {
        match *self {
            SearchMode::Grid => Box::new(GridSearch),
            SearchMode::Random { trials } => Box::new(RandomSearch::new(trials)),
        }
    }
}

/// Score of one scored trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialScore {
    pub index: usize,
    pub recall: f64,
    pub cardinality: f64,
    pub score: f64,
}

impl TrialScore {
    /// `recall × reduction ratio` against a fixed baseline
    ///
    /// A zero baseline leaves nothing to reduce, so the ratio is zero.
    pub fn new(index: usize, recall: f64, cardinality: f64, baseline: f64) -> Self {
        let reduction_ratio = if baseline > 0.0 {
            1.0 - cardinality / baseline
        } else {
            0.0
        };

        Self {
            index,
            recall,
            cardinality,
            score: recall * reduction_ratio,
        }
    }
}

/// Diagnostics of a finished (or stopped) optimization run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationOutcome {
    pub best_index: usize,
    pub best_score: f64,
    /// Comparisons of the input blocks, computed before the first trial
    pub baseline: f64,
    /// Trials whose configuration was applied
    pub trials_run: usize,
    /// Trials that produced blocks and were scored
    pub trials_scored: usize,
    /// Whether a stop signal ended the search early
    pub stopped: bool,
}

/// Cooperative cancellation flag checked at every trial boundary
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Running best-of reduction: strictly greater scores win, ties keep the earlier trial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestTrial {
    pub index: usize,
    pub score: f64,
}

impl Default for BestTrial {
    fn default() -> Self {
        Self { index: 0, score: 0.0 }
    }
}

impl BestTrial {
    pub fn offer(&mut self, trial: &TrialScore) {
        if trial.score > self.score {
            self.index = trial.index;
            self.score = trial.score;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_recall_times_reduction() {
        let trial = TrialScore::new(0, 0.8, 500.0, 1000.0);
        assert!((trial.score - 0.40).abs() < 1e-12);

        let trial = TrialScore::new(1, 0.6, 200.0, 1000.0);
        assert!((trial.score - 0.48).abs() < 1e-12);
    }

    #[test]
    fn test_score_zeroes_on_either_factor() {
        assert_eq!(TrialScore::new(0, 0.0, 10.0, 1000.0).score, 0.0);
        assert_eq!(TrialScore::new(0, 1.0, 1000.0, 1000.0).score, 0.0);
        assert_eq!(TrialScore::new(0, 1.0, 0.0, 0.0).score, 0.0);
    }

    #[test]
    fn test_best_trial_keeps_first_on_ties() {
        let mut best = BestTrial::default();
        best.offer(&TrialScore::new(2, 0.5, 500.0, 1000.0));
        best.offer(&TrialScore::new(3, 0.5, 500.0, 1000.0));
        assert_eq!(best.index, 2);
        assert_eq!(best.score, 0.25);

        best.offer(&TrialScore::new(4, 0.5, 400.0, 1000.0));
        assert_eq!(best.index, 4);
    }

    #[test]
    fn test_stop_signal_shared_between_clones() {
        let signal = StopSignal::new();
        let clone = signal.clone();
        assert!(!clone.is_stopped());
        signal.stop();
        assert!(clone.is_stopped());
    }

    #[test]
    fn test_default_random_budget() {
        assert_eq!(SearchMode::random(), SearchMode::Random { trials: 100 });
        assert_eq!(SearchMode::Grid.strategy().name(), "grid");
    }
}
