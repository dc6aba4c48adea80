//! Per-step reports and the summary of a complete workflow run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::performance::PerformanceSnapshot;

/// Performance report emitted after the final run of a workflow step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub method_name: String,
    pub configuration: String,
    pub elapsed_secs: f64,
    pub snapshot: PerformanceSnapshot,
}

impl StepReport {
    /// Multi-line, human-readable rendering used by log and event sinks
    pub fn render(&self) -> String {
        format!(
            "Method name\t:\t{}\n\
             Method configuration\t:\t{}\n\
             Pair completeness (recall)\t:\t{:.4}\n\
             Pair quality (precision)\t:\t{:.6}\n\
             F-measure\t:\t{:.6}\n\
             Aggregate cardinality\t:\t{:.0}\n\
             Detected duplicates\t:\t{} / {}\n\
             Overhead time\t:\t{:.3}s",
            self.method_name,
            self.configuration,
            self.snapshot.recall,
            self.snapshot.precision,
            self.snapshot.f_measure,
            self.snapshot.aggregate_cardinality,
            self.snapshot.detected_duplicates,
            self.snapshot.existing_duplicates,
            self.elapsed_secs,
        )
    }
}

/// Summary of one workflow run, one entry per reported step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResults {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub input_instances: usize,
    pub method_names: Vec<String>,
    pub configurations: Vec<String>,
    pub times: Vec<f64>,
    pub recall: Vec<f64>,
    pub precision: Vec<f64>,
    pub f_measure: Vec<f64>,
    pub existing_duplicates: usize,
    pub detected_duplicates: usize,
    pub total_comparisons: f64,
}

impl WorkflowResults {
    pub fn new(input_instances: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            input_instances,
            method_names: Vec::new(),
            configurations: Vec::new(),
            times: Vec::new(),
            recall: Vec::new(),
            precision: Vec::new(),
            f_measure: Vec::new(),
            existing_duplicates: 0,
            detected_duplicates: 0,
            total_comparisons: 0.0,
        }
    }

    /// Append a step; the duplicate and comparison totals follow the latest step
    pub fn record(&mut self, report: &StepReport) {
        self.method_names.push(report.method_name.clone());
        self.configurations.push(report.configuration.clone());
        self.times.push(report.elapsed_secs);
        self.recall.push(report.snapshot.recall);
        self.precision.push(report.snapshot.precision);
        self.f_measure.push(report.snapshot.f_measure);
        self.existing_duplicates = report.snapshot.existing_duplicates;
        self.detected_duplicates = report.snapshot.detected_duplicates;
        self.total_comparisons = report.snapshot.aggregate_cardinality;
    }

    pub fn step_count(&self) -> usize {
        self.method_names.len()
    }

    /// Overall time spent across all reported steps
    pub fn total_time(&self) -> f64 {
        self.times.iter().sum()
    }
}
