//! Report sink implementations
//!
//! `ResultsCollector` accumulates step reports into a `WorkflowResults`
//! summary. `ChannelReportSink` hands reports to a background consumer task
//! so the workflow never blocks on report delivery.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use shared::{stage_debug, stage_info, WorkflowStage};

use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{StepReport, WorkflowResults};
use crate::traits::ReportSink;

/// Frame a report as a server-sent event payload, one `data:` line per line
pub fn format_event(report: &StepReport) -> String {
    let mut event: String = report
        .render()
        .lines()
        .map(|line| format!("data: {line}\n"))
        .collect();
    event.push('\n');
    event
}

/// Collects reports into a shared results summary
#[derive(Debug, Clone)]
pub struct ResultsCollector {
    results: Arc<Mutex<WorkflowResults>>,
}

impl ResultsCollector {
    pub fn new(input_instances: usize) -> Self {
        Self {
            results: Arc::new(Mutex::new(WorkflowResults::new(input_instances))),
        }
    }

    /// Copy of the summary collected so far
    pub fn snapshot(&self) -> WorkflowResults {
        match self.results.lock() {
            Ok(results) => results.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ReportSink for ResultsCollector {
    fn report(&self, report: &StepReport) -> WorkflowResult<()> {
        let mut results = match self.results.lock() {
            Ok(results) => results,
            Err(poisoned) => poisoned.into_inner(),
        };
        results.record(report);
        stage_debug!(
            WorkflowStage::BlockCleaning,
            "Recorded step {} ({})",
            results.step_count(),
            report.method_name
        );
        Ok(())
    }
}

/// Forwards reports to a consumer task over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelReportSink {
    sender: mpsc::UnboundedSender<StepReport>,
}

impl ChannelReportSink {
    pub fn new(sender: mpsc::UnboundedSender<StepReport>) -> Self {
        Self { sender }
    }

    /// Create a sink together with the consumer task draining it
    ///
    /// Every report is logged as a framed event and forwarded to `downstream`.
    /// The task ends once all sink clones are dropped and returns the number
    /// of reports it handled.
    pub fn spawn<S>(downstream: S) -> (Self, JoinHandle<usize>)
    where
        S: ReportSink + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel::<StepReport>();

        let handle = tokio::spawn(async move {
            let mut delivered = 0;
            while let Some(report) = receiver.recv().await {
                stage_info!(WorkflowStage::BlockCleaning, "Step report\n{}", format_event(&report));
                if let Err(err) = downstream.report(&report) {
                    stage_debug!(WorkflowStage::BlockCleaning, "Downstream sink rejected report: {}", err);
                }
                delivered += 1;
            }
            delivered
        });

        (Self::new(sender), handle)
    }
}

impl ReportSink for ChannelReportSink {
    fn report(&self, report: &StepReport) -> WorkflowResult<()> {
        self.sender
            .send(report.clone())
            .map_err(|_| WorkflowError::ReportChannelClosed)
    }
}
