//! End-to-end workflow: block building followed by the configured cleaning steps

use std::sync::Arc;
use std::time::Instant;

use shared::logging::{log_error, log_progress, log_success};
use shared::{stage_error, stage_info, stage_warn, AttributeClusters, Block, EntityProfile, ErMode, WorkflowStage};

use crate::config::{CleaningStep, StepConfiguration, WorkflowConfig};
use crate::core::{evaluate_blocks, run_block_building, run_block_processing, DuplicatePropagation};
use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{StepReport, WorkflowResults};
use crate::optimization::{ConfigurationOptimizer, OptimizationOutcome, StopSignal};
use crate::services::{self, ChannelReportSink, ResultsCollector};
use crate::traits::{BlockRefinementMethod, GroundTruth, ReportSink};

/// Profile collections and optional ground truth of one run
#[derive(Debug, Clone)]
pub struct WorkflowInputs {
    pub source: Vec<EntityProfile>,
    pub target: Option<Vec<EntityProfile>>,
    pub clusters: Option<Vec<AttributeClusters>>,
    pub ground_truth: Option<Arc<DuplicatePropagation>>,
}

impl WorkflowInputs {
    pub fn instance_count(&self) -> usize {
        self.source.len() + self.target.as_ref().map_or(0, Vec::len)
    }

    /// Read every input named by the configuration
    pub async fn load(config: &WorkflowConfig) -> WorkflowResult<Self> {
        let source = services::load_profiles(&config.inputs.source).await?;
        let target = match (config.mode, &config.inputs.target) {
            (ErMode::CleanClean, Some(path)) => Some(services::load_profiles(path).await?),
            (ErMode::CleanClean, None) => return Err(WorkflowError::MissingTargetProfiles),
            (ErMode::Dirty, _) => None,
        };
        let clusters = match &config.inputs.clusters {
            Some(path) => Some(services::load_clusters(path).await?),
            None => None,
        };
        let ground_truth = match &config.inputs.ground_truth {
            Some(path) => Some(Arc::new(
                services::load_ground_truth(path, config.mode, source.len(), target.as_ref().map(Vec::len)).await?,
            )),
            None => None,
        };

        Ok(Self {
            source,
            target,
            clusters,
            ground_truth,
        })
    }
}

/// Tuning diagnostics of one automatically configured step
#[derive(Debug, Clone)]
pub struct StepOptimization {
    pub method_name: String,
    pub configuration: String,
    pub outcome: OptimizationOutcome,
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct WorkflowRun {
    pub blocks: Vec<Block>,
    pub results: WorkflowResults,
    pub optimizations: Vec<StepOptimization>,
}

pub struct WorkflowRunner {
    config: WorkflowConfig,
    stop: StopSignal,
}

impl WorkflowRunner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            stop: StopSignal::new(),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Handle that stops any running optimization at its next trial
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub async fn run(&self, inputs: WorkflowInputs) -> WorkflowResult<WorkflowRun> {
        let collector = ResultsCollector::new(inputs.instance_count());
        let (sink, consumer) = ChannelReportSink::spawn(collector.clone());

        let run = self.run_steps(&inputs, &sink).await;

        drop(sink);
        let delivered = consumer.await.map_err(|err| WorkflowError::TrialPanicked {
            message: format!("report consumer failed: {err}"),
        })?;
        let (blocks, optimizations) = run?;

        let results = collector.snapshot();
        log_success(&format!(
            "Workflow finished: {} blocks, {} reported steps, {:.3}s",
            blocks.len(),
            delivered,
            results.total_time()
        ));

        Ok(WorkflowRun {
            blocks,
            results,
            optimizations,
        })
    }

    async fn run_steps(
        &self,
        inputs: &WorkflowInputs,
        sink: &dyn ReportSink,
    ) -> WorkflowResult<(Vec<Block>, Vec<StepOptimization>)> {
        let ground_truth = inputs.ground_truth.as_deref().map(|truth| truth as &dyn GroundTruth);
        let mut blocks = self.build_blocks(inputs, ground_truth, sink).map_err(|err| {
            stage_error!(
                WorkflowStage::BlockBuilding,
                "{} failed: {}",
                self.config.block_building,
                err
            );
            err
        })?;

        let mut optimizations = Vec::new();
        for (position, step) in self.config.cleaning_steps.iter().enumerate() {
            let mut method = step.method.create(self.config.seed);
            let outcome = match self.configure(method.as_mut(), step, &blocks, inputs).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    log_error(WorkflowStage::BlockCleaning, &method.name(), &err);
                    return Err(err);
                }
            };
            if let Some(outcome) = outcome {
                optimizations.push(StepOptimization {
                    method_name: method.name(),
                    configuration: method.describe_configuration(),
                    outcome,
                });
            }

            log_progress(
                WorkflowStage::BlockCleaning,
                &format!("Step {} of {}", position + 1, self.config.cleaning_steps.len()),
                &format!("{} with {}", method.name(), method.describe_configuration()),
            );
            blocks = run_block_processing(ground_truth, true, &blocks, method.as_ref(), sink).blocks;
        }

        Ok((blocks, optimizations))
    }

    fn build_blocks(
        &self,
        inputs: &WorkflowInputs,
        ground_truth: Option<&dyn GroundTruth>,
        sink: &dyn ReportSink,
    ) -> WorkflowResult<Vec<Block>> {
        let method = self.config.block_building.create();

        let started = Instant::now();
        let blocks = run_block_building(
            self.config.mode,
            inputs.clusters.as_deref(),
            &inputs.source,
            inputs.target.as_deref(),
            method.as_ref(),
        )?;
        let elapsed_secs = started.elapsed().as_secs_f64();

        stage_info!(
            WorkflowStage::BlockBuilding,
            "{} built {} blocks in {:.3}s",
            method.name(),
            blocks.len(),
            elapsed_secs
        );

        if ground_truth.is_some() {
            let report = StepReport {
                method_name: method.name(),
                configuration: "default".to_string(),
                elapsed_secs,
                snapshot: evaluate_blocks(&blocks, ground_truth)?,
            };
            if let Err(err) = sink.report(&report) {
                stage_warn!(WorkflowStage::BlockBuilding, "Failed to report {}: {}", report.method_name, err);
            }
        }
        Ok(blocks)
    }

    /// Apply the step's configuration; automatic steps return their search outcome
    async fn configure(
        &self,
        method: &mut dyn BlockRefinementMethod,
        step: &CleaningStep,
        blocks: &[Block],
        inputs: &WorkflowInputs,
    ) -> WorkflowResult<Option<OptimizationOutcome>> {
        match step.configuration {
            StepConfiguration::Default => Ok(None),
            StepConfiguration::Manual { grid_index } => {
                method.set_grid_configuration(grid_index)?;
                Ok(None)
            }
            StepConfiguration::Automatic { search } => {
                let optimizer = ConfigurationOptimizer::new(search).with_stop_signal(self.stop.clone());
                let outcome = match self.config.parallel_workers {
                    Some(workers) => {
                        let ground_truth = inputs
                            .ground_truth
                            .clone()
                            .map(|truth| truth as Arc<dyn GroundTruth>);
                        optimizer
                            .optimize_parallel(method, Arc::new(blocks.to_vec()), ground_truth, workers)
                            .await?
                    }
                    None => {
                        let ground_truth = inputs.ground_truth.as_deref().map(|truth| truth as &dyn GroundTruth);
                        optimizer.optimize(method, blocks, ground_truth)?
                    }
                };
                Ok(Some(outcome))
            }
        }
    }
}
