//! Main entry point for the workflow binary

use anyhow::Context;
use clap::Parser;
use tokio::signal;

use shared::logging;
use shared::{stage_debug, stage_warn, WorkflowStage};
use workflow::{services, Args, WorkflowConfig, WorkflowInputs, WorkflowRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));

    let config = WorkflowConfig::try_from(args).context("Invalid workflow arguments")?;
    logging::log_startup(&format!("workflow ({})", config.mode));
    stage_debug!(
        WorkflowStage::BlockBuilding,
        "Building with {}, {} cleaning steps, seed {}",
        config.block_building,
        config.cleaning_steps.len(),
        config.seed
    );

    let inputs = WorkflowInputs::load(&config)
        .await
        .with_context(|| format!("Failed to load inputs from {}", config.inputs.source.display()))?;

    let runner = WorkflowRunner::new(config.clone());
    let stop = runner.stop_signal();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            stage_warn!(
                WorkflowStage::BlockCleaning,
                "Interrupted, configuration search stops at its next trial"
            );
            stop.stop();
        }
    });

    let run = runner.run(inputs).await.context("Workflow run failed")?;

    for optimization in &run.optimizations {
        println!(
            "{}: best configuration {} (score {:.6}, {} trials)",
            optimization.method_name,
            optimization.configuration,
            optimization.outcome.best_score,
            optimization.outcome.trials_run
        );
    }
    println!("{}", serde_json::to_string_pretty(&run.results)?);

    if let Some(path) = &config.output {
        services::write_results(path, &run.results)
            .await
            .with_context(|| format!("Failed to write results to {}", path.display()))?;
        logging::log_success(&format!("Results written to {}", path.display()));
    }

    Ok(())
}
