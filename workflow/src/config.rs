//! Command line arguments and the validated workflow configuration

use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use shared::{ConfigurationType, ErMode, SharedError};

use crate::error::{WorkflowError, WorkflowResult};
use crate::methods::{BlockBuildingMethodId, BlockCleaningMethodId};
use crate::optimization::{SearchMode, DEFAULT_RANDOM_TRIALS};

/// Blocking-based entity resolution workflow
#[derive(Parser, Debug, Clone)]
#[command(name = "workflow")]
#[command(about = "Builds and cleans blocks for entity resolution, optionally tuning every cleaning step")]
pub struct Args {
    /// Resolution mode: "dirty" or "clean-clean"
    #[arg(long, default_value = "dirty")]
    pub mode: String,

    /// JSON file with the (first) profile collection
    #[arg(long)]
    pub source: PathBuf,

    /// JSON file with the second profile collection (clean-clean only)
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// JSON file with known duplicate pairs
    #[arg(long)]
    pub ground_truth: Option<PathBuf>,

    /// JSON file with attribute clusters
    #[arg(long)]
    pub clusters: Option<PathBuf>,

    /// Block building method
    #[arg(long, default_value = "Standard/Token Blocking")]
    pub block_building: String,

    /// Block cleaning method, applied in the given order (repeatable)
    #[arg(long)]
    pub block_cleaning: Vec<String>,

    /// Configuration of the cleaning steps: default, manual or automatic
    #[arg(long, default_value = "default")]
    pub configuration: String,

    /// Search used by automatic configuration: grid or random
    #[arg(long, default_value = "grid")]
    pub search: String,

    /// Trial budget of random search
    #[arg(long, default_value_t = DEFAULT_RANDOM_TRIALS)]
    pub trials: usize,

    /// Seed of the random configuration draws
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Grid configuration used by manual configuration
    #[arg(long)]
    pub grid_index: Option<usize>,

    /// Worker count for parallel optimization trials
    #[arg(long)]
    pub parallel: Option<usize>,

    /// Where to write the results summary as JSON
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Parameter source of one cleaning step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepConfiguration {
    Default,
    Manual { grid_index: usize },
    Automatic { search: SearchMode },
}

impl StepConfiguration {
    pub fn kind(&self) -> ConfigurationType {
        match self {
            StepConfiguration::Default => ConfigurationType::Default,
            StepConfiguration::Manual { .. } => ConfigurationType::Manual,
            StepConfiguration::Automatic { .. } => ConfigurationType::Automatic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningStep {
    pub method: BlockCleaningMethodId,
    pub configuration: StepConfiguration,
}

/// Input locations of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPaths {
    pub source: PathBuf,
    pub target: Option<PathBuf>,
    pub ground_truth: Option<PathBuf>,
    pub clusters: Option<PathBuf>,
}

/// Validated configuration of one workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub mode: ErMode,
    pub inputs: InputPaths,
    pub block_building: BlockBuildingMethodId,
    pub cleaning_steps: Vec<CleaningStep>,
    pub seed: u64,
    /// Parallel optimization workers; sequential when absent
    pub parallel_workers: Option<usize>,
    pub output: Option<PathBuf>,
}

impl WorkflowConfig {
    pub fn requires_ground_truth(&self) -> bool {
        self.cleaning_steps
            .iter()
            .any(|step| step.configuration.kind() == ConfigurationType::Automatic)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> WorkflowResult<()> {
        if self.mode == ErMode::CleanClean && self.inputs.target.is_none() {
            return Err(WorkflowError::MissingTargetProfiles);
        }
        if self.requires_ground_truth() && self.inputs.ground_truth.is_none() {
            return Err(WorkflowError::missing_ground_truth("automatic configuration"));
        }
        if self.parallel_workers == Some(0) {
            return Err(WorkflowError::invalid_input("--parallel needs at least one worker"));
        }
        Ok(())
    }
}

fn parse_search(search: &str, trials: usize) -> WorkflowResult<SearchMode> {
    match search.to_lowercase().as_str() {
        "grid" => Ok(SearchMode::Grid),
        "random" => Ok(SearchMode::Random { trials }),
        _ => Err(SharedError::InvalidConfig {
            field: "search".to_string(),
            value: search.to_string(),
        }
        .into()),
    }
}

impl TryFrom<Args> for WorkflowConfig {
    type Error = WorkflowError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let mode: ErMode = args.mode.parse().map_err(|err| match err {
            SharedError::InvalidMode { mode } => WorkflowError::InvalidMode { mode },
            other => WorkflowError::SharedError(other),
        })?;

        let configuration = match args.configuration.parse::<ConfigurationType>()? {
            ConfigurationType::Default => StepConfiguration::Default,
            ConfigurationType::Manual => StepConfiguration::Manual {
                grid_index: args
                    .grid_index
                    .ok_or_else(|| WorkflowError::invalid_input("manual configuration needs --grid-index"))?,
            },
            ConfigurationType::Automatic => StepConfiguration::Automatic {
                search: parse_search(&args.search, args.trials)?,
            },
        };

        let cleaning_steps = args
            .block_cleaning
            .iter()
            .map(|name| -> WorkflowResult<CleaningStep> {
                Ok(CleaningStep {
                    method: name.parse()?,
                    configuration,
                })
            })
            .collect::<WorkflowResult<Vec<_>>>()?;

        let config = WorkflowConfig {
            mode,
            inputs: InputPaths {
                source: args.source,
                target: args.target,
                ground_truth: args.ground_truth,
                clusters: args.clusters,
            },
            block_building: args.block_building.parse()?,
            cleaning_steps,
            seed: args.seed,
            parallel_workers: args.parallel,
            output: args.output,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> WorkflowResult<WorkflowConfig> {
        let mut argv = vec!["workflow", "--source", "profiles.json"];
        argv.extend_from_slice(extra);
        WorkflowConfig::try_from(Args::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.mode, ErMode::Dirty);
        assert_eq!(config.block_building, BlockBuildingMethodId::StandardBlocking);
        assert!(config.cleaning_steps.is_empty());
        assert_eq!(config.parallel_workers, None);
    }

    #[test]
    fn test_automatic_random_steps() {
        let config = parse(&[
            "--ground-truth",
            "truth.json",
            "--block-cleaning",
            "size",
            "--block-cleaning",
            "Block Filtering",
            "--configuration",
            "automatic",
            "--search",
            "random",
            "--trials",
            "25",
        ])
        .unwrap();

        let methods: Vec<_> = config.cleaning_steps.iter().map(|step| step.method).collect();
        assert_eq!(
            methods,
            vec![BlockCleaningMethodId::SizeBasedBlockPurging, BlockCleaningMethodId::BlockFiltering]
        );
        assert!(config
            .cleaning_steps
            .iter()
            .all(|step| step.configuration == StepConfiguration::Automatic {
                search: SearchMode::Random { trials: 25 }
            }));
    }

    #[test]
    fn test_automatic_without_ground_truth_is_rejected() {
        let err = parse(&["--block-cleaning", "filtering", "--configuration", "automatic"]).unwrap_err();
        assert!(matches!(err, WorkflowError::MissingGroundTruth { .. }));
    }

    #[test]
    fn test_manual_needs_grid_index() {
        let err = parse(&["--block-cleaning", "filtering", "--configuration", "manual"]).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidInput { .. }));

        let config = parse(&["--block-cleaning", "filtering", "--configuration", "manual", "--grid-index", "4"]).unwrap();
        assert_eq!(config.cleaning_steps[0].configuration, StepConfiguration::Manual { grid_index: 4 });
    }

    #[test]
    fn test_invalid_mode_and_methods() {
        assert!(matches!(parse(&["--mode", "fuzzy"]), Err(WorkflowError::InvalidMode { .. })));
        assert!(matches!(parse(&["--mode", "clean-clean"]), Err(WorkflowError::MissingTargetProfiles)));
        assert!(matches!(
            parse(&["--block-building", "Sorted Neighborhood"]),
            Err(WorkflowError::UnknownMethod { .. })
        ));
        assert!(matches!(
            parse(&["--search", "annealing", "--configuration", "automatic"]),
            Err(WorkflowError::SharedError(SharedError::InvalidConfig { .. }))
        ));
    }
}
