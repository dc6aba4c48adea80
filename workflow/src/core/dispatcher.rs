//! Block building dispatch
//!
//! Picks the invocation shape of a block building method from the
//! resolution mode and the optional schema clusters.

use shared::{stage_debug, AttributeClusters, Block, EntityProfile, ErMode, SharedError, WorkflowStage};

use crate::error::{WorkflowError, WorkflowResult};
use crate::traits::BlockBuildingMethod;

/// Run a block building method and return its blocks
///
/// `clusters` holds the schema clustering output when one was computed.
/// `target` is required in clean-clean mode and ignored in dirty mode.
pub fn run_block_building(
    mode: ErMode,
    clusters: Option<&[AttributeClusters]>,
    source: &[EntityProfile],
    target: Option<&[EntityProfile]>,
    method: &dyn BlockBuildingMethod,
) -> WorkflowResult<Vec<Block>> {
    let blocks = match (mode, clusters) {
        (ErMode::Dirty, None) => method.build(source),
        (ErMode::Dirty, Some(clusters)) => method.build_with_clusters(source, clusters),
        (ErMode::CleanClean, None) => {
            let target = target.ok_or(WorkflowError::MissingTargetProfiles)?;
            method.build_clean_clean(source, target)
        }
        (ErMode::CleanClean, Some(clusters)) => {
            let target = target.ok_or(WorkflowError::MissingTargetProfiles)?;
            method.build_clean_clean_with_clusters(source, target, clusters)
        }
    };

    stage_debug!(
        WorkflowStage::BlockBuilding,
        "{} produced {} blocks ({}, schema clusters: {})",
        method.name(),
        blocks.len(),
        mode,
        clusters.is_some()
    );
    Ok(blocks)
}

/// Same as [`run_block_building`] for a mode given by its label
///
/// Any label other than the two known resolution modes is rejected.
pub fn run_block_building_for_label(
    mode: &str,
    clusters: Option<&[AttributeClusters]>,
    source: &[EntityProfile],
    target: Option<&[EntityProfile]>,
    method: &dyn BlockBuildingMethod,
) -> WorkflowResult<Vec<Block>> {
    let mode: ErMode = mode.parse().map_err(|err| match err {
        SharedError::InvalidMode { mode } => WorkflowError::InvalidMode { mode },
        other => WorkflowError::SharedError(other),
    })?;
    run_block_building(mode, clusters, source, target, method)
}
