//! JSON input loading and results output
//!
//! Profiles are a JSON array of `{ "entity_url", "attributes": [{ "name", "value" }] }`.
//! Ground truth is a JSON array of `{ "source", "target" }` index pairs.
//! Attribute clusters are either one `{ attribute: cluster }` object shared by
//! both collections or an array with one such object per collection.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::fs;

use shared::logging::log_progress;
use shared::{AttributeClusters, EntityProfile, ErMode, IdDuplicates, WorkflowStage};

use crate::core::DuplicatePropagation;
use crate::error::{WorkflowError, WorkflowResult};
use crate::models::WorkflowResults;

async fn read_json<T: DeserializeOwned>(path: &Path) -> WorkflowResult<T> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

pub async fn load_profiles(path: &Path) -> WorkflowResult<Vec<EntityProfile>> {
    let profiles: Vec<EntityProfile> = read_json(path).await?;
    log_progress(
        WorkflowStage::BlockBuilding,
        "Loaded profiles",
        &format!("{} from {}", profiles.len(), path.display()),
    );
    Ok(profiles)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClusterFile {
    PerCollection(Vec<HashMap<String, usize>>),
    Shared(HashMap<String, usize>),
}

pub async fn load_clusters(path: &Path) -> WorkflowResult<Vec<AttributeClusters>> {
    let clusters = match read_json::<ClusterFile>(path).await? {
        ClusterFile::PerCollection(sets) => sets.into_iter().map(AttributeClusters::new).collect(),
        ClusterFile::Shared(set) => vec![AttributeClusters::new(set)],
    };
    log_progress(
        WorkflowStage::SchemaClustering,
        "Loaded attribute clusters",
        &clusters
            .iter()
            .map(|set| format!("{} clusters", set.cluster_count()))
            .collect::<Vec<_>>()
            .join(", "),
    );
    Ok(clusters)
}

/// Load duplicate pairs and check them against the collection sizes
pub async fn load_ground_truth(
    path: &Path,
    mode: ErMode,
    source_size: usize,
    target_size: Option<usize>,
) -> WorkflowResult<DuplicatePropagation> {
    let pairs: Vec<IdDuplicates> = read_json(path).await?;
    let target_size = match mode {
        ErMode::Dirty => source_size,
        ErMode::CleanClean => target_size.ok_or(WorkflowError::MissingTargetProfiles)?,
    };

    if let Some(pair) = pairs
        .iter()
        .find(|pair| pair.source >= source_size || pair.target >= target_size)
    {
        return Err(WorkflowError::invalid_input(format!(
            "duplicate pair ({}, {}) references a missing profile",
            pair.source, pair.target
        )));
    }

    let ground_truth = DuplicatePropagation::new(mode, pairs);
    log_progress(
        WorkflowStage::BlockBuilding,
        "Loaded ground truth",
        &format!("{} duplicate pairs", ground_truth.duplicates().len()),
    );
    Ok(ground_truth)
}

/// Write the run summary as pretty JSON, creating parent directories
pub async fn write_results(path: &Path, results: &WorkflowResults) -> WorkflowResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string_pretty(results)?;
    fs::write(path, content).await?;
    Ok(())
}
