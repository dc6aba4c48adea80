//! Core types used throughout the entity resolution workflow

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::errors::SharedError;

/// Index of a profile inside its own collection
pub type EntityId = usize;

/// Cluster id reserved for attributes that no schema cluster claims
pub const GLUE_CLUSTER: usize = 0;

/// A single attribute name/value pair of a profile
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An identified record of attribute/value pairs, immutable once read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityProfile {
    pub entity_url: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl EntityProfile {
    pub fn new(entity_url: impl Into<String>) -> Self {
        Self {
            entity_url: entity_url.into(),
            attributes: Vec::new(),
        }
    }

    /// Builder-style helper used by readers and tests
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }
}

/// Schema clusters for one profile collection: attribute name -> cluster id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeClusters {
    pub clusters: HashMap<String, usize>,
}

impl AttributeClusters {
    pub fn new(clusters: HashMap<String, usize>) -> Self {
        Self { clusters }
    }

    /// Cluster of an attribute; unclustered attributes land in the glue cluster
    pub fn cluster_of(&self, attribute: &str) -> usize {
        self.clusters.get(attribute).copied().unwrap_or(GLUE_CLUSTER)
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters
            .values()
            .copied()
            .chain(std::iter::once(GLUE_CLUSTER))
            .max()
            .map_or(1, |max| max + 1)
    }
}

/// A candidate-match group of profile indices
///
/// Unilateral blocks index a single collection (dirty ER). Bilateral blocks
/// hold indices into the source and target collections separately
/// (clean-clean ER), so only cross-collection pairs are compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Unilateral { entities: Vec<EntityId> },
    Bilateral { source: Vec<EntityId>, target: Vec<EntityId> },
}

impl Block {
    pub fn unilateral(entities: Vec<EntityId>) -> Self {
        Block::Unilateral { entities }
    }

    pub fn bilateral(source: Vec<EntityId>, target: Vec<EntityId>) -> Self {
        Block::Bilateral { source, target }
    }

    /// Number of pairwise comparisons this block implies
    pub fn comparisons(&self) -> f64 {
        match self {
            Block::Unilateral { entities } => {
                let n = entities.len() as f64;
                n * (n - 1.0).max(0.0) / 2.0
            }
            Block::Bilateral { source, target } => source.len() as f64 * target.len() as f64,
        }
    }

    /// Total number of profile references held by the block
    pub fn size(&self) -> usize {
        match self {
            Block::Unilateral { entities } => entities.len(),
            Block::Bilateral { source, target } => source.len() + target.len(),
        }
    }

    pub fn is_bilateral(&self) -> bool {
        matches!(self, Block::Bilateral { .. })
    }
}

/// A known matching pair from the ground truth
///
/// For dirty ER both ids index the single collection; for clean-clean ER
/// `source` indexes the first collection and `target` the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdDuplicates {
    pub source: EntityId,
    pub target: EntityId,
}

impl IdDuplicates {
    pub fn new(source: EntityId, target: EntityId) -> Self {
        Self { source, target }
    }

    /// Order-independent form used for pairs within one collection
    pub fn normalized(self) -> Self {
        if self.source <= self.target {
            self
        } else {
            Self {
                source: self.target,
                target: self.source,
            }
        }
    }
}

/// Entity resolution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErMode {
    /// Resolution inside one collection
    Dirty,
    /// Resolution across two internally duplicate-free collections
    CleanClean,
}

impl ErMode {
    pub const DIRTY_LABEL: &'static str = "Dirty Entity Resolution";
    pub const CLEAN_CLEAN_LABEL: &'static str = "Clean-Clean Entity Resolution";

    pub fn label(&self) -> &'static str {
        match self {
            ErMode::Dirty => Self::DIRTY_LABEL,
            ErMode::CleanClean => Self::CLEAN_CLEAN_LABEL,
        }
    }
}

impl fmt::Display for ErMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ErMode {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            Self::DIRTY_LABEL => Ok(ErMode::Dirty),
            Self::CLEAN_CLEAN_LABEL => Ok(ErMode::CleanClean),
            other => match other.to_lowercase().as_str() {
                "dirty" => Ok(ErMode::Dirty),
                "clean-clean" | "clean_clean" | "cleanclean" => Ok(ErMode::CleanClean),
                _ => Err(SharedError::InvalidMode {
                    mode: s.to_string(),
                }),
            },
        }
    }
}

/// Step of a blocking-based workflow, used to tag log events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowStage {
    SchemaClustering,
    BlockBuilding,
    BlockCleaning,
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStage::SchemaClustering => write!(f, "schema_clustering"),
            WorkflowStage::BlockBuilding => write!(f, "block_building"),
            WorkflowStage::BlockCleaning => write!(f, "block_cleaning"),
        }
    }
}

impl std::str::FromStr for WorkflowStage {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "schema_clustering" => Ok(WorkflowStage::SchemaClustering),
            "block_building" => Ok(WorkflowStage::BlockBuilding),
            "block_cleaning" => Ok(WorkflowStage::BlockCleaning),
            _ => Err(SharedError::UnknownStage {
                stage: s.to_string(),
            }),
        }
    }
}

/// How a workflow step obtains its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationType {
    /// Method's built-in defaults
    #[default]
    Default,
    /// A user-chosen grid configuration index
    Manual,
    /// Tuned by the configuration optimizer
    Automatic,
}

impl std::str::FromStr for ConfigurationType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(ConfigurationType::Default),
            "manual" => Ok(ConfigurationType::Manual),
            "automatic" | "auto" => Ok(ConfigurationType::Automatic),
            _ => Err(SharedError::InvalidConfig {
                field: "configuration".to_string(),
                value: s.to_string(),
            }),
        }
    }
}
