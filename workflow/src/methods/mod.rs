//! Concrete block building and block cleaning methods
//!
//! Methods are selected through closed identifiers; each identifier maps to
//! exactly one constructor.

pub mod block_filtering;
pub mod block_purging;
pub mod parameters;
pub mod token_blocking;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::traits::{BlockBuildingMethod, BlockRefinementMethod};

pub use block_filtering::BlockFiltering;
pub use block_purging::{ComparisonBasedBlockPurging, SizeBasedBlockPurging};
pub use parameters::{ParameterRange, TunableParameter};
pub use token_blocking::{BlockingKeys, QGramsBlocking, StandardBlocking};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockBuildingMethodId {
    StandardBlocking,
    QGramsBlocking,
}

impl BlockBuildingMethodId {
    pub const ALL: [BlockBuildingMethodId; 2] = [Self::StandardBlocking, Self::QGramsBlocking];

    pub fn label(&self) -> &'static str {
        match self {
            Self::StandardBlocking => "Standard/Token Blocking",
            Self::QGramsBlocking => "Q-Grams Blocking",
        }
    }

    pub fn create(&self) -> Box<dyn BlockBuildingMethod> {
        match self {
            Self::StandardBlocking => Box::new(StandardBlocking),
            Self::QGramsBlocking => Box::new(QGramsBlocking::default()),
        }
    }
}

impl fmt::Display for BlockBuildingMethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BlockBuildingMethodId {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard/token blocking" | "standard blocking" | "token blocking" | "standard" | "token" => {
                Ok(Self::StandardBlocking)
            }
            "q-grams blocking" | "qgrams blocking" | "q-grams" | "qgrams" => Ok(Self::QGramsBlocking),
            _ => Err(WorkflowError::UnknownMethod { name: s.to_string() }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockCleaningMethodId {
    SizeBasedBlockPurging,
    ComparisonBasedBlockPurging,
    BlockFiltering,
}

impl BlockCleaningMethodId {
    pub const ALL: [BlockCleaningMethodId; 3] = [
        Self::SizeBasedBlockPurging,
        Self::ComparisonBasedBlockPurging,
        Self::BlockFiltering,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::SizeBasedBlockPurging => SizeBasedBlockPurging::NAME,
            Self::ComparisonBasedBlockPurging => ComparisonBasedBlockPurging::NAME,
            Self::BlockFiltering => BlockFiltering::NAME,
        }
    }

    /// Fresh method in its default configuration, random draws seeded by `seed`
    pub fn create(&self, seed: u64) -> Box<dyn BlockRefinementMethod> {
        match self {
            Self::SizeBasedBlockPurging => Box::new(SizeBasedBlockPurging::new(seed)),
            Self::ComparisonBasedBlockPurging => Box::new(ComparisonBasedBlockPurging::new(seed)),
            Self::BlockFiltering => Box::new(BlockFiltering::new(seed)),
        }
    }
}

impl fmt::Display for BlockCleaningMethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BlockCleaningMethodId {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "size-based block purging" | "size-purging" | "size" => Ok(Self::SizeBasedBlockPurging),
            "comparison-based block purging" | "comparison-purging" | "comparison" => {
                Ok(Self::ComparisonBasedBlockPurging)
            }
            "block filtering" | "filtering" => Ok(Self::BlockFiltering),
            _ => Err(WorkflowError::UnknownMethod { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for id in BlockBuildingMethodId::ALL {
            assert_eq!(id.label().parse::<BlockBuildingMethodId>().unwrap(), id);
            assert_eq!(id.create().name(), id.label());
        }
        for id in BlockCleaningMethodId::ALL {
            assert_eq!(id.to_string().parse::<BlockCleaningMethodId>().unwrap(), id);
            assert_eq!(id.create(0).name(), id.label());
        }
    }

    #[test]
    fn test_short_names() {
        assert_eq!("token".parse::<BlockBuildingMethodId>().unwrap(), BlockBuildingMethodId::StandardBlocking);
        assert_eq!("qgrams".parse::<BlockBuildingMethodId>().unwrap(), BlockBuildingMethodId::QGramsBlocking);
        assert_eq!("filtering".parse::<BlockCleaningMethodId>().unwrap(), BlockCleaningMethodId::BlockFiltering);
    }

    #[test]
    fn test_unknown_method() {
        let err = "Sorted Neighborhood".parse::<BlockBuildingMethodId>().unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownMethod { name } if name == "Sorted Neighborhood"));
        assert!("meta-blocking".parse::<BlockCleaningMethodId>().is_err());
    }
}
