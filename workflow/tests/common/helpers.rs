//! Test helpers to reduce boilerplate across suites

use std::path::{Path, PathBuf};

use serde::Serialize;
use shared::Block;
use workflow::{Args, WorkflowConfig};

pub struct TestHelpers;

impl TestHelpers {
    /// Write `value` as JSON into `dir/name`
    pub fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    /// Parse command line style arguments into a validated configuration
    pub fn config(argv: &[&str]) -> WorkflowConfig {
        let mut full = vec!["workflow"];
        full.extend_from_slice(argv);
        WorkflowConfig::try_from(<Args as clap::Parser>::try_parse_from(full).unwrap()).unwrap()
    }

    pub fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    /// Source-side ids referenced by a block collection, sorted and unique
    pub fn entity_ids(blocks: &[Block]) -> Vec<usize> {
        let mut ids: Vec<usize> = blocks
            .iter()
            .flat_map(|block| match block {
                Block::Unilateral { entities } => entities.clone(),
                Block::Bilateral { source, .. } => source.clone(),
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
