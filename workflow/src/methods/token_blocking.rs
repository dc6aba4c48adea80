//! Schema-agnostic key-based block building
//!
//! Every attribute value is turned into blocking keys; profiles sharing a key
//! end up in the same block. With schema clusters a key is only shared by
//! values of attributes in the same cluster.

use std::collections::BTreeMap;

use shared::{AttributeClusters, Block, EntityId, EntityProfile};

use crate::traits::BlockBuildingMethod;

const CLUSTER_SEPARATOR: &str = "#";

/// Key extraction of a key-based blocking method
pub trait BlockingKeys: Send + Sync {
    fn method_name(&self) -> &'static str;

    /// Blocking keys of one attribute value
    fn keys(&self, value: &str) -> Vec<String>;
}

/// Lowercased alphanumeric tokens of a value
fn tokenize(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// Standard (token) blocking: one block per distinct token
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardBlocking;

impl BlockingKeys for StandardBlocking {
    fn method_name(&self) -> &'static str {
        "Standard/Token Blocking"
    }

    fn keys(&self, value: &str) -> Vec<String> {
        tokenize(value).collect()
    }
}

/// Q-grams blocking: one block per character q-gram of every token
#[derive(Debug, Clone, Copy)]
pub struct QGramsBlocking {
    q: usize,
}

impl QGramsBlocking {
    pub const DEFAULT_Q: usize = 6;

    pub fn new(q: usize) -> Self {
        Self { q: q.max(1) }
    }
}

impl Default for QGramsBlocking {
    fn default() -> Self {
        Self::new(Self::DEFAULT_Q)
    }
}

impl BlockingKeys for QGramsBlocking {
    fn method_name(&self) -> &'static str {
        "Q-Grams Blocking"
    }

    fn keys(&self, value: &str) -> Vec<String> {
        let mut keys = Vec::new();
        for token in tokenize(value) {
            let chars: Vec<char> = token.chars().collect();
            if chars.len() <= self.q {
                keys.push(token);
            } else {
                keys.extend(chars.windows(self.q).map(|gram| gram.iter().collect::<String>()));
            }
        }
        keys
    }
}

/// Key -> ids of the profiles carrying it, ids ascending and unique
fn index_profiles<K: BlockingKeys + ?Sized>(
    method: &K,
    profiles: &[EntityProfile],
    clusters: Option<&AttributeClusters>,
) -> BTreeMap<String, Vec<EntityId>> {
    let mut index: BTreeMap<String, Vec<EntityId>> = BTreeMap::new();

    for (entity, profile) in profiles.iter().enumerate() {
        for attribute in &profile.attributes {
            let suffix = clusters.map(|clusters| {
                format!("{CLUSTER_SEPARATOR}{}", clusters.cluster_of(&attribute.name))
            });
            for key in method.keys(&attribute.value) {
                let key = match &suffix {
                    Some(suffix) => key + suffix,
                    None => key,
                };
                let ids = index.entry(key).or_default();
                if ids.last() != Some(&entity) {
                    ids.push(entity);
                }
            }
        }
    }
    index
}

fn dirty_blocks<K: BlockingKeys + ?Sized>(
    method: &K,
    profiles: &[EntityProfile],
    clusters: Option<&AttributeClusters>,
) -> Vec<Block> {
    index_profiles(method, profiles, clusters)
        .into_values()
        .filter(|ids| ids.len() > 1)
        .map(Block::unilateral)
        .collect()
}

fn clean_clean_blocks<K: BlockingKeys + ?Sized>(
    method: &K,
    source: &[EntityProfile],
    target: &[EntityProfile],
    clusters: Option<(&AttributeClusters, &AttributeClusters)>,
) -> Vec<Block> {
    let mut source_index = index_profiles(method, source, clusters.map(|(s, _)| s));
    let target_index = index_profiles(method, target, clusters.map(|(_, t)| t));

    target_index
        .into_iter()
        .filter_map(|(key, target_ids)| {
            source_index
                .remove(&key)
                .map(|source_ids| Block::bilateral(source_ids, target_ids))
        })
        .collect()
}

impl<K: BlockingKeys> BlockBuildingMethod for K {
    fn name(&self) -> String {
        self.method_name().to_string()
    }

    fn build(&self, profiles: &[EntityProfile]) -> Vec<Block> {
        dirty_blocks(self, profiles, None)
    }

    fn build_with_clusters(&self, profiles: &[EntityProfile], clusters: &[AttributeClusters]) -> Vec<Block> {
        dirty_blocks(self, profiles, clusters.first())
    }

    fn build_clean_clean(&self, source: &[EntityProfile], target: &[EntityProfile]) -> Vec<Block> {
        clean_clean_blocks(self, source, target, None)
    }

    fn build_clean_clean_with_clusters(
        &self,
        source: &[EntityProfile],
        target: &[EntityProfile],
        clusters: &[AttributeClusters],
    ) -> Vec<Block> {
        // A single cluster set describes both collections.
        let pair = match clusters {
            [] => None,
            [shared_clusters] => Some((shared_clusters, shared_clusters)),
            [source_clusters, target_clusters, ..] => Some((source_clusters, target_clusters)),
        };
        clean_clean_blocks(self, source, target, pair)
    }
}
