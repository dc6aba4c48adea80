//! Test fixtures: small profile collections with known duplicates

use shared::{AttributeClusters, Block, EntityProfile, ErMode, IdDuplicates};
use std::collections::HashMap;
use workflow::DuplicatePropagation;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const SEED: u64 = 42;
    pub const RANDOM_TRIALS: usize = 16;

    /// One collection of books; 0/1, 2/3 and 4/5 describe the same work
    pub fn dirty_profiles() -> Vec<EntityProfile> {
        vec![
            EntityProfile::new("urn:book:0")
                .with_attribute("title", "Anna Karenina")
                .with_attribute("author", "Leo Tolstoy"),
            EntityProfile::new("urn:book:1")
                .with_attribute("name", "anna karenina (novel)")
                .with_attribute("writer", "L. Tolstoy"),
            EntityProfile::new("urn:book:2")
                .with_attribute("title", "War and Peace")
                .with_attribute("author", "Leo Tolstoy"),
            EntityProfile::new("urn:book:3")
                .with_attribute("name", "War & Peace")
                .with_attribute("writer", "Tolstoy"),
            EntityProfile::new("urn:book:4")
                .with_attribute("title", "The Brothers Karamazov")
                .with_attribute("author", "Fyodor Dostoevsky"),
            EntityProfile::new("urn:book:5")
                .with_attribute("name", "Brothers Karamazov")
                .with_attribute("writer", "Dostoevsky"),
            EntityProfile::new("urn:book:6")
                .with_attribute("title", "The Idiot")
                .with_attribute("author", "Fyodor Dostoevsky"),
        ]
    }

    pub fn dirty_duplicates() -> Vec<IdDuplicates> {
        vec![IdDuplicates::new(0, 1), IdDuplicates::new(3, 2), IdDuplicates::new(4, 5)]
    }

    pub fn dirty_ground_truth() -> DuplicatePropagation {
        DuplicatePropagation::new(ErMode::Dirty, Self::dirty_duplicates())
    }

    /// Store catalogue, first collection
    pub fn catalogue_a() -> Vec<EntityProfile> {
        vec![
            EntityProfile::new("a:0").with_attribute("title", "Kind of Blue").with_attribute("artist", "Miles Davis"),
            EntityProfile::new("a:1").with_attribute("title", "Blue Train").with_attribute("artist", "John Coltrane"),
            EntityProfile::new("a:2").with_attribute("title", "A Love Supreme").with_attribute("artist", "John Coltrane"),
        ]
    }

    /// Store catalogue, second collection; ids 1, 0, 2 match `catalogue_a` 0, 1, 2
    ///
    /// "Miles" is an album title here but an artist name in `catalogue_a`.
    pub fn catalogue_b() -> Vec<EntityProfile> {
        vec![
            EntityProfile::new("b:0").with_attribute("album", "Blue Train (Remastered)").with_attribute("by", "Coltrane"),
            EntityProfile::new("b:1").with_attribute("album", "Kind Of Blue").with_attribute("by", "Davis, Miles"),
            EntityProfile::new("b:2").with_attribute("album", "Love Supreme").with_attribute("by", "J. Coltrane"),
            EntityProfile::new("b:3").with_attribute("album", "Miles Ahead").with_attribute("by", "Gil Evans"),
        ]
    }

    pub fn catalogue_duplicates() -> Vec<IdDuplicates> {
        vec![IdDuplicates::new(0, 1), IdDuplicates::new(1, 0), IdDuplicates::new(2, 2)]
    }

    /// Title-like and person-like attributes of both catalogues
    pub fn catalogue_clusters() -> Vec<AttributeClusters> {
        let source: HashMap<String, usize> =
            [("title".to_string(), 1), ("artist".to_string(), 2)].into_iter().collect();
        let target: HashMap<String, usize> =
            [("album".to_string(), 1), ("by".to_string(), 2)].into_iter().collect();
        vec![AttributeClusters::new(source), AttributeClusters::new(target)]
    }

    /// Blocks of growing size over a hundred profiles
    pub fn skewed_blocks() -> Vec<Block> {
        let mut blocks: Vec<Block> = (0..40).map(|i| Block::unilateral(vec![i, i + 1])).collect();
        blocks.extend((0..10).map(|i| Block::unilateral((i * 5..i * 5 + 5).collect())));
        blocks.push(Block::unilateral((0..60).collect()));
        blocks.push(Block::unilateral((0..100).collect()));
        blocks
    }

    /// Neighbouring pairs among the skewed blocks' profiles
    pub fn skewed_ground_truth() -> DuplicatePropagation {
        DuplicatePropagation::new(ErMode::Dirty, (0..50).step_by(2).map(|i| IdDuplicates::new(i, i + 1)))
    }
}
