//! Tunable numeric parameter shared by the block cleaning methods
//!
//! A parameter exposes a dense grid of values and a seeded random space.
//! The random value of draw `j` depends only on the seed and `j`, so a draw
//! can be replayed on any instance. Replaying draw `j` also moves the walk,
//! so the next sequential draw is `j + 1`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{WorkflowError, WorkflowResult};

/// Inclusive range walked by grid search in fixed steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParameterRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn grid_count(&self) -> usize {
        ((self.max - self.min) / self.step).round() as usize + 1
    }

    pub fn grid_value(&self, index: usize) -> Option<f64> {
        (index < self.grid_count()).then(|| self.min + index as f64 * self.step)
    }

    pub fn random_value(&self, seed: u64, draw: usize) -> f64 {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(draw as u64));
        rng.gen_range(self.min..=self.max)
    }
}

/// The single parameter of a block cleaning method and its search state
#[derive(Debug, Clone, PartialEq)]
pub struct TunableParameter {
    name: &'static str,
    range: ParameterRange,
    value: f64,
    seed: u64,
    next_draw: usize,
}

impl TunableParameter {
    pub fn new(name: &'static str, range: ParameterRange, default: f64, seed: u64) -> Self {
        Self {
            name,
            range,
            value: default,
            seed,
            next_draw: 0,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn grid_count(&self) -> usize {
        self.range.grid_count()
    }

    pub fn set_grid(&mut self, method: &str, index: usize) -> WorkflowResult<()> {
        self.value = self
            .range
            .grid_value(index)
            .ok_or_else(|| WorkflowError::ConfigurationOutOfRange {
                method: method.to_string(),
                index,
                count: self.range.grid_count(),
            })?;
        Ok(())
    }

    pub fn set_next_random(&mut self) {
        self.value = self.range.random_value(self.seed, self.next_draw);
        self.next_draw += 1;
    }

    pub fn set_random(&mut self, draw: usize) {
        self.value = self.range.random_value(self.seed, draw);
        self.next_draw = draw + 1;
    }

    pub fn describe(&self) -> String {
        format!("{}={:.4}", self.name, self.value)
    }
}
