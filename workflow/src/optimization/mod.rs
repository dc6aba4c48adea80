//! Automatic configuration of block refinement methods
//!
//! Traits describe how a search walks a method's configuration space,
//! types hold the search inputs and diagnostics, and the optimizer scores
//! every trial and leaves the method configured with the winner.

pub mod optimizer;
pub mod strategies;
pub mod traits;
pub mod types;

pub use optimizer::ConfigurationOptimizer;
pub use traits::SearchStrategy;
pub use types::*;
