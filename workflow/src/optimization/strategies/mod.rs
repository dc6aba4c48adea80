//! Concrete search strategy implementations

pub mod grid;
pub mod random;

pub use grid::GridSearch;
pub use random::RandomSearch;
