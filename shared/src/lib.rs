//! Shared types for the blocking-based entity resolution workflow
//!
//! Contains the data model every workflow component agrees on (profiles,
//! schema clusters, blocks, duplicate pairs, resolution modes) together with
//! the common error type and tracing setup.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
