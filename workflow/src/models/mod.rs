//! Report and result models produced by the workflow

pub mod results;

pub use results::{StepReport, WorkflowResults};
