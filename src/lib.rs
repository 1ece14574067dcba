pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
pub mod fs;
pub mod graph;
pub mod models;
pub mod prioritize;
pub mod validation;
pub mod verify;

pub use errors::{Result, WorkflowError};
