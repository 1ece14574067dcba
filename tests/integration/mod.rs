//! Integration tests for the work-unit workflow
//!
//! These drive the public API through `Workspace` transactions against a
//! real document on disk, the way the command layer does.

pub mod concurrency;
pub mod dependencies;
pub mod feature_files;
pub mod helpers;
pub mod project_root;
pub mod workflow;
