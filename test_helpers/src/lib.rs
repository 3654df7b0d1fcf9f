//! Test helpers shared across the workspace.
//!
//! Currently limited to guarded environment-variable mutation.

pub mod env;
