//! Shared building blocks for every crate in the workspace: the response envelope and logging setup.

pub mod types;
pub mod utils;
