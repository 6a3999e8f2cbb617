//! CLI command implementations.

pub mod backend;
pub mod backends;
pub mod common;
pub mod job;
pub mod jobs;
pub mod select;
pub mod version;
