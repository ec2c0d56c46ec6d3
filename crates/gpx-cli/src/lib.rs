//! CLI library components for the GPX reader.

pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
