//! CLI command implementations

pub mod utils;

pub mod colors;
pub mod completions;
pub mod config;
pub mod export;
pub mod import;
pub mod matrix;
pub mod report;
