//! Data models: evidence, results and configuration.

pub mod config;
pub mod document;
pub mod statement;
