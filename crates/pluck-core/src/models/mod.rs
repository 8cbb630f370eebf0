//! Data models: the reconstructed document and pipeline configuration.

pub mod config;
pub mod document;
