//! Data models: the extracted record and configuration.

pub mod config;
pub mod meta;
