//! Infrastructure adapters for configuration, key handling, logging, and output.

pub mod config;
pub mod keys;
pub mod labels;
pub mod logging;
pub mod output;
