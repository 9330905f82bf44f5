//! Library components of the ODS organisation finder.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod prompt;
