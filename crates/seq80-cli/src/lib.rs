//! seq80 CLI library.
//!
//! Command implementations, sequence file loading, atomic output and the
//! on-disk project store. The `seq80` binary only parses arguments and
//! dispatches here.

pub mod commands;
pub mod input;
pub mod output;
pub mod project_store;
pub mod reporting;
