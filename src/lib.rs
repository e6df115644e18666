//! Coach signup: registration wizard core.

pub mod cli;
pub mod config;
pub mod error;
pub mod sinks;
pub mod wizard;
