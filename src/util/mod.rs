//! Shared utilities

pub mod config;
pub mod logging;
pub mod process;

pub use config::ToolchainConfig;
pub use process::{ProcessBuilder, ProcessRunner, SystemRunner};
