//! Quay - GnuCOBOL toolchain adapter for build systems
//!
//! This crate translates semantic build parameters into `cobc` command-line
//! arguments and verifies with a sanity probe that a configured compiler
//! can build (and, natively, run) programs before a build relies on it.

pub mod toolchain;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// Only compiled for tests. Provides a scripted process runner so sanity
/// probes can run without a COBOL compiler on the machine.
#[cfg(test)]
pub mod test_support;

pub use toolchain::{
    CobolCompiler, CommandSpec, CompileInput, CompileParameter, Compiler, MachineChoice,
    MachineInfo, OptimizationLevel, ProbeError, SanityProber, SanityResult, SanityState,
    ToolchainIdentity, WarningLevel,
};
pub use util::config::ToolchainConfig;
pub use util::process::{ProcessRunner, SystemRunner};
