//! Toolchain sanity probing.
//!
//! Before an orchestrator schedules real compilations it asks each configured
//! compiler to build a tiny known-good program and, when the toolchain is
//! native, to run it. A compiler that fails here is reported once and never
//! used for the rest of the configuration.
//!
//! ## Flow
//!
//! ```text
//! Unverified --probe--> Verified
//!            \--probe--> Failed
//! ```
//!
//! Cross toolchains stop after the compile step: their output cannot run on
//! this machine, so they are trusted once they compile.

use std::fmt;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::util::process::{ProcessBuilder, ProcessRunner};

use super::Compiler;

/// Why a toolchain failed its sanity probe.
#[derive(Debug, Error, Diagnostic)]
pub enum ProbeError {
    #[error("{language} compiler `{toolchain}` cannot compile programs")]
    #[diagnostic(
        code(quay::toolchain_unusable),
        help("check that the compiler is installed and can find its runtime and support files")
    )]
    ToolchainUnusable {
        language: String,
        toolchain: String,
        /// Exit code of the compile step; `None` if it never produced one
        exit_code: Option<i32>,
    },

    #[error("executables created by {language} compiler `{toolchain}` are not runnable")]
    #[diagnostic(
        code(quay::executable_unrunnable),
        help("if this toolchain targets another machine, configure it as a cross toolchain")
    )]
    ExecutableUnrunnable {
        language: String,
        toolchain: String,
        exit_code: Option<i32>,
    },

    #[error("failed to write sanity check source `{}`", path.display())]
    #[diagnostic(code(quay::sanity_source))]
    WriteSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A fixed program used to probe one toolchain.
#[derive(Debug, Clone, Copy)]
pub struct ProbeProgram {
    /// Source file name, relative to the working directory
    pub source_name: &'static str,
    /// Name of the produced binary, relative to the working directory
    pub output_name: &'static str,
    pub source: &'static str,
}

/// Run the compile-then-execute probe for `compiler` in `work_dir`.
///
/// `compile_args` receives the absolute output path and the source file
/// name and returns the arguments appended to the compiler's invocation
/// list. The compiler runs with `work_dir` as its working directory.
pub fn run_probe<C, F>(
    compiler: &C,
    work_dir: &Path,
    program: &ProbeProgram,
    compile_args: F,
    runner: &dyn ProcessRunner,
) -> Result<(), ProbeError>
where
    C: Compiler + ?Sized,
    F: FnOnce(&Path, &str) -> Vec<String>,
{
    let source_path = work_dir.join(program.source_name);
    let output_path = work_dir.join(program.output_name);

    std::fs::write(&source_path, program.source).map_err(|source| ProbeError::WriteSource {
        path: source_path.clone(),
        source,
    })?;

    let compile = ProcessBuilder::from_exelist(compiler.exelist())
        .args(compile_args(&output_path, program.source_name))
        .cwd(work_dir);

    tracing::debug!("sanity compile: {}", compile.display_command());

    let compiled = match runner.exit_code(&compile) {
        Ok(code) => code,
        Err(e) => {
            tracing::warn!("failed to run `{}`: {}", compile.display_command(), e);
            None
        }
    };

    if compiled != Some(0) {
        return Err(ProbeError::ToolchainUnusable {
            language: compiler.language().to_string(),
            toolchain: compiler.name_string(),
            exit_code: compiled,
        });
    }

    if compiler.is_cross() {
        // The binary targets another machine; compiling is all we can check.
        tracing::debug!(
            "skipping execution of sanity binary for cross toolchain `{}`",
            compiler.name_string()
        );
        return Ok(());
    }

    let execute = ProcessBuilder::new(&output_path);
    let ran = match runner.exit_code(&execute) {
        Ok(code) => code,
        Err(e) => {
            tracing::warn!("failed to run `{}`: {}", output_path.display(), e);
            None
        }
    };

    if ran != Some(0) {
        return Err(ProbeError::ExecutableUnrunnable {
            language: compiler.language().to_string(),
            toolchain: compiler.name_string(),
            exit_code: ran,
        });
    }

    Ok(())
}

/// Where a toolchain stands with respect to its sanity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SanityState {
    #[default]
    Unverified,
    Verified,
    Failed,
}

impl fmt::Display for SanityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanityState::Unverified => write!(f, "unverified"),
            SanityState::Verified => write!(f, "verified"),
            SanityState::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of one sanity probe.
#[derive(Debug)]
pub enum SanityResult {
    Passed { message: String },
    Failed(ProbeError),
}

impl SanityResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SanityResult::Passed { .. })
    }

    /// Human-readable explanation of the outcome.
    pub fn message(&self) -> String {
        match self {
            SanityResult::Passed { message } => message.clone(),
            SanityResult::Failed(err) => err.to_string(),
        }
    }

    /// Convert into a `Result`, keeping the failure cause.
    pub fn into_result(self) -> Result<(), ProbeError> {
        match self {
            SanityResult::Passed { .. } => Ok(()),
            SanityResult::Failed(err) => Err(err),
        }
    }
}

/// Tracks the sanity probe of one configured toolchain.
pub struct SanityProber<'a> {
    compiler: &'a dyn Compiler,
    runner: &'a dyn ProcessRunner,
    state: SanityState,
}

impl<'a> SanityProber<'a> {
    pub fn new(compiler: &'a dyn Compiler, runner: &'a dyn ProcessRunner) -> Self {
        SanityProber {
            compiler,
            runner,
            state: SanityState::Unverified,
        }
    }

    pub fn state(&self) -> SanityState {
        self.state
    }

    /// Probe the toolchain in `work_dir`.
    ///
    /// Calling this again repeats the whole check and replaces the state.
    pub fn probe(&mut self, work_dir: &Path) -> SanityResult {
        let name = self.compiler.name_string();
        tracing::info!(
            "Checking {} compiler `{}` ({} {})",
            self.compiler.language(),
            name,
            self.compiler.id(),
            self.compiler.version()
        );

        match self.compiler.sanity_check(work_dir, self.runner) {
            Ok(()) => {
                self.state = SanityState::Verified;
                let message = if self.compiler.is_cross() {
                    format!(
                        "{} compiler `{}` compiles programs (cross toolchain, execution not checked)",
                        self.compiler.language(),
                        name
                    )
                } else {
                    format!(
                        "{} compiler `{}` compiles runnable programs",
                        self.compiler.language(),
                        name
                    )
                };
                tracing::info!("{}", message);
                SanityResult::Passed { message }
            }
            Err(err) => {
                self.state = SanityState::Failed;
                tracing::warn!("{}", err);
                SanityResult::Failed(err)
            }
        }
    }
}
