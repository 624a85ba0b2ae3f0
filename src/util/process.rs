//! Subprocess execution utilities.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};

use crate::toolchain::CommandSpec;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
        }
    }

    /// Create a process builder from an invocation list such as
    /// `["ccache", "cobc"]`: the first entry is the program, the rest are
    /// leading arguments.
    pub fn from_exelist(exelist: &[String]) -> Self {
        let (program, rest) = match exelist.split_first() {
            Some((program, rest)) => (program.as_str(), rest),
            None => ("", &[][..]),
        };
        ProcessBuilder::new(program).args(rest)
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the working directory, if one was set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute and return status only. Standard streams are inherited.
    pub fn status(&self) -> Result<ExitStatus> {
        let mut cmd = self.build_command();
        let status = cmd
            .status()
            .with_context(|| format!("failed to execute `{}`", self.program.display()))?;
        Ok(status)
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

impl From<&CommandSpec> for ProcessBuilder {
    fn from(spec: &CommandSpec) -> Self {
        spec.env.iter().fold(
            ProcessBuilder::new(&spec.program).args(&spec.args),
            |pb, (key, value)| pb.env(key, value),
        )
    }
}

/// Runs processes to completion and reports their exit codes.
///
/// Calls block the current thread until the child exits. There is no
/// timeout.
pub trait ProcessRunner: Send + Sync {
    /// Run `process` and return its exit code, or `None` when it exited
    /// without one (killed by a signal).
    fn exit_code(&self, process: &ProcessBuilder) -> io::Result<Option<i32>>;
}

/// [`ProcessRunner`] that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn exit_code(&self, process: &ProcessBuilder) -> io::Result<Option<i32>> {
        tracing::debug!("running `{}`", process.display_command());
        let status = process.build_command().status()?;
        Ok(status.code())
    }
}
