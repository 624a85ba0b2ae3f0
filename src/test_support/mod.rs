//! Test utilities and mocks for unit tests.
//!
//! [`MockRunner`] stands in for [`SystemRunner`](crate::util::process::SystemRunner)
//! so sanity probes can be exercised without a COBOL compiler installed.
//!
//! # Example
//!
//! ```rust,ignore
//! let runner = MockRunner::new();
//! runner.expect_prefix("cobc -x", MockProcessOutput::exit(0));
//! runner.expect_contains("coboltest", MockProcessOutput::exit(0));
//! compiler.sanity_check(work_dir, &runner)?;
//! assert_eq!(runner.calls().len(), 2);
//! ```

use std::io;
use std::sync::Mutex;

use crate::util::process::{ProcessBuilder, ProcessRunner};

/// Mock process outcome.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub status: Option<i32>,
    /// Fail to spawn instead of running.
    pub spawn_error: bool,
}

impl MockProcessOutput {
    /// A process that exits with `code`.
    pub fn exit(code: i32) -> Self {
        MockProcessOutput {
            status: Some(code),
            spawn_error: false,
        }
    }

    /// A process terminated without an exit code.
    pub fn signaled() -> Self {
        MockProcessOutput {
            status: None,
            spawn_error: false,
        }
    }

    /// A program that cannot be started.
    pub fn not_found() -> Self {
        MockProcessOutput {
            status: None,
            spawn_error: true,
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::exit(0)
    }
}

/// Pattern for matching commands in MockRunner.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match using a regex pattern.
    Regex(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(cmd))
                .unwrap_or(false),
            CommandPattern::Any => true,
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    pub pattern: CommandPattern,
    pub output: MockProcessOutput,
    /// Number of times this expectation can be used (None = unlimited).
    pub times: Option<usize>,
    pub used: usize,
}

impl CommandExpectation {
    pub fn new(pattern: CommandPattern, output: MockProcessOutput) -> Self {
        CommandExpectation {
            pattern,
            output,
            times: None,
            used: 0,
        }
    }

    /// Set the number of times this expectation can be used.
    pub fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    expectations: Vec<CommandExpectation>,
    calls: Vec<String>,
    default_output: Option<MockProcessOutput>,
}

/// Scripted [`ProcessRunner`].
///
/// Expectations are tried in the order they were added; the first one that
/// matches the full command line (program and arguments joined by spaces)
/// and is not used up decides the outcome. Unmatched commands fail to spawn
/// unless a default was set.
#[derive(Debug, Default)]
pub struct MockRunner {
    state: Mutex<MockState>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            output,
        ))
    }

    /// Make commands starting with `prefix` fail to spawn.
    pub fn fail_spawn(&self, prefix: &str) -> &Self {
        self.expect_prefix(prefix, MockProcessOutput::not_found())
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&self, expectation: CommandExpectation) -> &Self {
        self.lock().expectations.push(expectation);
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        self.lock().default_output = Some(output);
        self
    }

    /// Get all commands that were run, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panicking test poisons the lock; the state is still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProcessRunner for MockRunner {
    fn exit_code(&self, process: &ProcessBuilder) -> io::Result<Option<i32>> {
        let cmd = process.display_command();
        let mut state = self.lock();
        state.calls.push(cmd.clone());

        let matched = state
            .expectations
            .iter_mut()
            .find(|exp| exp.pattern.matches(&cmd) && exp.available())
            .map(|exp| {
                exp.used += 1;
                exp.output.clone()
            });

        let output = match matched.or_else(|| state.default_output.clone()) {
            Some(output) => output,
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("unexpected command: {}", cmd),
                ))
            }
        };

        if output.spawn_error {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("program not found: {}", process.get_program().display()),
            ));
        }

        Ok(output.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_pattern_matching() {
        assert!(CommandPattern::Exact("cobc -V".into()).matches("cobc -V"));
        assert!(!CommandPattern::Exact("cobc -V".into()).matches("cobc -V -v"));
        assert!(CommandPattern::StartsWith("cobc".into()).matches("cobc -x"));
        assert!(CommandPattern::Contains("-x".into()).matches("cobc -x -o a"));
        assert!(CommandPattern::Regex(r"^cobc .*\.cob$".into()).matches("cobc -x a.cob"));
        assert!(!CommandPattern::Regex("(".into()).matches("anything"));
        assert!(CommandPattern::Any.matches(""));
    }

    #[test]
    fn test_limited_expectation() {
        let runner = MockRunner::new();
        runner.expect_pattern(
            CommandExpectation::new(CommandPattern::Any, MockProcessOutput::exit(0)).times(1),
        );
        runner.set_default(MockProcessOutput::exit(7));

        let pb = ProcessBuilder::new("prog");
        assert_eq!(runner.exit_code(&pb).unwrap(), Some(0));
        assert_eq!(runner.exit_code(&pb).unwrap(), Some(7));
        assert_eq!(runner.calls(), vec!["prog", "prog"]);
    }

    #[test]
    fn test_unexpected_command_errors() {
        let runner = MockRunner::new();
        runner.expect("cobc -V", MockProcessOutput::exit(0));
        assert!(runner.exit_code(&ProcessBuilder::new("gcc")).is_err());
    }
}
