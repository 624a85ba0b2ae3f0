//! Toolchain abstraction for compiler adapters.
//!
//! A [`Compiler`] turns semantic build parameters (include paths, output
//! targets, optimization and debug levels) into the literal arguments one
//! compiler family expects, and can prove that the configured compiler
//! actually works with a sanity probe.
//!
//! The build orchestrator only ever talks to `dyn Compiler`; adding a
//! toolchain means adding an implementation, not touching the orchestrator.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::util::process::ProcessRunner;

mod cobol;
pub mod flags;
mod param;
pub mod paths;
pub mod sanity;

pub use cobol::CobolCompiler;
pub use flags::{OptimizationLevel, WarningLevel};
pub use param::CompileParameter;
pub use sanity::{ProbeError, SanityProber, SanityResult, SanityState};

/// Which machine a toolchain produces code for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MachineChoice {
    /// The machine running the build
    Build,
    /// The machine the built programs will run on
    #[default]
    Host,
}

/// Target machine description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineInfo {
    /// CPU family (x86_64, aarch64, etc.)
    pub cpu_family: String,
    /// Vendor (unknown, apple, pc, etc.)
    pub vendor: String,
    /// Operating system (linux, macos, windows, etc.)
    pub system: String,
    /// Environment/ABI (gnu, musl, msvc, etc.)
    pub env: Option<String>,
}

impl MachineInfo {
    /// Create a new machine description.
    pub fn new(cpu_family: &str, vendor: &str, system: &str, env: Option<&str>) -> Self {
        MachineInfo {
            cpu_family: cpu_family.to_string(),
            vendor: vendor.to_string(),
            system: system.to_string(),
            env: env.map(|s| s.to_string()),
        }
    }

    /// Describe the machine this process is running on.
    pub fn host() -> Self {
        // Use Rust's target triple as approximation
        let arch = std::env::consts::ARCH;
        let os = std::env::consts::OS;

        let (vendor, env) = match os {
            "linux" => ("unknown", Some("gnu")),
            "macos" => ("apple", None),
            "windows" => ("pc", Some("msvc")),
            _ => ("unknown", None),
        };

        MachineInfo::new(arch, vendor, os, env)
    }

    /// Parse a target triple string (`arch-vendor-os[-env]`).
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() < 3 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }

        Some(MachineInfo {
            cpu_family: parts[0].to_string(),
            vendor: parts[1].to_string(),
            system: parts[2].to_string(),
            env: parts.get(3).map(|s| s.to_string()),
        })
    }

    /// Whether binaries for `self` can run on `other`.
    ///
    /// Vendor and env are ignored: only the CPU family and OS decide.
    pub fn can_run_on(&self, other: &MachineInfo) -> bool {
        self.cpu_family == other.cpu_family && self.system == other.system
    }
}

impl fmt::Display for MachineInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.env {
            Some(env) => write!(f, "{}-{}-{}-{}", self.cpu_family, self.vendor, self.system, env),
            None => write!(f, "{}-{}-{}", self.cpu_family, self.vendor, self.system),
        }
    }
}

/// The linker a compiler hands its objects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkerRef {
    /// Linker id (e.g. "ld.bfd")
    pub id: String,
    /// Command prefix used to invoke the linker
    pub exelist: Vec<String>,
}

impl LinkerRef {
    pub fn new(id: impl Into<String>, exelist: Vec<String>) -> Self {
        LinkerRef {
            id: id.into(),
            exelist,
        }
    }
}

/// Everything known about one detected compiler.
///
/// Built once when the toolchain is detected or configured and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainIdentity {
    /// Command prefix used to invoke the compiler (e.g. `["ccache", "cobc"]`)
    pub exelist: Vec<String>,
    /// Short version string (e.g. "3.2.0")
    pub version: String,
    /// Full `--version` banner, when it was captured
    pub full_version: Option<String>,
    /// Machine the compiler builds for
    pub machine: MachineInfo,
    /// Build or host machine
    pub for_machine: MachineChoice,
    /// Whether produced binaries cannot run on this machine
    pub is_cross: bool,
    /// Linker used by the compiler driver
    pub linker: Option<LinkerRef>,
}

impl ToolchainIdentity {
    /// Create a native identity for the host machine.
    pub fn new(exelist: Vec<String>, version: impl Into<String>) -> Self {
        ToolchainIdentity {
            exelist,
            version: version.into(),
            full_version: None,
            machine: MachineInfo::host(),
            for_machine: MachineChoice::Host,
            is_cross: false,
            linker: None,
        }
    }

    /// Set the full version banner.
    pub fn with_full_version(mut self, full_version: impl Into<String>) -> Self {
        self.full_version = Some(full_version.into());
        self
    }

    /// Mark the toolchain as targeting `machine` from another machine.
    pub fn cross(mut self, machine: MachineInfo) -> Self {
        self.machine = machine;
        self.is_cross = true;
        self
    }

    /// Set the linker reference.
    pub fn with_linker(mut self, linker: LinkerRef) -> Self {
        self.linker = Some(linker);
        self
    }
}

/// A command to execute, with program, arguments, and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to run (e.g., "cobc")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
    /// Environment variables to set
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Add an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Input for a compile step.
#[derive(Debug, Clone, Default)]
pub struct CompileInput {
    /// Source file to compile
    pub source: PathBuf,
    /// Output object file
    pub output: PathBuf,
    /// Include directories, with whether each one is a system directory
    pub include_dirs: Vec<(PathBuf, bool)>,
    pub optimization: OptimizationLevel,
    pub debug: bool,
    pub warning_level: WarningLevel,
    /// Turn warnings into errors
    pub werror: bool,
    /// Emit a dependency file next to the object
    pub depfile: bool,
    /// Additional compiler flags
    pub extra_args: Vec<String>,
}

/// Trait for compiler adapters.
///
/// Implementors supply the flag spellings of their compiler family; the
/// provided methods cover what every adapter shares (identity accessors,
/// the `cc`-style debug and optimization tables, depfile naming, command
/// assembly). Every argument method is total and side-effect free.
pub trait Compiler: Send + Sync {
    /// The identity this adapter was created with.
    fn identity(&self) -> &ToolchainIdentity;

    /// Language name (e.g. "cobol").
    fn language(&self) -> &'static str;

    /// Compiler id (e.g. "GnuCOBOL").
    fn id(&self) -> &'static str;

    /// Prefix for passing an argument through the driver to the linker.
    fn linker_prefix(&self) -> &'static str;

    fn pic_args(&self) -> Vec<String>;

    fn pie_args(&self) -> Vec<String>;

    /// Whether static libraries need a separate archiver instead of the
    /// compiler driver.
    fn needs_static_linker(&self) -> bool;

    fn werror_args(&self) -> Vec<String>;

    /// Arguments that make the compiler write a dependency file for
    /// `out_target`.
    fn dependency_gen_args(&self, out_target: &str, out_file: &str) -> Vec<String>;

    fn depfile_suffix(&self) -> &'static str;

    fn output_args(&self, target: &str) -> Vec<String>;

    /// Arguments passed on every invocation.
    fn always_args(&self) -> Vec<String>;

    fn warn_args(&self, level: WarningLevel) -> Vec<String>;

    fn include_args(&self, path: &str, is_system: bool) -> Vec<String>;

    fn library_dir_args(&self, path: &str) -> Vec<String>;

    fn compile_only_args(&self) -> Vec<String>;

    /// Make search-path arguments absolute relative to `build_dir`.
    fn absolute_path_args(&self, args: &[String], build_dir: &Path) -> Vec<String>;

    /// Compile (and run, when native) a known-good program in `work_dir`.
    fn sanity_check(&self, work_dir: &Path, runner: &dyn ProcessRunner) -> Result<(), ProbeError>;

    fn exelist(&self) -> &[String] {
        &self.identity().exelist
    }

    fn version(&self) -> &str {
        &self.identity().version
    }

    fn full_version(&self) -> Option<&str> {
        self.identity().full_version.as_deref()
    }

    fn is_cross(&self) -> bool {
        self.identity().is_cross
    }

    fn for_machine(&self) -> MachineChoice {
        self.identity().for_machine
    }

    fn machine_info(&self) -> &MachineInfo {
        &self.identity().machine
    }

    fn linker(&self) -> Option<&LinkerRef> {
        self.identity().linker.as_ref()
    }

    /// Human-readable name of the compiler invocation.
    fn name_string(&self) -> String {
        self.exelist().join(" ")
    }

    fn depfile_for_object(&self, object: &str) -> String {
        paths::depfile_path(object, self.depfile_suffix())
    }

    fn debug_args(&self, is_debug: bool) -> Vec<String> {
        to_owned_args(flags::clike_debug_args(is_debug))
    }

    fn optimization_args(&self, level: OptimizationLevel) -> Vec<String> {
        to_owned_args(flags::clike_optimization_args(level))
    }

    /// Generate a compile command.
    fn compile_command(&self, input: &CompileInput) -> CommandSpec {
        let exelist = self.exelist();
        let program = exelist.first().map(String::as_str).unwrap_or_default();
        let output = input.output.display().to_string();

        let mut cmd = CommandSpec::new(program)
            .args(exelist.iter().skip(1).cloned())
            .args(self.always_args())
            .args(self.compile_only_args());

        for (dir, is_system) in &input.include_dirs {
            cmd = cmd.args(self.include_args(&dir.display().to_string(), *is_system));
        }

        cmd = cmd
            .args(self.debug_args(input.debug))
            .args(self.optimization_args(input.optimization))
            .args(self.warn_args(input.warning_level));

        if input.werror {
            cmd = cmd.args(self.werror_args());
        }

        if input.depfile {
            let depfile = self.depfile_for_object(&output);
            cmd = cmd.args(self.dependency_gen_args(&output, &depfile));
        }

        cmd.args(input.extra_args.iter().cloned())
            .args(self.output_args(&output))
            .arg(input.source.display().to_string())
    }
}

fn to_owned_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}
