//! GnuCOBOL (`cobc`) toolchain implementation.

use std::path::Path;

use crate::util::process::ProcessRunner;

use super::sanity::{self, ProbeError, ProbeProgram};
use super::{paths, Compiler, ToolchainIdentity, WarningLevel};

/// Fixed-form COBOL: the sequence number fills columns 1-6, so every
/// statement sits in its own numbered line.
const SANITY_PROGRAM: ProbeProgram = ProbeProgram {
    source_name: "coboltest.cob",
    output_name: "coboltest",
    source: "
      * COBOL fixed-form must be indented
000100 IDENTIFICATION DIVISION.
000200 PROGRAM-ID. hello.
000300 PROCEDURE DIVISION.
000400 DISPLAY \"Cobol compilation is working.\".
000500 STOP RUN.
",
};

/// GnuCOBOL compiler driver.
#[derive(Debug, Clone)]
pub struct CobolCompiler {
    identity: ToolchainIdentity,
}

impl CobolCompiler {
    /// Create an adapter for the given `cobc` installation.
    pub fn new(identity: ToolchainIdentity) -> Self {
        CobolCompiler { identity }
    }
}

impl Compiler for CobolCompiler {
    fn identity(&self) -> &ToolchainIdentity {
        &self.identity
    }

    fn language(&self) -> &'static str {
        "cobol"
    }

    fn id(&self) -> &'static str {
        "GnuCOBOL"
    }

    fn linker_prefix(&self) -> &'static str {
        "-Q Wl,"
    }

    // cobc has no PIC/PIE switches of its own.
    fn pic_args(&self) -> Vec<String> {
        Vec::new()
    }

    fn pie_args(&self) -> Vec<String> {
        Vec::new()
    }

    fn needs_static_linker(&self) -> bool {
        true
    }

    fn werror_args(&self) -> Vec<String> {
        vec!["-Werror".to_string()]
    }

    fn dependency_gen_args(&self, out_target: &str, _out_file: &str) -> Vec<String> {
        vec!["-MT".to_string(), self.depfile_for_object(out_target)]
    }

    fn depfile_suffix(&self) -> &'static str {
        "d"
    }

    fn output_args(&self, target: &str) -> Vec<String> {
        vec!["-o".to_string(), target.to_string()]
    }

    fn always_args(&self) -> Vec<String> {
        Vec::new()
    }

    fn warn_args(&self, _level: WarningLevel) -> Vec<String> {
        Vec::new()
    }

    // cobc has a single include switch; system directories are not
    // distinguished.
    fn include_args(&self, path: &str, _is_system: bool) -> Vec<String> {
        vec![format!("-I{}", path)]
    }

    fn library_dir_args(&self, path: &str) -> Vec<String> {
        vec![format!("-L{}", path)]
    }

    fn compile_only_args(&self) -> Vec<String> {
        vec!["-c".to_string()]
    }

    fn absolute_path_args(&self, args: &[String], build_dir: &Path) -> Vec<String> {
        paths::normalize_absolute_paths(args, build_dir)
    }

    fn sanity_check(&self, work_dir: &Path, runner: &dyn ProcessRunner) -> Result<(), ProbeError> {
        sanity::run_probe(
            self,
            work_dir,
            &SANITY_PROGRAM,
            |output, source| {
                vec![
                    "-x".to_string(),
                    "-o".to_string(),
                    output.display().to_string(),
                    source.to_string(),
                ]
            },
            runner,
        )
    }
}
