//! Semantic build parameters.

use super::{Compiler, OptimizationLevel, WarningLevel};

/// One build knob, before it has been spelled for a particular compiler.
///
/// Values are built per compile invocation and consumed right away by
/// [`CompileParameter::to_args`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileParameter {
    IncludePath { path: String, is_system: bool },
    LibraryPath(String),
    OutputTarget(String),
    OptimizationLevel(OptimizationLevel),
    DebugFlag(bool),
    WarningLevel(WarningLevel),
    /// Object file whose dependency file should be generated
    DependencyOutputTarget(String),
}

impl CompileParameter {
    /// Spell this parameter for `compiler`.
    pub fn to_args(&self, compiler: &dyn Compiler) -> Vec<String> {
        match self {
            CompileParameter::IncludePath { path, is_system } => {
                compiler.include_args(path, *is_system)
            }
            CompileParameter::LibraryPath(path) => compiler.library_dir_args(path),
            CompileParameter::OutputTarget(path) => compiler.output_args(path),
            CompileParameter::OptimizationLevel(level) => compiler.optimization_args(*level),
            CompileParameter::DebugFlag(is_debug) => compiler.debug_args(*is_debug),
            CompileParameter::WarningLevel(level) => compiler.warn_args(*level),
            CompileParameter::DependencyOutputTarget(object) => {
                let depfile = compiler.depfile_for_object(object);
                compiler.dependency_gen_args(object, &depfile)
            }
        }
    }
}
