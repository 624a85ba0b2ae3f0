//! Flag tables shared by GCC-style compiler drivers.
//!
//! Toolchains whose drivers follow the `cc` conventions for `-g` and `-O`
//! look their flags up here instead of carrying their own copies.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Optimization level requested for a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OptimizationLevel {
    /// No optimization flags at all
    #[default]
    #[serde(rename = "plain", alias = "none")]
    Plain,
    #[serde(rename = "0")]
    O0,
    /// Optimize for debugging
    #[serde(rename = "g")]
    Debug,
    #[serde(rename = "1")]
    O1,
    #[serde(rename = "2")]
    O2,
    #[serde(rename = "3")]
    O3,
    /// Optimize for size
    #[serde(rename = "s")]
    Size,
}

impl OptimizationLevel {
    /// Get the level as it is spelled in build options.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationLevel::Plain => "plain",
            OptimizationLevel::O0 => "0",
            OptimizationLevel::Debug => "g",
            OptimizationLevel::O1 => "1",
            OptimizationLevel::O2 => "2",
            OptimizationLevel::O3 => "3",
            OptimizationLevel::Size => "s",
        }
    }
}

impl FromStr for OptimizationLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" | "none" => Ok(OptimizationLevel::Plain),
            "0" => Ok(OptimizationLevel::O0),
            "g" => Ok(OptimizationLevel::Debug),
            "1" => Ok(OptimizationLevel::O1),
            "2" => Ok(OptimizationLevel::O2),
            "3" => Ok(OptimizationLevel::O3),
            "s" => Ok(OptimizationLevel::Size),
            other => bail!(
                "unknown optimization level `{}` (expected plain, 0, g, 1, 2, 3 or s)",
                other
            ),
        }
    }
}

impl fmt::Display for OptimizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warning level requested for a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WarningLevel {
    #[serde(rename = "0")]
    W0,
    #[default]
    #[serde(rename = "1")]
    W1,
    #[serde(rename = "2")]
    W2,
    #[serde(rename = "3")]
    W3,
    #[serde(rename = "everything")]
    Everything,
}

impl WarningLevel {
    /// Get the level as it is spelled in build options.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningLevel::W0 => "0",
            WarningLevel::W1 => "1",
            WarningLevel::W2 => "2",
            WarningLevel::W3 => "3",
            WarningLevel::Everything => "everything",
        }
    }
}

impl FromStr for WarningLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(WarningLevel::W0),
            "1" => Ok(WarningLevel::W1),
            "2" => Ok(WarningLevel::W2),
            "3" => Ok(WarningLevel::W3),
            "everything" => Ok(WarningLevel::Everything),
            other => bail!(
                "unknown warning level `{}` (expected 0, 1, 2, 3 or everything)",
                other
            ),
        }
    }
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Debug-info flags for `cc`-style drivers.
pub fn clike_debug_args(is_debug: bool) -> &'static [&'static str] {
    if is_debug {
        &["-g"]
    } else {
        &[]
    }
}

/// Optimization flags for `cc`-style drivers.
pub fn clike_optimization_args(level: OptimizationLevel) -> &'static [&'static str] {
    match level {
        OptimizationLevel::Plain | OptimizationLevel::O0 | OptimizationLevel::Debug => &[],
        OptimizationLevel::O1 => &["-O1"],
        OptimizationLevel::O2 => &["-O2"],
        OptimizationLevel::O3 => &["-O3"],
        OptimizationLevel::Size => &["-Os"],
    }
}
