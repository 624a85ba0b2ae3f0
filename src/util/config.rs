//! Toolchain configuration files.
//!
//! A toolchain can be described in two places:
//! - Global: `~/.quay/toolchain.toml` - User-wide defaults
//! - Project: `.quay/toolchain.toml` - Project-specific overrides
//!
//! Project values take precedence over global values, key by key.
//!
//! ```toml
//! [toolchain]
//! exelist = ["cobc"]
//! version = "3.2.0"
//! full_version = "cobc (GnuCOBOL) 3.2.0"
//! target = "aarch64-unknown-linux-gnu"
//! cross = true
//! linker = ["ld"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::toolchain::{LinkerRef, MachineInfo, ToolchainIdentity};

/// Toolchain configuration for one compiler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Toolchain settings
    pub toolchain: ToolchainSettings,
}

/// Settings describing a configured compiler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Command used to invoke the compiler (e.g., ["cobc"])
    pub exelist: Vec<String>,

    /// Compiler version (e.g., "3.2.0")
    pub version: Option<String>,

    /// Full version banner
    pub full_version: Option<String>,

    /// Target triple (e.g., x86_64-unknown-linux-gnu)
    pub target: Option<String>,

    /// Force cross or native mode; derived from `target` when unset
    pub cross: Option<bool>,

    /// Command used to invoke the linker
    pub linker: Vec<String>,
}

impl ToolchainConfig {
    /// Load toolchain configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read toolchain config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse toolchain config: {}", path.display()))
    }

    /// Load toolchain configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to load toolchain config from {}: {:#}",
                    path.display(),
                    e
                );
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Save toolchain configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .with_context(|| "failed to serialize toolchain config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("failed to write toolchain config: {}", path.display()))?;

        Ok(())
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: ToolchainConfig) {
        let other = other.toolchain;
        if !other.exelist.is_empty() {
            self.toolchain.exelist = other.exelist;
        }
        if other.version.is_some() {
            self.toolchain.version = other.version;
        }
        if other.full_version.is_some() {
            self.toolchain.full_version = other.full_version;
        }
        if other.target.is_some() {
            self.toolchain.target = other.target;
        }
        if other.cross.is_some() {
            self.toolchain.cross = other.cross;
        }
        if !other.linker.is_empty() {
            self.toolchain.linker = other.linker;
        }
    }

    /// Build the identity of the configured compiler.
    pub fn identity(&self) -> Result<ToolchainIdentity> {
        let tc = &self.toolchain;

        if tc.exelist.is_empty() {
            bail!("toolchain config has no `exelist`");
        }
        let Some(version) = &tc.version else {
            bail!("toolchain config has no `version` for `{}`", tc.exelist.join(" "));
        };

        let host = MachineInfo::host();
        let machine = match &tc.target {
            Some(triple) => MachineInfo::parse(triple)
                .with_context(|| format!("invalid target triple `{}`", triple))?,
            None => host.clone(),
        };
        let is_cross = tc.cross.unwrap_or_else(|| !machine.can_run_on(&host));

        let mut identity = ToolchainIdentity::new(tc.exelist.clone(), version.clone());
        identity.machine = machine;
        identity.is_cross = is_cross;
        identity.full_version = tc.full_version.clone();

        if let Some(program) = tc.linker.first() {
            let id = Path::new(program)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| program.clone());
            identity.linker = Some(LinkerRef::new(id, tc.linker.clone()));
        }

        Ok(identity)
    }
}

/// Load merged toolchain configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.quay/toolchain.toml)
/// 2. Global config (~/.quay/toolchain.toml)
/// 3. Defaults
pub fn load_toolchain_config(global_path: &Path, project_path: &Path) -> ToolchainConfig {
    let mut config = ToolchainConfig::default();

    if global_path.exists() {
        config.merge(ToolchainConfig::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(ToolchainConfig::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.quay).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".quay"))
}

/// Get the global toolchain config path (~/.quay/toolchain.toml).
pub fn global_toolchain_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("toolchain.toml"))
}

/// Get the project toolchain config path (.quay/toolchain.toml).
pub fn project_toolchain_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".quay").join("toolchain.toml")
}
