//! Configuration management for IPShield.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::registry::Registry;
use crate::validation::{validate_entry, RangeOrder, RawEntry};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/ipshield/config.yaml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Authorized addresses and `[low, high]` ranges
    pub allowlist: Vec<RawEntry>,

    /// Reject ranges whose low end is above their high end
    pub strict_ranges: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowlist: default_allowlist(),
            strict_ranges: false,
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file is missing
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the shape of every allowlist entry.
    ///
    /// Range ordering is checked once, when [`registry`](Self::registry)
    /// loads the entries.
    pub fn validate(&self) -> Result<()> {
        for (index, entry) in self.allowlist.iter().enumerate() {
            validate_entry(entry)
                .with_context(|| format!("Invalid allowlist entry #{}: {}", index + 1, entry))?;
        }
        Ok(())
    }

    pub fn range_order(&self) -> RangeOrder {
        if self.strict_ranges {
            RangeOrder::Strict
        } else {
            RangeOrder::Permissive
        }
    }

    /// An empty registry using this configuration's range policy
    pub fn empty_registry(&self) -> Registry {
        Registry::with_range_order(self.range_order())
    }

    /// Build a registry loaded with the allowlist. An empty allowlist gives
    /// an empty registry that denies everything.
    pub fn registry(&self) -> Result<Registry> {
        let registry = self.empty_registry();
        registry
            .initialize(&self.allowlist)
            .context("Failed to load allowlist")?;
        Ok(registry)
    }

    /// Save configuration to YAML file atomically
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self).with_context(|| "Failed to serialize config")?;
        write_atomic(path.as_ref(), &content)
    }

    /// Default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }
}

/// Write a file via tempfile + rename so readers never see a partial file.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent_dir)
        .with_context(|| format!("Failed to create directory: {:?}", parent_dir))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .context("Failed to create temporary file for config")?;

    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist config file: {:?}", path))?;

    Ok(())
}

fn default_allowlist() -> Vec<RawEntry> {
    vec![
        RawEntry::from("127.0.0.1"), // Loopback
        RawEntry::from("::1"),       // Loopback
    ]
}
