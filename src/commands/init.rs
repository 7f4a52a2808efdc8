//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

use crate::config::{write_atomic, Config};

/// Run the init command
pub fn run(force: bool, config_path: &Path) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Config file {:?} already exists. Use --force to overwrite",
            config_path
        );
    }

    write_atomic(config_path, &Config::generate_default_yaml())?;

    println!("[OK] Wrote default config to {:?}", config_path);
    Ok(())
}
