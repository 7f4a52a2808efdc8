//! Check command implementation.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::error::ShieldError;

/// Run the check command
pub fn run(ip: &str, strict: bool, config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let registry = config.registry()?;

    let matched = registry.matching_entry(ip)?;

    println!();
    match &matched {
        Some(entry) => {
            println!("IP {} is AUTHORIZED", ip);
            println!("  Matching entry: {}", entry);
        }
        None => println!("IP {} is DENIED", ip),
    }
    println!();

    if strict && matched.is_none() {
        return Err(ShieldError::Unauthorized(ip.to_string()).into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, yaml: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_strict_denial_is_unauthorized() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "allowlist:\n  - \"10.0.0.5\"\n");

        assert!(run("10.0.0.5", true, &path).is_ok());
        assert!(run("10.0.0.6", false, &path).is_ok());

        let err = run("10.0.0.6", true, &path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ShieldError>(),
            Some(&ShieldError::Unauthorized("10.0.0.6".to_string()))
        );
    }

    #[test]
    fn test_empty_allowlist_denies() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "allowlist: []\n");

        assert!(run("10.0.0.1", false, &path).is_ok());
        assert!(run("10.0.0.1", true, &path).is_err());
    }
}
