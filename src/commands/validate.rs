//! Validate command implementation.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::validation::Entry;

/// Run the validate command
pub fn run(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let registry = config.registry()?;
    let entries = registry.snapshot();

    let ranges = entries
        .iter()
        .filter(|entry| matches!(entry, Entry::Range(_)))
        .count();
    let unmatchable = entries
        .iter()
        .filter(|entry| match entry {
            Entry::Range(range) => range.is_inverted() || range.is_mixed_family(),
            Entry::Address(_) => false,
        })
        .count();

    println!(
        "[OK] {:?} is valid: {} addresses, {} ranges",
        config_path,
        entries.len() - ranges,
        ranges
    );
    if unmatchable > 0 {
        println!(
            "     {} range(s) can never match (inverted or mixed family)",
            unmatchable
        );
    }

    Ok(())
}
