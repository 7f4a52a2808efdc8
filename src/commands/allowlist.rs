//! Allowlist command implementation.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::cli::AllowlistAction;
use crate::config::Config;
use crate::lock::LockGuard;
use crate::validation::{validate_entry, Entry, RawEntry};

/// Run the allowlist command
pub fn run(action: AllowlistAction, config_path: &Path) -> Result<()> {
    match action {
        AllowlistAction::Add { address, high } => {
            add_to_allowlist(RawEntry::from_parts(address, high), config_path)
        }
        AllowlistAction::Del { address, high } => {
            remove_from_allowlist(RawEntry::from_parts(address, high), config_path)
        }
        AllowlistAction::List { json } => list_allowlist(json, config_path),
    }
}

/// Add an address or range to the allowlist
fn add_to_allowlist(raw: RawEntry, config_path: &Path) -> Result<()> {
    // Fail fast before taking the lock
    validate_entry(&raw)?;

    let _lock = LockGuard::acquire(config_path)?;
    let mut config = Config::load_or_default(config_path)?;

    let registry = config.empty_registry();
    registry.initialize(&config.allowlist)?;
    let entry = registry.add(&raw)?;

    config.allowlist = registry.snapshot().iter().map(Entry::to_raw).collect();
    config.save(config_path)?;

    println!("[OK] Added {} to allowlist", entry);
    Ok(())
}

/// Remove an address or range from the allowlist
fn remove_from_allowlist(raw: RawEntry, config_path: &Path) -> Result<()> {
    let _lock = LockGuard::acquire(config_path)?;
    let mut config = Config::load(config_path)?;

    let registry = config.empty_registry();
    registry.initialize(&config.allowlist)?;
    let entry = registry.remove(&raw)?;

    config.allowlist = registry.snapshot().iter().map(Entry::to_raw).collect();
    config.save(config_path)?;

    println!("[OK] Removed {} from allowlist", entry);
    Ok(())
}

#[derive(Serialize)]
struct ListedEntry {
    entry: RawEntry,
    kind: &'static str,
    family: Option<String>,
}

impl From<&Entry> for ListedEntry {
    fn from(entry: &Entry) -> Self {
        Self {
            entry: entry.to_raw(),
            kind: match entry {
                Entry::Address(_) => "address",
                Entry::Range(_) => "range",
            },
            family: entry.family().map(|f| f.to_string()),
        }
    }
}

/// List all allowlist entries
fn list_allowlist(json: bool, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let registry = config.empty_registry();
    registry.initialize(&config.allowlist)?;
    let entries = registry.snapshot();

    if json {
        let listed: Vec<ListedEntry> = entries.iter().map(ListedEntry::from).collect();
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    println!();
    println!("Allowlist ({} entries):", entries.len());
    println!();

    if entries.is_empty() {
        println!("  (empty)");
    } else {
        for entry in entries.iter() {
            let family = entry
                .family()
                .map(|f| f.to_string())
                .unwrap_or_else(|| "mixed".to_string());
            println!("  {:<40} {}", entry.to_string(), family);
        }
    }
    println!();

    Ok(())
}
