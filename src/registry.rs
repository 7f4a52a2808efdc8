//! The allow-list registry.
//!
//! Holds the ordered list of authorized entries and answers authorization
//! queries. A registry is an ordinary value: build one at startup and share
//! it as `&Registry` or `Arc<Registry>`.
//!
//! Writers replace the entry list under a write lock (copy-on-write through
//! [`Arc::make_mut`]); readers only hold the lock long enough to clone the
//! `Arc`, then evaluate against that snapshot.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use crate::error::{Result, ShieldError};
use crate::membership;
use crate::validation::{
    check_range_order, validate_address, validate_entry, Entry, RangeOrder, RawEntry,
};

/// Ordered, thread-safe collection of authorized addresses and ranges.
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<Arc<Vec<Entry>>>,
    range_order: RangeOrder,
}

impl Registry {
    /// Create an empty registry that accepts inverted ranges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with an explicit range ordering policy.
    pub fn with_range_order(range_order: RangeOrder) -> Self {
        Self {
            entries: RwLock::default(),
            range_order,
        }
    }

    pub fn range_order(&self) -> RangeOrder {
        self.range_order
    }

    /// Bulk-load entries.
    ///
    /// Every entry is validated before any is added: either the whole batch
    /// is appended or the registry is left as it was.
    pub fn initialize(&self, entries: &[RawEntry]) -> Result<Vec<Entry>> {
        let validated = entries
            .iter()
            .map(|entry| self.validate(entry))
            .collect::<Result<Vec<_>>>()?;

        let mut guard = self.write();
        Arc::make_mut(&mut *guard).extend(validated.iter().cloned());
        info!(
            "Loaded {} entries into allowlist ({} total)",
            validated.len(),
            guard.len()
        );

        Ok(validated)
    }

    /// Validate and append a single entry. Duplicates are allowed.
    pub fn add(&self, entry: &RawEntry) -> Result<Entry> {
        let validated = self.validate(entry)?;

        let mut guard = self.write();
        Arc::make_mut(&mut *guard).push(validated.clone());
        info!("Added {} to allowlist", validated);

        Ok(validated)
    }

    /// Remove the first entry structurally equal to `entry`.
    pub fn remove(&self, entry: &RawEntry) -> Result<Entry> {
        let mut guard = self.write();
        let position = guard
            .iter()
            .position(|existing| existing.matches_raw(entry))
            .ok_or_else(|| ShieldError::NotFound(entry.to_string()))?;

        let removed = Arc::make_mut(&mut *guard).remove(position);
        info!("Removed {} from allowlist", removed);

        Ok(removed)
    }

    /// Check whether `candidate` is authorized.
    ///
    /// A malformed candidate is an error, not a denial.
    pub fn authorize(&self, candidate: &str) -> Result<bool> {
        Ok(self.matching_entry(candidate)?.is_some())
    }

    /// Like [`authorize`](Self::authorize), but returns the entry that granted
    /// access.
    pub fn matching_entry(&self, candidate: &str) -> Result<Option<Entry>> {
        let address = validate_address(candidate)?;
        let snapshot = self.snapshot();

        let found = membership::find_match(&address, &snapshot).cloned();
        match &found {
            Some(entry) => debug!("{} authorized by {}", candidate, entry),
            None => debug!("{} not authorized ({} entries)", candidate, snapshot.len()),
        }

        Ok(found)
    }

    /// A consistent view of the current entries, in insertion order.
    pub fn snapshot(&self) -> Arc<Vec<Entry>> {
        Arc::clone(&self.read())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn validate(&self, entry: &RawEntry) -> Result<Entry> {
        let validated = validate_entry(entry)?;
        check_range_order(&validated, self.range_order)?;
        Ok(validated)
    }

    // The guarded value is always a complete Vec, so a poisoned lock is safe to reuse
    fn read(&self) -> RwLockReadGuard<'_, Arc<Vec<Entry>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Arc<Vec<Entry>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
