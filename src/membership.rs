//! Membership evaluation for authorization queries.
//!
//! Point entries are checked first; range entries are only consulted when no
//! point entry matched. Family mismatches are never errors, they just don't
//! match.

use crate::validation::{Address, Entry, Range};

/// Check whether `candidate` is authorized by any entry.
pub fn evaluate(candidate: &Address, entries: &[Entry]) -> bool {
    find_match(candidate, entries).is_some()
}

/// Return the first entry authorizing `candidate`, if any.
///
/// Point entries take precedence over ranges regardless of insertion order.
pub fn find_match<'a>(candidate: &Address, entries: &'a [Entry]) -> Option<&'a Entry> {
    let is_point = |entry: &&Entry| matches!(entry, Entry::Address(_));

    entries
        .iter()
        .filter(is_point)
        .find(|entry| entry_matches(candidate, entry))
        .or_else(|| {
            entries
                .iter()
                .filter(|entry| !is_point(entry))
                .find(|entry| entry_matches(candidate, entry))
        })
}

/// Same family and same canonical value.
pub fn point_matches(candidate: &Address, point: &Address) -> bool {
    candidate.family() == point.family() && candidate.value() == point.value()
}

/// Same family as both ends and inside `[low, high]`.
pub fn range_matches(candidate: &Address, range: &Range) -> bool {
    let (low, high) = (range.low(), range.high());

    candidate.family() == low.family()
        && candidate.family() == high.family()
        && low.value() <= candidate.value()
        && candidate.value() <= high.value()
}

fn entry_matches(candidate: &Address, entry: &Entry) -> bool {
    match entry {
        Entry::Address(point) => point_matches(candidate, point),
        Entry::Range(range) => range_matches(candidate, range),
    }
}
