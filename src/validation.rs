//! Centralized validation functions for IPShield.
//!
//! This module turns untrusted input into validated allow-list entries:
//! - Single IPv4/IPv6 addresses, parsed to a family-tagged canonical integer
//! - Boundaries (inclusive ranges) made of exactly two addresses
//!
//! Nothing here holds state; the [`Registry`](crate::registry::Registry) calls
//! into these functions before touching its entry list.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;
use std::net::IpAddr;
use tracing::warn;

use crate::error::{Result, ShieldError};

/// Address family of a parsed address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    V4,
    V6,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => f.write_str("IPv4"),
            Family::V6 => f.write_str("IPv6"),
        }
    }
}

/// A validated single address.
///
/// `raw` is kept exactly as supplied so that removal can match on the
/// literal the caller used; `value` is the canonical unsigned integer
/// within the family's bit width.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    raw: String,
    value: u128,
    family: Family,
}

impl Address {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> u128 {
        self.value
    }

    pub fn family(&self) -> Family {
        self.family
    }

    fn from_parsed(raw: &str, ip: IpAddr) -> Self {
        let (value, family) = match ip {
            IpAddr::V4(v4) => (u128::from(u32::from(v4)), Family::V4),
            IpAddr::V6(v6) => (u128::from(v6), Family::V6),
        };
        Self {
            raw: raw.to_string(),
            value,
            family,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// An inclusive address range.
///
/// Ordering between `low` and `high` is not enforced here; see
/// [`check_range_order`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range {
    low: Address,
    high: Address,
}

impl Range {
    pub fn low(&self) -> &Address {
        &self.low
    }

    pub fn high(&self) -> &Address {
        &self.high
    }

    /// Both ends belong to the same family and `low` sorts above `high`.
    /// Such a range can never match anything.
    pub fn is_inverted(&self) -> bool {
        !self.is_mixed_family() && self.low.value > self.high.value
    }

    /// The two ends belong to different families. Such a range can never
    /// match anything either.
    pub fn is_mixed_family(&self) -> bool {
        self.low.family != self.high.family
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.low, self.high)
    }
}

/// A validated allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entry {
    Address(Address),
    Range(Range),
}

impl Entry {
    /// Convert back into the input shape it was validated from.
    pub fn to_raw(&self) -> RawEntry {
        match self {
            Entry::Address(addr) => RawEntry::Address(addr.raw.clone()),
            Entry::Range(range) => {
                RawEntry::Boundary(vec![range.low.raw.clone(), range.high.raw.clone()])
            }
        }
    }

    /// Exact structural match against untrusted input: same literal for an
    /// address, same literal pair in the same order for a range.
    pub fn matches_raw(&self, raw: &RawEntry) -> bool {
        match (self, raw) {
            (Entry::Address(addr), RawEntry::Address(s)) => addr.raw == *s,
            (Entry::Range(range), RawEntry::Boundary(pair)) => {
                pair.len() == 2 && range.low.raw == pair[0] && range.high.raw == pair[1]
            }
            _ => false,
        }
    }

    pub fn family(&self) -> Option<Family> {
        match self {
            Entry::Address(addr) => Some(addr.family),
            Entry::Range(range) if !range.is_mixed_family() => Some(range.low.family),
            Entry::Range(_) => None,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Address(addr) => fmt::Display::fmt(addr, f),
            Entry::Range(range) => fmt::Display::fmt(range, f),
        }
    }
}

/// Untrusted entry as it arrives from configuration or a caller.
///
/// Deserialized untagged: a YAML string becomes `Address`, a list of strings
/// becomes `Boundary`, and anything else (null, numbers, mappings, lists with
/// non-string items) lands in `Malformed` so validation can reject it with a
/// proper error instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Address(String),
    Boundary(Vec<String>),
    Malformed(Value),
}

impl RawEntry {
    /// Build from CLI-style arguments: one address, or a low/high pair.
    pub fn from_parts(address: impl Into<String>, high: Option<String>) -> Self {
        match high {
            Some(high) => RawEntry::Boundary(vec![address.into(), high]),
            None => RawEntry::Address(address.into()),
        }
    }
}

impl From<&str> for RawEntry {
    fn from(s: &str) -> Self {
        RawEntry::Address(s.to_string())
    }
}

impl From<String> for RawEntry {
    fn from(s: String) -> Self {
        RawEntry::Address(s)
    }
}

impl From<Vec<String>> for RawEntry {
    fn from(pair: Vec<String>) -> Self {
        RawEntry::Boundary(pair)
    }
}

impl<const N: usize> From<[&str; N]> for RawEntry {
    fn from(items: [&str; N]) -> Self {
        RawEntry::Boundary(items.iter().map(|s| s.to_string()).collect())
    }
}

impl fmt::Display for RawEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawEntry::Address(s) => f.write_str(s),
            RawEntry::Boundary(items) => write!(f, "[{}]", items.join(", ")),
            RawEntry::Malformed(value) => f.write_str(&describe(value)),
        }
    }
}

/// How to treat ranges whose low end sorts above their high end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangeOrder {
    /// Accept them; they never match.
    #[default]
    Permissive,
    /// Reject them with [`ShieldError::InvertedBoundary`].
    Strict,
}

/// Validate an IP address string and return the parsed [`Address`].
///
/// # Examples
/// ```
/// use ipshield::validation::{validate_address, Family};
/// assert_eq!(validate_address("10.0.0.1").unwrap().family(), Family::V4);
/// assert_eq!(validate_address("::1").unwrap().value(), 1);
/// assert!(validate_address("0.0.X.0").is_err());
/// ```
pub fn validate_address(candidate: &str) -> Result<Address> {
    let ip: IpAddr = candidate
        .parse()
        .map_err(|_| ShieldError::InvalidAddress(candidate.to_string()))?;
    Ok(Address::from_parsed(candidate, ip))
}

/// Validate a boundary: exactly two elements, each a valid address.
///
/// The element count is checked before any address is parsed.
///
/// # Examples
/// ```
/// use ipshield::validation::validate_boundary;
/// assert!(validate_boundary(&["10.0.1.0", "10.0.1.10"]).is_ok());
/// assert!(validate_boundary(&["10.0.1.0"]).is_err());
/// ```
pub fn validate_boundary<S: AsRef<str>>(pair: &[S]) -> Result<Range> {
    if pair.len() != 2 {
        return Err(ShieldError::InvalidBoundary(pair.len()));
    }

    let low = validate_address(pair[0].as_ref())?;
    let high = validate_address(pair[1].as_ref())?;
    Ok(Range { low, high })
}

/// Validate any untrusted entry.
pub fn validate_entry(entry: &RawEntry) -> Result<Entry> {
    match entry {
        RawEntry::Address(s) => validate_address(s).map(Entry::Address),
        RawEntry::Boundary(pair) => validate_boundary(pair).map(Entry::Range),
        RawEntry::Malformed(value) => validate_value(value),
    }
}

/// Validate a batch, failing on the first bad entry.
pub fn validate_entries(entries: &[RawEntry]) -> Result<Vec<Entry>> {
    entries.iter().map(validate_entry).collect()
}

/// Apply the range ordering policy to an already validated entry.
///
/// Inverted and mixed-family ranges are logged in permissive mode since
/// they can never authorize anything.
pub fn check_range_order(entry: &Entry, order: RangeOrder) -> Result<()> {
    let Entry::Range(range) = entry else {
        return Ok(());
    };

    if range.is_mixed_family() {
        warn!(
            "Range {} mixes {} and {}; it will never match",
            range,
            range.low.family,
            range.high.family
        );
    } else if range.is_inverted() {
        if order == RangeOrder::Strict {
            return Err(ShieldError::InvertedBoundary {
                low: range.low.raw.clone(),
                high: range.high.raw.clone(),
            });
        }
        warn!("Range {} has low > high; it will never match", range);
    }

    Ok(())
}

fn validate_value(value: &Value) -> Result<Entry> {
    match value {
        Value::String(s) => validate_address(s).map(Entry::Address),
        Value::Sequence(items) => {
            if items.len() != 2 {
                return Err(ShieldError::InvalidBoundary(items.len()));
            }
            let low = value_to_address(&items[0])?;
            let high = value_to_address(&items[1])?;
            Ok(Entry::Range(Range { low, high }))
        }
        other => Err(ShieldError::InvalidAddress(describe(other))),
    }
}

fn value_to_address(value: &Value) -> Result<Address> {
    match value.as_str() {
        Some(s) => validate_address(s),
        None => Err(ShieldError::InvalidAddress(describe(value))),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "<none>".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_address_v4_valid() {
        let addr = validate_address("192.168.1.1").unwrap();
        assert_eq!(addr.family(), Family::V4);
        assert_eq!(addr.value(), 0xC0A8_0101);
        assert_eq!(addr.raw(), "192.168.1.1");
    }

    #[test]
    fn test_validate_address_v6_valid() {
        let addr = validate_address("::1").unwrap();
        assert_eq!(addr.family(), Family::V6);
        assert_eq!(addr.value(), 1);
    }

    #[test]
    fn test_validate_address_v6_full() {
        let addr = validate_address("2001:0db8:85a3:0000:0000:8a2e:0370:7334").unwrap();
        assert_eq!(addr.family(), Family::V6);
        assert_eq!(addr.value(), 0x2001_0db8_85a3_0000_0000_8a2e_0370_7334);
    }

    #[test]
    fn test_validate_address_keeps_raw_form() {
        let short = validate_address("2001:db8::1").unwrap();
        let long = validate_address("2001:0db8:0000:0000:0000:0000:0000:0001").unwrap();
        assert_eq!(short.value(), long.value());
        assert_ne!(short.raw(), long.raw());
        assert_ne!(short, long);
    }

    #[test]
    fn test_validate_address_edges() {
        assert_eq!(validate_address("0.0.0.0").unwrap().value(), 0);
        assert_eq!(
            validate_address("255.255.255.255").unwrap().value(),
            u128::from(u32::MAX)
        );
        assert_eq!(
            validate_address("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff")
                .unwrap()
                .value(),
            u128::MAX
        );
    }

    #[test]
    fn test_validate_address_invalid() {
        let err = validate_address("0.0.X.0").unwrap_err();
        assert_eq!(err, ShieldError::InvalidAddress("0.0.X.0".to_string()));
        assert!(err.to_string().contains("Invalid IP"));
    }

    #[test]
    fn test_validate_address_rejects_garbage() {
        assert!(validate_address("").is_err());
        assert!(validate_address("not-an-ip").is_err());
        assert!(validate_address("256.0.0.0").is_err());
        assert!(validate_address("1.2.3").is_err());
        assert!(validate_address(" 10.0.0.1").is_err());
        assert!(validate_address("10.0.0.1\n").is_err());
    }

    #[test]
    fn test_validate_address_rejects_cidr() {
        assert!(validate_address("192.168.1.0/24").is_err());
        assert!(validate_address("2001:db8::/32").is_err());
    }

    #[test]
    fn test_ipv4_mapped_stays_ipv6() {
        let mapped = validate_address("::ffff:10.0.0.1").unwrap();
        assert_eq!(mapped.family(), Family::V6);
    }

    #[test]
    fn test_validate_boundary_valid() {
        let range = validate_boundary(&["10.0.1.0", "10.0.1.10"]).unwrap();
        assert_eq!(range.low().raw(), "10.0.1.0");
        assert_eq!(range.high().raw(), "10.0.1.10");
        assert!(!range.is_inverted());
    }

    #[test]
    fn test_validate_boundary_wrong_length() {
        assert_eq!(
            validate_boundary(&["10.0.0.1"]).unwrap_err(),
            ShieldError::InvalidBoundary(1)
        );
        assert_eq!(
            validate_boundary(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]).unwrap_err(),
            ShieldError::InvalidBoundary(3)
        );
        let empty: [&str; 0] = [];
        assert_eq!(
            validate_boundary(&empty).unwrap_err(),
            ShieldError::InvalidBoundary(0)
        );
    }

    #[test]
    fn test_validate_boundary_length_checked_first() {
        // Shape error wins even when the items are also invalid
        assert_eq!(
            validate_boundary(&["bad"]).unwrap_err(),
            ShieldError::InvalidBoundary(1)
        );
    }

    #[test]
    fn test_validate_boundary_invalid_element() {
        assert_eq!(
            validate_boundary(&["128.0.0.0", "1XX.0.0.5"]).unwrap_err(),
            ShieldError::InvalidAddress("1XX.0.0.5".to_string())
        );
    }

    #[test]
    fn test_validate_boundary_inverted_accepted() {
        let range = validate_boundary(&["10.0.0.9", "10.0.0.1"]).unwrap();
        assert!(range.is_inverted());
    }

    #[test]
    fn test_validate_boundary_mixed_family_accepted() {
        let range = validate_boundary(&["10.0.0.1", "::1"]).unwrap();
        assert!(range.is_mixed_family());
        assert!(!range.is_inverted());
        assert_eq!(Entry::Range(range).family(), None);
    }

    #[test]
    fn test_validate_entry_dispatch() {
        assert!(matches!(
            validate_entry(&"10.0.0.5".into()),
            Ok(Entry::Address(_))
        ));
        assert!(matches!(
            validate_entry(&["10.0.1.0", "10.0.1.10"].into()),
            Ok(Entry::Range(_))
        ));
    }

    #[test]
    fn test_validate_entry_malformed_values() {
        let null = RawEntry::Malformed(Value::Null);
        assert_eq!(
            validate_entry(&null).unwrap_err(),
            ShieldError::InvalidAddress("<none>".to_string())
        );

        let number = RawEntry::Malformed(Value::Number(42u64.into()));
        assert!(matches!(
            validate_entry(&number),
            Err(ShieldError::InvalidAddress(_))
        ));

        let short = RawEntry::Malformed(Value::Sequence(vec![Value::Null]));
        assert_eq!(
            validate_entry(&short).unwrap_err(),
            ShieldError::InvalidBoundary(1)
        );

        let pair = RawEntry::Malformed(Value::Sequence(vec![
            Value::String("10.0.0.1".to_string()),
            Value::Bool(true),
        ]));
        assert_eq!(
            validate_entry(&pair).unwrap_err(),
            ShieldError::InvalidAddress("true".to_string())
        );
    }

    #[test]
    fn test_raw_entry_deserialize_shapes() {
        let yaml = r#"
- "10.0.0.5"
- ["10.0.1.0", "10.0.1.10"]
- ~
- 7
- ["10.0.0.1", 3]
"#;
        let entries: Vec<RawEntry> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(entries[0], RawEntry::Address("10.0.0.5".to_string()));
        assert_eq!(entries[1], RawEntry::from(["10.0.1.0", "10.0.1.10"]));
        assert!(matches!(entries[2], RawEntry::Malformed(Value::Null)));
        assert!(matches!(entries[3], RawEntry::Malformed(Value::Number(_))));
        assert!(matches!(entries[4], RawEntry::Malformed(Value::Sequence(_))));
    }

    #[test]
    fn test_validate_entries_stops_at_first_error() {
        let entries: Vec<RawEntry> = vec!["10.0.0.1".into(), "bad".into(), ["x"].into()];
        assert_eq!(
            validate_entries(&entries).unwrap_err(),
            ShieldError::InvalidAddress("bad".to_string())
        );
    }

    #[test]
    fn test_matches_raw_exact() {
        let addr = validate_entry(&"10.0.0.5".into()).unwrap();
        assert!(addr.matches_raw(&"10.0.0.5".into()));
        assert!(!addr.matches_raw(&"10.0.0.6".into()));
        assert!(!addr.matches_raw(&["10.0.0.5", "10.0.0.5"].into()));

        let range = validate_entry(&["10.0.1.0", "10.0.1.10"].into()).unwrap();
        assert!(range.matches_raw(&["10.0.1.0", "10.0.1.10"].into()));
        assert!(!range.matches_raw(&["10.0.1.10", "10.0.1.0"].into()));
        assert!(!range.matches_raw(&"10.0.1.0".into()));
    }

    #[test]
    fn test_to_raw_roundtrip() {
        let raw: RawEntry = ["10.0.1.0", "10.0.1.10"].into();
        let entry = validate_entry(&raw).unwrap();
        assert_eq!(entry.to_raw(), raw);
        assert!(entry.matches_raw(&entry.to_raw()));
    }

    #[test]
    fn test_check_range_order() {
        let inverted = validate_entry(&["10.0.0.9", "10.0.0.1"].into()).unwrap();
        assert!(check_range_order(&inverted, RangeOrder::Permissive).is_ok());
        assert_eq!(
            check_range_order(&inverted, RangeOrder::Strict).unwrap_err(),
            ShieldError::InvertedBoundary {
                low: "10.0.0.9".to_string(),
                high: "10.0.0.1".to_string(),
            }
        );

        let point = validate_entry(&"10.0.0.1".into()).unwrap();
        assert!(check_range_order(&point, RangeOrder::Strict).is_ok());
    }

    #[test]
    fn test_display() {
        let range = validate_entry(&["10.0.1.0", "10.0.1.10"].into()).unwrap();
        assert_eq!(range.to_string(), "10.0.1.0 - 10.0.1.10");
        assert_eq!(RawEntry::from(["a", "b"]).to_string(), "[a, b]");
        assert_eq!(Family::V6.to_string(), "IPv6");
    }
}
