//! # IPShield - IP Address Allow-List Authorization
//!
//! Maintains a dynamic allow-list of single addresses and inclusive address
//! ranges, validates untrusted address strings, and answers "is this address
//! authorized?" for both IPv4 and IPv6.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        IPShield                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: init, check, validate, allowlist           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── Allowlist entries, range ordering policy             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Guard                                                      │
//! │    └── Request adapter: client address -> allow / deny      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Registry (RwLock + copy-on-write snapshots)                │
//! │    ├── add / remove / initialize                            │
//! │    └── authorize ──► Membership (points, then ranges)       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Validation                                                 │
//! │    └── IPv4/IPv6 parsing, two-element boundaries            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use ipshield::registry::Registry;
//! use ipshield::validation::RawEntry;
//!
//! let registry = Registry::new();
//! let entries: Vec<RawEntry> = vec!["10.0.0.5".into(), ["10.0.1.0", "10.0.1.10"].into()];
//! registry.initialize(&entries)?;
//!
//! assert!(registry.authorize("10.0.0.5")?);
//! assert!(registry.authorize("10.0.1.5")?);
//! assert!(!registry.authorize("10.0.2.1")?);
//! assert!(registry.authorize("not-an-ip").is_err());
//!
//! registry.remove(&"10.0.0.5".into())?;
//! assert!(!registry.authorize("10.0.0.5")?);
//! # Ok::<(), ipshield::error::ShieldError>(())
//! ```
//!
//! ## Modules
//!
//! - [`validation`] - Address and boundary validation
//! - [`membership`] - Point and range matching
//! - [`registry`] - The shared allow-list
//! - [`guard`] - Request adapter helpers
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Error types
//! - [`lock`] - Config file locking
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod guard;
pub mod lock;
pub mod membership;
pub mod registry;
pub mod validation;

pub use cli::{AllowlistAction, Cli, Commands};
pub use config::Config;
pub use error::ShieldError;
pub use guard::{ClientAddress, Decision, Guard};
pub use registry::Registry;
pub use validation::{Entry, RawEntry};
