//! CLI command implementations.

pub mod allowlist;
pub mod check;
pub mod init;
pub mod validate;
