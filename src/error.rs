//! Error types for IPShield.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShieldError {
    #[error("Invalid IP address: {0}. IP must be a valid IPv4 or IPv6")]
    InvalidAddress(String),

    #[error("Invalid IP boundary: got {0} element(s), expected 2 (low and high)")]
    InvalidBoundary(usize),

    #[error("Inverted IP boundary: low {low} is greater than high {high}")]
    InvertedBoundary { low: String, high: String },

    #[error("Not found: {0} is not within the authorized list")]
    NotFound(String),

    #[error("No IP address provided")]
    NoAddresses,

    #[error("Client IP address not found in request")]
    AddressMissing,

    #[error("Unauthorized: the request IP {0} is not authorized")]
    Unauthorized(String),
}

pub type Result<T> = std::result::Result<T, ShieldError>;
