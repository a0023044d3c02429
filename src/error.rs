//! Error types for mainstreet.

use thiserror::Error;

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by verification, lookups and configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or fixture file could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Lookup gateway failed (transport, decoding, upstream error).
    ///
    /// The verifier treats this as "no result".
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// Backend answered outside its documented contract.
    #[error("backend contract violation: {0}")]
    Contract(#[from] ContractViolation),
}

impl Error {
    /// Returns true if this error signals that a backend broke its
    /// contract with us. These must reach the caller, never be swallowed.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Contract(_))
    }
}

/// A validation backend answer that cannot be classified.
///
/// Seeing one of these means the backend changed; it needs a code change,
/// not a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// Unrecognized `verification_status`.
    #[error("unknown verification_status: {0}")]
    UnknownVerificationStatus(String),

    /// Unrecognized `dpv_match_code`.
    #[error("unknown dpv_match_code: {0}")]
    UnknownMatchCode(String),

    /// Neither `verification_status` nor `dpv_match_code` was sent.
    #[error("analysis has neither verification_status nor dpv_match_code")]
    MissingAnalysis,
}
