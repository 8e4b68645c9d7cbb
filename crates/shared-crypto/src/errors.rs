//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key (zero, or not below the curve order)
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Key generation failed
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Address bytes have the wrong width
    #[error("Invalid address length: expected {expected}, got {actual}")]
    InvalidAddressLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Malformed hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}
