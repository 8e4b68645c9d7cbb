//! # Shared Crypto - Node Identity Primitives
//!
//! **Status:** Production
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `ecdsa` | secp256k1 | Node keypairs, enode identifiers |
//! | `hashing` | Keccak-256 | Address derivation, EIP-55 checksums |
//! | `address` | 20-byte account address | Validator lists, genesis alloc |
//!
//! ## Security Properties
//!
//! - Secret scalars are drawn from a caller-supplied CSPRNG and rejected if
//!   they fall outside `[1, n-1]`
//! - Secret key bytes are zeroized when a keypair is dropped
//! - Addresses follow the Ethereum derivation: last 20 bytes of
//!   `keccak256(uncompressed_pubkey[1..])`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod ecdsa;
pub mod errors;
pub mod hashing;

// Re-exports
pub use address::Address;
pub use ecdsa::{NodeId, Secp256k1KeyPair, Secp256k1PublicKey};
pub use errors::CryptoError;
pub use hashing::{keccak256, Hash};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
