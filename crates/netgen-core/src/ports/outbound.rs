//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the pipeline requires from its host: a source of secp256k1
//! keys and a sink for the rendered artifact set.

use std::path::PathBuf;

use shared_crypto::{CryptoError, Secp256k1KeyPair};

use crate::domain::{Artifact, MakeupError};

/// Supplies fresh keypairs, one per call.
///
/// Production uses OS randomness. A seeded source makes a devnet
/// reproducible from a single `u64`.
pub trait KeySource {
    /// Next keypair in generation order.
    fn next_keypair(&mut self) -> Result<Secp256k1KeyPair, CryptoError>;
}

/// Publishes a complete artifact set.
///
/// Implementations must be all-or-nothing: on error no artifact from the
/// set may be visible at the destination.
pub trait ArtifactWriter {
    /// Publish every artifact, with paths relative to the destination.
    fn publish(&mut self, artifacts: &[Artifact]) -> Result<PublishReceipt, MakeupError>;
}

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Where the artifacts now live.
    pub location: PathBuf,
    /// Number of files written.
    pub files: usize,
    /// Total bytes written.
    pub bytes: usize,
}
