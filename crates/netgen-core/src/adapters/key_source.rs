//! Key sources: OS entropy for real networks, a seeded CSPRNG for
//! reproducible devnets and tests.

use rand::rngs::StdRng;
use rand::SeedableRng;
use shared_crypto::{CryptoError, Secp256k1KeyPair};

use crate::ports::outbound::KeySource;

/// Draws every key from the operating system RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsKeySource;

impl OsKeySource {
    pub fn new() -> Self {
        Self
    }
}

impl KeySource for OsKeySource {
    fn next_keypair(&mut self) -> Result<Secp256k1KeyPair, CryptoError> {
        Secp256k1KeyPair::generate()
    }
}

/// Deterministic keys from a `u64` seed.
///
/// The same seed always yields the same key sequence. Anyone who knows the
/// seed knows every secret, so this is for devnets only.
#[derive(Debug, Clone)]
pub struct SeededKeySource {
    rng: StdRng,
}

impl SeededKeySource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl KeySource for SeededKeySource {
    fn next_keypair(&mut self) -> Result<Secp256k1KeyPair, CryptoError> {
        Secp256k1KeyPair::generate_with(&mut self.rng)
    }
}
