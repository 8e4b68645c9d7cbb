//! # secp256k1 Node Identities
//!
//! Keypairs for validator nodes on the secp256k1 curve.
//!
//! ## Derived identifiers
//!
//! All of these are pure functions of the secret scalar:
//!
//! - **Compressed public key** (33 bytes, `0x02`/`0x03` prefix), stored as
//!   `publicKey` in genesis alloc entries
//! - **Address** (20 bytes), `keccak256(x || y)[12..]`
//! - **NodeId** (64 bytes), `x || y`, the enode identifier used by peer
//!   discovery
//!
//! ## Key generation
//!
//! Secret scalars are read from a caller-supplied `CryptoRng`. A scalar
//! outside `[1, n-1]` or an RNG failure is reported as
//! `CryptoError::KeyGenerationFailed`; nothing is retried.

use std::fmt;

use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::address::Address;
use crate::hashing::keccak256;
use crate::CryptoError;

/// Length of a compressed SEC1 public key.
pub const COMPRESSED_PUBKEY_LEN: usize = 33;

/// Length of a node identifier (uncompressed point without the 0x04 tag).
pub const NODE_ID_LEN: usize = 64;

/// 64-byte enode identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId([u8; NODE_ID_LEN]);

impl NodeId {
    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; NODE_ID_LEN] {
        &self.0
    }

    /// Lowercase hex without prefix, the form used in enode URLs.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}..)", &self.to_hex()[..16])
    }
}

/// secp256k1 public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Secp256k1PublicKey(VerifyingKey);

impl Secp256k1PublicKey {
    /// Parse from SEC1 bytes (compressed or uncompressed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Compressed SEC1 encoding (33 bytes).
    pub fn to_compressed(&self) -> [u8; COMPRESSED_PUBKEY_LEN] {
        let point = self.0.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_PUBKEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// `0x`-prefixed hex of the compressed encoding.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_compressed()))
    }

    /// Enode identifier: the uncompressed point without its 0x04 tag.
    pub fn node_id(&self) -> NodeId {
        let point = self.0.to_encoded_point(false);
        let mut id = [0u8; NODE_ID_LEN];
        id.copy_from_slice(&point.as_bytes()[1..]);
        NodeId(id)
    }

    /// Derive the account address.
    pub fn address(&self) -> Address {
        let hash = keccak256(self.node_id().as_bytes());
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        Address::from_bytes(address)
    }
}

/// secp256k1 keypair.
///
/// The inner `SigningKey` zeroizes its scalar on drop.
#[derive(Clone)]
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate a keypair from operating-system randomness.
    pub fn generate() -> Result<Self, CryptoError> {
        Self::generate_with(&mut OsRng)
    }

    /// Generate a keypair from the given CSPRNG.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, CryptoError> {
        let mut secret = Zeroizing::new([0u8; 32]);
        rng.try_fill_bytes(&mut secret[..])
            .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;

        let signing_key = SigningKey::from_bytes((&*secret).into()).map_err(|_| {
            CryptoError::KeyGenerationFailed("scalar outside curve order".to_string())
        })?;
        Ok(Self { signing_key })
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Parse a secret key from hex, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let stripped = s.trim().strip_prefix("0x").unwrap_or(s.trim());
        let decoded = Zeroizing::new(
            hex::decode(stripped).map_err(|e| CryptoError::InvalidHex(e.to_string()))?,
        );
        let bytes: [u8; 32] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidPrivateKey)?;
        Self::from_bytes(bytes)
    }

    /// Public half.
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey(self.signing_key.verifying_key().clone())
    }

    /// Secret key bytes (for serialization).
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes().into())
    }

    /// Secret key as lowercase hex without prefix (the `nodekey` file format).
    pub fn secret_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&*self.to_bytes()))
    }
}

impl fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}
