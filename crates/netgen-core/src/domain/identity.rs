//! # Node Identities
//!
//! A node identity bundles a secp256k1 keypair with every identifier derived
//! from it. All derived fields are computed once at construction.

use shared_crypto::{Address, NodeId, Secp256k1KeyPair, Secp256k1PublicKey};
use tracing::debug;
use zeroize::Zeroizing;

use super::errors::MakeupError;
use crate::ports::outbound::KeySource;

/// One validator node.
#[derive(Debug, Clone)]
pub struct NodeIdentity {
    keypair: Secp256k1KeyPair,
    public_key: Secp256k1PublicKey,
    address: Address,
    node_id: NodeId,
}

impl NodeIdentity {
    /// Derive all identifiers from a keypair.
    pub fn from_keypair(keypair: Secp256k1KeyPair) -> Self {
        let public_key = keypair.public_key();
        Self {
            address: public_key.address(),
            node_id: public_key.node_id(),
            public_key,
            keypair,
        }
    }

    /// Account address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Enode identifier.
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Public key.
    pub fn public_key(&self) -> &Secp256k1PublicKey {
        &self.public_key
    }

    /// Contents of the `nodekey` file: secret hex, no prefix.
    pub fn nodekey_hex(&self) -> Zeroizing<String> {
        self.keypair.secret_hex()
    }

    /// Contents of the `pubkey` file and the alloc `publicKey` field.
    pub fn pubkey_hex(&self) -> String {
        self.public_key.to_hex()
    }
}

/// Generate `count` identities in generation order.
///
/// The first failing key aborts the whole batch.
pub fn generate_identities<K>(
    source: &mut K,
    count: usize,
) -> Result<Vec<NodeIdentity>, MakeupError>
where
    K: KeySource + ?Sized,
{
    let mut identities = Vec::with_capacity(count);
    for index in 0..count {
        let keypair = source
            .next_keypair()
            .map_err(|source| MakeupError::KeyGeneration { index, source })?;
        let identity = NodeIdentity::from_keypair(keypair);
        debug!(index, address = %identity.address(), "Generated node identity");
        identities.push(identity);
    }
    Ok(identities)
}
