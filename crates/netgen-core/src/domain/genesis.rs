//! # Genesis Composition
//!
//! Merges a typed, versioned chain template with the computed `alloc` and
//! `extraData` fields.
//!
//! ## Template (version 1)
//!
//! | Field | Default |
//! |-------|---------|
//! | chainId | 60801 |
//! | fork blocks (homestead .. london) | 0 |
//! | hotstuff.protocol | `basic` |
//! | coinbase | zero address |
//! | difficulty | `0x1` |
//! | gasLimit | `0xffffffff` |
//! | nonce | `0x4510809143055965` |
//! | mixhash, parentHash | 32 zero bytes |
//! | timestamp | `0x00` |
//!
//! Quantities are rendered as `0x` hex strings by the composer, never by
//! string templating, so computed fields cannot drift from the template.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shared_crypto::Address;

use super::alloc::AllocMap;
use super::errors::{ConfigError, MakeupError};

/// Template version produced and accepted by this build.
pub const TEMPLATE_VERSION: u32 = 1;

/// 32-byte hash rendered as `0x` hex.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct H256(pub [u8; 32]);

impl H256 {
    /// All-zero hash.
    pub const ZERO: H256 = H256([0u8; 32]);
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self)
    }
}

impl Serialize for H256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for H256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(stripped).map_err(serde::de::Error::custom)?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))?;
        Ok(H256(array))
    }
}

/// Fork activation heights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkSchedule {
    pub homestead_block: u64,
    pub eip150_block: u64,
    pub eip155_block: u64,
    pub eip158_block: u64,
    pub byzantium_block: u64,
    pub constantinople_block: u64,
    pub petersburg_block: u64,
    pub istanbul_block: u64,
    pub berlin_block: u64,
    pub london_block: u64,
}

impl ForkSchedule {
    /// Every fork active from block 0.
    pub fn all_at_genesis() -> Self {
        Self {
            homestead_block: 0,
            eip150_block: 0,
            eip155_block: 0,
            eip158_block: 0,
            byzantium_block: 0,
            constantinople_block: 0,
            petersburg_block: 0,
            istanbul_block: 0,
            berlin_block: 0,
            london_block: 0,
        }
    }
}

impl Default for ForkSchedule {
    fn default() -> Self {
        Self::all_at_genesis()
    }
}

/// HotStuff consensus parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotStuffParams {
    /// Protocol variant tag.
    pub protocol: String,
}

impl Default for HotStuffParams {
    fn default() -> Self {
        Self {
            protocol: "basic".to_string(),
        }
    }
}

/// Fixed chain parameters merged into every genesis document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChainTemplate {
    /// Template schema version.
    pub version: u32,
    pub chain_id: u64,
    pub forks: ForkSchedule,
    pub hotstuff: HotStuffParams,
    pub coinbase: Address,
    pub difficulty: u64,
    pub gas_limit: u64,
    pub nonce: u64,
    pub mix_hash: H256,
    pub parent_hash: H256,
    pub timestamp: u64,
}

impl Default for ChainTemplate {
    fn default() -> Self {
        Self {
            version: TEMPLATE_VERSION,
            chain_id: 60801,
            forks: ForkSchedule::all_at_genesis(),
            hotstuff: HotStuffParams::default(),
            coinbase: Address::ZERO,
            difficulty: 1,
            gas_limit: 0xffff_ffff,
            nonce: 0x4510_8091_4305_5965,
            mix_hash: H256::ZERO,
            parent_hash: H256::ZERO,
            timestamp: 0,
        }
    }
}

impl ChainTemplate {
    /// Reject templates written for another schema version.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != TEMPLATE_VERSION {
            return Err(ConfigError::UnsupportedTemplateVersion {
                found: self.version,
                supported: TEMPLATE_VERSION,
            });
        }
        Ok(())
    }
}

/// `config` section of the genesis document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub chain_id: u64,
    #[serde(flatten)]
    pub forks: ForkSchedule,
    pub hotstuff: HotStuffParams,
}

/// The composed genesis document. Field order matches the serialized output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisDocument {
    pub config: ChainConfig,
    pub alloc: AllocMap,
    pub coinbase: Address,
    pub difficulty: String,
    pub extra_data: String,
    pub gas_limit: String,
    pub nonce: String,
    #[serde(rename = "mixhash")]
    pub mix_hash: H256,
    pub parent_hash: H256,
    pub timestamp: String,
}

impl GenesisDocument {
    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, MakeupError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Compose the genesis document.
pub fn compose(
    template: &ChainTemplate,
    alloc: AllocMap,
    extra_data_hex: &str,
) -> Result<GenesisDocument, MakeupError> {
    template.validate()?;

    Ok(GenesisDocument {
        config: ChainConfig {
            chain_id: template.chain_id,
            forks: template.forks.clone(),
            hotstuff: template.hotstuff.clone(),
        },
        alloc,
        coinbase: template.coinbase,
        difficulty: quantity(template.difficulty),
        extra_data: extra_data_hex.to_string(),
        gas_limit: quantity(template.gas_limit),
        nonce: quantity(template.nonce),
        mix_hash: template.mix_hash,
        parent_hash: template.parent_hash,
        timestamp: format!("{:#04x}", template.timestamp),
    })
}

fn quantity(value: u64) -> String {
    format!("{:#x}", value)
}
