//! # Validator Set Encoding (HotStuff extra data)
//!
//! The consensus engine seeds its initial validator set from the genesis
//! `extraData` field:
//!
//! ```text
//! extraData = vanity (32 zero bytes)
//!          || RLP([ validators:    [addr_0, addr_1, ...],   // 20-byte strings, ordinal order
//!                   seal:          65 zero bytes,
//!                   committedSeal: [],
//!                   salt:          "" ])
//! ```
//!
//! RLP lengths are self-describing, so any list length fits. Encoding is
//! deterministic: no timestamps or randomness enter the output.

use std::cmp::Ordering;

use rlp::{DecoderError, Rlp, RlpStream};
use shared_crypto::address::ADDRESS_LEN;
use shared_crypto::Address;

use super::errors::MakeupError;

/// Zero-filled prefix reserved for proposer vanity.
pub const VANITY_LEN: usize = 32;

/// Length of the (empty) proposer seal at genesis.
pub const SEAL_LEN: usize = 65;

/// Number of RLP fields after the vanity.
const EXTRA_FIELDS: usize = 4;

/// Decoded HotStuff extra data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotstuffExtra {
    /// Vanity prefix.
    pub vanity: [u8; VANITY_LEN],
    /// Validator addresses in ordinal order.
    pub validators: Vec<Address>,
    /// Proposer seal.
    pub seal: Vec<u8>,
    /// Committed seals.
    pub committed_seal: Vec<Vec<u8>>,
    /// Salt.
    pub salt: Vec<u8>,
}

impl HotstuffExtra {
    /// Genesis extra for a validator list: zero vanity, zero seal, nothing committed.
    pub fn genesis(validators: Vec<Address>) -> Self {
        Self {
            vanity: [0u8; VANITY_LEN],
            validators,
            seal: vec![0u8; SEAL_LEN],
            committed_seal: Vec::new(),
            salt: Vec::new(),
        }
    }

    /// Serialize to raw extra bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut stream = RlpStream::new_list(EXTRA_FIELDS);

        stream.begin_list(self.validators.len());
        for validator in &self.validators {
            stream.append(&validator.as_bytes().to_vec());
        }

        stream.append(&self.seal);

        stream.begin_list(self.committed_seal.len());
        for seal in &self.committed_seal {
            stream.append(seal);
        }

        stream.append(&self.salt);

        let payload = stream.out();
        let mut out = Vec::with_capacity(VANITY_LEN + payload.len());
        out.extend_from_slice(&self.vanity);
        out.extend_from_slice(&payload);
        out
    }

    /// Parse raw extra bytes.
    pub fn from_bytes(extra: &[u8]) -> Result<Self, MakeupError> {
        if extra.len() < VANITY_LEN {
            return Err(MakeupError::Encoding(format!(
                "extra data is {} bytes, shorter than the {}-byte vanity",
                extra.len(),
                VANITY_LEN
            )));
        }
        let (vanity_bytes, payload) = extra.split_at(VANITY_LEN);

        let rlp = Rlp::new(payload);
        let info = match rlp.payload_info() {
            Ok(info) => info,
            Err(DecoderError::RlpIsTooShort) => {
                return Err(MakeupError::Encoding(format!(
                    "extra payload truncated: header declares more than the {} bytes present",
                    payload.len()
                )));
            }
            Err(e) => return Err(rlp_error("payload header", e)),
        };
        match info.total().cmp(&payload.len()) {
            Ordering::Greater => {
                return Err(MakeupError::Encoding(format!(
                    "extra payload truncated: header declares {} bytes, found {}",
                    info.total(),
                    payload.len()
                )));
            }
            Ordering::Less => {
                return Err(MakeupError::Encoding(format!(
                    "{} trailing bytes after extra payload",
                    payload.len() - info.total()
                )));
            }
            Ordering::Equal => {}
        }
        if !rlp.is_list() {
            return Err(MakeupError::Encoding("extra payload must be an RLP list".into()));
        }
        let fields = strict_items(&rlp, "extra payload")?;
        if fields.len() != EXTRA_FIELDS {
            return Err(MakeupError::Encoding(format!(
                "extra payload must have {} fields, got {}",
                EXTRA_FIELDS,
                fields.len()
            )));
        }

        let validators = decode_list(&fields[0], "validators")?
            .into_iter()
            .map(|bytes| {
                Address::from_slice(&bytes).map_err(|e| MakeupError::Encoding(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let seal = decode_data(&fields[1], "seal")?;
        let committed_seal = decode_list(&fields[2], "committed seal")?;
        let salt = decode_data(&fields[3], "salt")?;

        let mut vanity = [0u8; VANITY_LEN];
        vanity.copy_from_slice(vanity_bytes);

        Ok(Self {
            vanity,
            validators,
            seal,
            committed_seal,
            salt,
        })
    }
}

/// Encode an ordered address list into genesis extra bytes.
///
/// Accepts raw byte strings so that callers holding unchecked addresses get
/// an `Encoding` error for any entry that is not exactly 20 bytes. Nothing is
/// emitted on failure.
pub fn encode_validators<A: AsRef<[u8]>>(addresses: &[A]) -> Result<Vec<u8>, MakeupError> {
    let validators = addresses
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let raw = raw.as_ref();
            if raw.len() != ADDRESS_LEN {
                return Err(MakeupError::Encoding(format!(
                    "validator {} is {} bytes, expected {}",
                    i,
                    raw.len(),
                    ADDRESS_LEN
                )));
            }
            Address::from_slice(raw).map_err(|e| MakeupError::Encoding(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HotstuffExtra::genesis(validators).to_bytes())
}

/// Decode the ordered validator list from extra bytes.
pub fn decode_validators(extra: &[u8]) -> Result<Vec<Address>, MakeupError> {
    HotstuffExtra::from_bytes(extra).map(|extra| extra.validators)
}

/// `0x`-prefixed hex form, as embedded in `genesis.json` and `extra.dat`.
pub fn encode_validators_hex<A: AsRef<[u8]>>(addresses: &[A]) -> Result<String, MakeupError> {
    encode_validators(addresses).map(|bytes| format!("0x{}", hex::encode(bytes)))
}

/// Inverse of [`encode_validators_hex`]. Surrounding whitespace is ignored.
pub fn decode_validators_hex(extra_hex: &str) -> Result<Vec<Address>, MakeupError> {
    let trimmed = extra_hex.trim();
    let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(stripped).map_err(|e| MakeupError::Encoding(e.to_string()))?;
    decode_validators(&bytes)
}

fn decode_data(item: &Rlp<'_>, field: &str) -> Result<Vec<u8>, MakeupError> {
    item.as_val::<Vec<u8>>().map_err(|e| rlp_error(field, e))
}

fn decode_list(list: &Rlp<'_>, field: &str) -> Result<Vec<Vec<u8>>, MakeupError> {
    if !list.is_list() {
        return Err(MakeupError::Encoding(format!("{} must be an RLP list", field)));
    }
    strict_items(list, field)?
        .iter()
        .map(|item| decode_data(item, field))
        .collect()
}

/// Items of an RLP list, failing unless they cover its whole payload.
///
/// `Rlp::iter` stops at the first malformed item, which would otherwise
/// yield a shorter list that looks valid.
fn strict_items<'a>(list: &Rlp<'a>, field: &str) -> Result<Vec<Rlp<'a>>, MakeupError> {
    let declared = list
        .payload_info()
        .map_err(|e| rlp_error(field, e))?
        .value_len;
    let items: Vec<Rlp<'a>> = list.iter().collect();
    let mut consumed = 0;
    for item in &items {
        consumed += item.payload_info().map_err(|e| rlp_error(field, e))?.total();
    }
    if consumed != declared {
        return Err(MakeupError::Encoding(format!(
            "{} list is malformed: items cover {} of {} payload bytes",
            field, consumed, declared
        )));
    }
    Ok(items)
}

fn rlp_error(field: &str, error: DecoderError) -> MakeupError {
    MakeupError::Encoding(format!("RLP decode of {} failed: {}", field, error))
}
