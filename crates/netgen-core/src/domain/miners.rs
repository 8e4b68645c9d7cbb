//! Miner list shell fragment: `miners=(0xAb.. 0xCd..)`, ordinal order,
//! EIP-55 checksummed.

use shared_crypto::Address;

use super::ordering::OrderedNodes;

/// Miner list for the ordered node set.
pub fn miner_list(nodes: &OrderedNodes) -> String {
    format_miner_list(&nodes.addresses())
}

/// Miner list for an explicit address sequence.
pub fn format_miner_list(addresses: &[Address]) -> String {
    let joined = addresses
        .iter()
        .map(Address::to_checksum)
        .collect::<Vec<_>>()
        .join(" ");
    format!("miners=({})", joined)
}
