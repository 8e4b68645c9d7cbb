//! # Genesis Allocation
//!
//! Address → {publicKey, balance}. The balance is opaque text and is never
//! parsed, so arbitrarily large decimal values pass through unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ordering::OrderedNodes;

/// Allocation entry for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocEntry {
    /// `0x`-prefixed compressed public key.
    #[serde(rename = "publicKey")]
    pub public_key: String,
    /// Initial balance, verbatim.
    pub balance: String,
}

/// Keyed by canonical lowercase address hex, which iterates in ordinal order.
pub type AllocMap = BTreeMap<String, AllocEntry>;

/// Build the allocation map; every node receives `initial_balance`.
pub fn build_alloc(nodes: &OrderedNodes, initial_balance: &str) -> AllocMap {
    nodes
        .iter()
        .map(|node| {
            (
                node.address().to_hex(),
                AllocEntry {
                    public_key: node.pubkey_hex(),
                    balance: initial_balance.to_string(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::key_source::SeededKeySource;
    use crate::domain::identity::generate_identities;
    use crate::domain::ordering::order;

    #[test]
    fn test_one_entry_per_node_with_same_balance() {
        let nodes = order(generate_identities(&mut SeededKeySource::new(21), 7).unwrap());
        let balance = "100000000000000000000000000000";
        let alloc = build_alloc(&nodes, balance);

        assert_eq!(alloc.len(), 7);
        assert!(alloc.values().all(|entry| entry.balance == balance));
    }

    #[test]
    fn test_iteration_follows_ordinal_order() {
        let nodes = order(generate_identities(&mut SeededKeySource::new(22), 6).unwrap());
        let alloc = build_alloc(&nodes, "1");

        for (i, (address, entry)) in alloc.iter().enumerate() {
            assert_eq!(address, &nodes[i].address().to_hex());
            assert_eq!(entry.public_key, nodes[i].pubkey_hex());
        }
    }

    #[test]
    fn test_balance_is_not_interpreted() {
        let nodes = order(generate_identities(&mut SeededKeySource::new(23), 1).unwrap());
        let alloc = build_alloc(&nodes, "not-a-number");
        assert_eq!(alloc.values().next().unwrap().balance, "not-a-number");
    }

    #[test]
    fn test_json_field_names() {
        let entry = AllocEntry {
            public_key: "0x02ab".into(),
            balance: "5".into(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"publicKey":"0x02ab","balance":"5"}"#);
    }
}
