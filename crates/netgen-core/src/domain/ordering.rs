//! # Deterministic Ordering
//!
//! Imposes the canonical node order that every artifact indexes into.
//!
//! Nodes are sorted ascending by the canonical (lowercase `0x`) hex of their
//! address with a stable sort. Position `i` in the result is "node{i}" in the
//! key directories, the alloc map, the validator list and the static peer
//! list. `OrderedNodes` can only be built here, so downstream stages cannot
//! be handed an unsorted list.

use std::ops::Index;

use shared_crypto::Address;

use super::identity::NodeIdentity;

/// Identities in canonical order. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct OrderedNodes(Vec<NodeIdentity>);

impl OrderedNodes {
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Node at ordinal position `index`.
    pub fn get(&self, index: usize) -> Option<&NodeIdentity> {
        self.0.get(index)
    }

    /// Iterate in ordinal order.
    pub fn iter(&self) -> std::slice::Iter<'_, NodeIdentity> {
        self.0.iter()
    }

    /// Addresses in ordinal order (the validator list).
    pub fn addresses(&self) -> Vec<Address> {
        self.0.iter().map(NodeIdentity::address).collect()
    }

    /// Give back the underlying list.
    pub fn into_inner(self) -> Vec<NodeIdentity> {
        self.0
    }
}

impl Index<usize> for OrderedNodes {
    type Output = NodeIdentity;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a OrderedNodes {
    type Item = &'a NodeIdentity;
    type IntoIter = std::slice::Iter<'a, NodeIdentity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Sort any list of items by the canonical hex of an address key.
///
/// Stable: items with equal keys keep their input order.
pub fn sort_by_address<T, F>(items: &mut [T], address_of: F)
where
    F: Fn(&T) -> Address,
{
    items.sort_by_cached_key(|item| address_of(item).to_hex());
}

/// Impose the canonical order on a set of identities.
pub fn order(mut identities: Vec<NodeIdentity>) -> OrderedNodes {
    sort_by_address(&mut identities, NodeIdentity::address);
    OrderedNodes(identities)
}
