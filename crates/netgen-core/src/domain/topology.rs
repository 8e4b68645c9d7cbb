//! # Peer Topology
//!
//! Partitions the ordered node list across machine addresses and assigns
//! discovery ports.
//!
//! ## Algorithm
//!
//! With `n` nodes and `k` machines, `m = n / k` (floor). Node `i` lands on
//! machine `i / m` at port `start_port + i % m`, so every machine hosts a
//! contiguous block of ordinals on ports `[start_port, start_port + m)`.
//!
//! ## Remainders
//!
//! When `k` does not divide `n` the plain formula indexes past the last
//! machine. `RemainderPolicy` makes the behaviour explicit:
//!
//! - `Reject` (default): refuse with `ConfigError::UnevenPartition`.
//! - `LastMachine`: the last machine takes every node from ordinal
//!   `m * (k - 1)` onwards, continuing its own port sequence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared_crypto::NodeId;

use super::errors::{ConfigError, MakeupError};
use super::ordering::OrderedNodes;

/// What to do with nodes left over after even division.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemainderPolicy {
    /// Node count must be an exact multiple of the machine count.
    #[default]
    Reject,
    /// Remainder nodes go to the last machine.
    LastMachine,
}

/// Machine index and port for one ordinal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    /// Index into the machine address list.
    pub machine: usize,
    /// Assigned port.
    pub port: u16,
}

/// Static peer entry for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRecord {
    /// Enode identifier of the node.
    pub node_id: NodeId,
    /// Machine address hosting the node.
    pub ip: String,
    /// Listening port.
    pub port: u16,
}

impl PeerRecord {
    /// `enode://<id>@<ip>:<port>?discport=0`
    ///
    /// UDP discovery is disabled; peers connect only through the static list.
    pub fn enode_url(&self) -> String {
        format!(
            "enode://{}@{}:{}?discport=0",
            self.node_id.to_hex(),
            self.ip,
            self.port
        )
    }
}

/// Compute the slot of every ordinal without touching node identities.
///
/// Fails before anything is assigned if the configuration cannot place every
/// node on a distinct `(machine, port)`.
pub fn plan_slots(
    node_count: usize,
    machine_count: usize,
    start_port: u16,
    policy: RemainderPolicy,
) -> Result<Vec<Slot>, ConfigError> {
    if machine_count == 0 {
        return Err(ConfigError::NoMachines { node_count });
    }
    let per_machine = node_count / machine_count;
    if per_machine == 0 {
        return Err(ConfigError::InsufficientNodes {
            node_count,
            machine_count,
        });
    }

    let remainder = node_count % machine_count;
    if remainder != 0 && policy == RemainderPolicy::Reject {
        return Err(ConfigError::UnevenPartition {
            node_count,
            machine_count,
            remainder,
        });
    }

    let last = machine_count - 1;
    let last_start = per_machine * last;
    let busiest = node_count - last_start;
    if usize::from(start_port) + busiest - 1 > usize::from(u16::MAX) {
        return Err(ConfigError::PortOverflow {
            start_port,
            ports_needed: busiest,
        });
    }

    let slots = (0..node_count)
        .map(|i| {
            let (machine, offset) = if i >= last_start {
                (last, i - last_start)
            } else {
                (i / per_machine, i % per_machine)
            };
            Slot {
                machine,
                // Bounded by the overflow check above
                port: start_port + offset as u16,
            }
        })
        .collect();
    Ok(slots)
}

/// Reject blank or repeated machine addresses.
///
/// Every machine reuses the same port range, so a repeated address would put
/// two nodes on one `(ip, port)` endpoint.
pub fn check_machine_addresses(machines: &[String]) -> Result<(), ConfigError> {
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(machines.len());
    for (index, machine) in machines.iter().enumerate() {
        let address = machine.trim();
        if address.is_empty() {
            return Err(ConfigError::EmptyMachineAddress { index });
        }
        if let Some(&first) = seen.get(address) {
            return Err(ConfigError::DuplicateMachineAddress { index, first });
        }
        seen.insert(address, index);
    }
    Ok(())
}

/// Assign every ordered node to a machine address and port.
pub fn partition(
    nodes: &OrderedNodes,
    machines: &[String],
    start_port: u16,
    policy: RemainderPolicy,
) -> Result<Vec<PeerRecord>, MakeupError> {
    check_machine_addresses(machines)?;

    let slots = plan_slots(nodes.len(), machines.len(), start_port, policy)?;
    Ok(nodes
        .iter()
        .zip(slots)
        .map(|(node, slot)| PeerRecord {
            node_id: node.node_id(),
            ip: machines[slot.machine].clone(),
            port: slot.port,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::key_source::SeededKeySource;
    use crate::domain::identity::generate_identities;
    use crate::domain::ordering::order;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn machines(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_four_nodes_two_machines() {
        let nodes = order(generate_identities(&mut SeededKeySource::new(11), 4).unwrap());
        let ips = machines(&["10.0.0.1", "10.0.0.2"]);
        let peers = partition(&nodes, &ips, 30300, RemainderPolicy::Reject).unwrap();

        let placed: Vec<(&str, u16)> = peers.iter().map(|p| (p.ip.as_str(), p.port)).collect();
        assert_eq!(
            placed,
            vec![
                ("10.0.0.1", 30300),
                ("10.0.0.1", 30301),
                ("10.0.0.2", 30300),
                ("10.0.0.2", 30301),
            ]
        );
        for (i, peer) in peers.iter().enumerate() {
            assert_eq!(peer.node_id, nodes[i].node_id());
        }
    }

    #[test]
    fn test_no_machines_is_config_failure() {
        let err = plan_slots(4, 0, 30300, RemainderPolicy::Reject).unwrap_err();
        assert_eq!(err, ConfigError::NoMachines { node_count: 4 });
    }

    #[test]
    fn test_fewer_nodes_than_machines_is_config_failure() {
        let err = plan_slots(2, 3, 30300, RemainderPolicy::LastMachine).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InsufficientNodes {
                node_count: 2,
                machine_count: 3
            }
        );
    }

    #[test]
    fn test_uneven_rejected_by_default() {
        // 5 nodes on 2 machines: ordinal 4 would compute machine index 2
        let err = plan_slots(5, 2, 30300, RemainderPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnevenPartition {
                node_count: 5,
                machine_count: 2,
                remainder: 1
            }
        );
    }

    #[test]
    fn test_uneven_last_machine_policy() {
        let slots = plan_slots(5, 2, 30300, RemainderPolicy::LastMachine).unwrap();
        let placed: Vec<(usize, u16)> = slots.iter().map(|s| (s.machine, s.port)).collect();
        assert_eq!(
            placed,
            vec![(0, 30300), (0, 30301), (1, 30300), (1, 30301), (1, 30302)]
        );
    }

    #[test]
    fn test_port_overflow_rejected() {
        let err = plan_slots(4, 1, 65534, RemainderPolicy::Reject).unwrap_err();
        assert_eq!(
            err,
            ConfigError::PortOverflow {
                start_port: 65534,
                ports_needed: 4
            }
        );
        assert!(plan_slots(2, 1, 65534, RemainderPolicy::Reject).is_ok());
    }

    #[test]
    fn test_blank_machine_address_rejected() {
        let nodes = order(generate_identities(&mut SeededKeySource::new(2), 2).unwrap());
        let err = partition(&nodes, &machines(&["10.0.0.1", " "]), 30300, RemainderPolicy::Reject)
            .unwrap_err();
        assert!(matches!(
            err,
            MakeupError::Config(ConfigError::EmptyMachineAddress { index: 1 })
        ));
    }

    #[test]
    fn test_repeated_machine_address_rejected() {
        let nodes = order(generate_identities(&mut SeededKeySource::new(2), 4).unwrap());
        let ips = machines(&["10.0.0.1", "10.0.0.1"]);
        let err = partition(&nodes, &ips, 30300, RemainderPolicy::Reject).unwrap_err();
        assert!(matches!(
            err,
            MakeupError::Config(ConfigError::DuplicateMachineAddress { index: 1, first: 0 })
        ));
    }

    #[test]
    fn test_machine_address_check_ignores_padding() {
        let ips = machines(&["10.0.0.1", "10.0.0.2", " 10.0.0.1 "]);
        assert_eq!(
            check_machine_addresses(&ips).unwrap_err(),
            ConfigError::DuplicateMachineAddress { index: 2, first: 0 }
        );
        assert!(check_machine_addresses(&machines(&["10.0.0.1", "10.0.0.2"])).is_ok());
    }

    #[test]
    fn test_enode_url_format() {
        let nodes = order(generate_identities(&mut SeededKeySource::new(5), 1).unwrap());
        let record = PeerRecord {
            node_id: nodes[0].node_id(),
            ip: "192.168.1.7".into(),
            port: 30303,
        };
        let url = record.enode_url();
        assert!(url.starts_with("enode://"));
        assert!(url.ends_with("@192.168.1.7:30303?discport=0"));
        assert_eq!(url.len(), "enode://".len() + 128 + "@192.168.1.7:30303?discport=0".len());
    }

    proptest! {
        #[test]
        fn prop_even_partition_covers_and_is_disjoint(
            per_machine in 1usize..12,
            machine_count in 1usize..8,
            start_port in 1024u16..60000,
        ) {
            let n = per_machine * machine_count;
            let slots = plan_slots(n, machine_count, start_port, RemainderPolicy::Reject).unwrap();
            prop_assert_eq!(slots.len(), n);

            let unique: HashSet<Slot> = slots.iter().copied().collect();
            prop_assert_eq!(unique.len(), n);

            for machine in 0..machine_count {
                let mut ports: Vec<u16> = slots
                    .iter()
                    .filter(|s| s.machine == machine)
                    .map(|s| s.port)
                    .collect();
                ports.sort_unstable();
                let expected: Vec<u16> =
                    (0..per_machine).map(|o| start_port + o as u16).collect();
                prop_assert_eq!(ports, expected);
            }
        }

        #[test]
        fn prop_last_machine_policy_never_overflows_machine_list(
            node_count in 1usize..80,
            machine_count in 1usize..10,
        ) {
            prop_assume!(node_count >= machine_count);
            let slots =
                plan_slots(node_count, machine_count, 30300, RemainderPolicy::LastMachine).unwrap();
            prop_assert!(slots.iter().all(|s| s.machine < machine_count));
            let unique: HashSet<Slot> = slots.iter().copied().collect();
            prop_assert_eq!(unique.len(), node_count);
        }

        #[test]
        fn prop_partition_endpoints_are_unique(
            per_machine in 1usize..5,
            machine_count in 1usize..5,
            seed in any::<u64>(),
        ) {
            let n = per_machine * machine_count;
            let nodes = order(generate_identities(&mut SeededKeySource::new(seed), n).unwrap());
            let ips: Vec<String> =
                (0..machine_count).map(|m| format!("10.0.0.{}", m + 1)).collect();
            let peers = partition(&nodes, &ips, 30300, RemainderPolicy::Reject).unwrap();

            let endpoints: HashSet<(&str, u16)> =
                peers.iter().map(|p| (p.ip.as_str(), p.port)).collect();
            prop_assert_eq!(endpoints.len(), n);
        }
    }
}
