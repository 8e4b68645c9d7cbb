//! # Netgen Core - Permissioned Validator Network Generator
//!
//! Bootstraps a fixed-size HotStuff validator network: generates node
//! identities, orders them canonically, encodes the validator set into
//! genesis extra data, partitions nodes across machines for static peering,
//! and composes the genesis document with its balance allocation.
//!
//! ## Consistency
//!
//! Every artifact is rendered from one `OrderedNodes` value. Position `i` is
//! `nodes/node{i}`, alloc entry `i`, validator `i` in `extraData`, the
//! `i`-th miner and the `i`-th static peer.
//!
//! ## Architecture
//!
//! - **Domain Layer:** ordering, RLP extra encoding, topology, alloc, genesis
//! - **Ports Layer:** `KeySource` and `ArtifactWriter` traits, `NetworkMakeupApi`
//! - **Service Layer:** `MakeupService` wires domain to ports
//! - **Adapters Layer:** OS/seeded key sources, filesystem and memory writers
//!
//! ## Example
//!
//! ```rust
//! use netgen_core::{
//!     MakeupConfig, MakeupService, MemoryArtifactWriter, NetworkMakeupApi, RunParams,
//!     SeededKeySource,
//! };
//!
//! let config = MakeupConfig::parse(r#"{ "ipList": ["10.0.0.1", "10.0.0.2"] }"#).unwrap();
//! let mut service = MakeupService::new(config, SeededKeySource::new(7));
//! let params = RunParams { node_count: 4, ..RunParams::default() };
//!
//! let mut writer = MemoryArtifactWriter::new();
//! let (plan, _receipt) = service.run(&params, &mut writer).unwrap();
//! assert_eq!(plan.peers().len(), 4);
//! assert!(writer.get_str("extra.dat").unwrap().starts_with("0x"));
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{FsArtifactWriter, MemoryArtifactWriter, OsKeySource, SeededKeySource};
pub use domain::{
    build_alloc, compose, decode_validators, decode_validators_hex, encode_validators,
    encode_validators_hex, format_miner_list, generate_identities, miner_list, order, partition,
    AllocEntry, AllocMap, Artifact, ChainTemplate, ConfigError, ErrorKind, GenesisDocument,
    HotstuffExtra, MakeupConfig, MakeupError, NetworkPlan, NodeIdentity, OrderedNodes,
    PeerRecord, RemainderPolicy, RunParams, Stage, StageSet,
};
pub use ports::{ArtifactWriter, KeySource, NetworkMakeupApi, PublishReceipt};
pub use service::MakeupService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
