//! # Domain Layer
//!
//! Pure generation logic. No filesystem or entropy access happens here; keys
//! come in through `KeySource` and artifacts leave as an in-memory
//! `NetworkPlan`.

pub mod alloc;
pub mod config;
pub mod errors;
pub mod extra;
pub mod genesis;
pub mod identity;
pub mod miners;
pub mod ordering;
pub mod plan;
pub mod topology;

pub use alloc::{build_alloc, AllocEntry, AllocMap};
pub use config::{MakeupConfig, RunParams, DEFAULT_NODE_COUNT, DEFAULT_START_PORT};
pub use errors::{ConfigError, ErrorKind, MakeupError};
pub use extra::{
    decode_validators, decode_validators_hex, encode_validators, encode_validators_hex,
    HotstuffExtra, SEAL_LEN, VANITY_LEN,
};
pub use genesis::{
    compose, ChainConfig, ChainTemplate, ForkSchedule, GenesisDocument, HotStuffParams, H256,
    TEMPLATE_VERSION,
};
pub use identity::{generate_identities, NodeIdentity};
pub use miners::{format_miner_list, miner_list};
pub use ordering::{order, sort_by_address, OrderedNodes};
pub use plan::{Artifact, NetworkPlan, PlanParts, Stage, StageSet};
pub use topology::{
    check_machine_addresses, partition, plan_slots, PeerRecord, RemainderPolicy, Slot,
};
