//! # Network Makeup Service
//!
//! Wires the domain stages into one pipeline and implements the
//! `NetworkMakeupApi` driving port:
//!
//! ```text
//! KeySource -> generate_identities -> order -> { extra, alloc, miners, peers }
//!           -> compose genesis -> NetworkPlan -> ArtifactWriter
//! ```
//!
//! Cheap configuration checks (node count, machine list, ports, template
//! version) run before the first key is drawn.

use tracing::{debug, info, instrument};

use crate::domain::{
    build_alloc, check_machine_addresses, compose, encode_validators_hex, generate_identities,
    miner_list, order, partition, plan_slots, ConfigError, MakeupConfig, MakeupError,
    NetworkPlan, PlanParts, RunParams,
};
use crate::ports::inbound::NetworkMakeupApi;
use crate::ports::outbound::{ArtifactWriter, KeySource, PublishReceipt};

/// Generation service over a key source.
///
/// # Example
///
/// ```rust,ignore
/// let config = MakeupConfig::load("config.json")?;
/// let mut service = MakeupService::new(config, OsKeySource::new());
/// let mut writer = FsArtifactWriter::new(params.target_dir(), false);
/// let (plan, receipt) = service.run(&params, &mut writer)?;
/// ```
pub struct MakeupService<K: KeySource> {
    config: MakeupConfig,
    keys: K,
}

impl<K: KeySource> MakeupService<K> {
    pub fn new(config: MakeupConfig, keys: K) -> Self {
        Self { config, keys }
    }

    /// Give back the key source.
    pub fn into_key_source(self) -> K {
        self.keys
    }

    fn validate(&self, params: &RunParams) -> Result<(), MakeupError> {
        if params.node_count == 0 {
            return Err(ConfigError::NoNodes.into());
        }
        check_machine_addresses(&self.config.ip_list)?;
        plan_slots(
            params.node_count,
            self.config.ip_list.len(),
            self.config.start_port,
            self.config.remainder_policy,
        )?;
        self.config.chain.validate()?;
        Ok(())
    }
}

impl<K: KeySource> NetworkMakeupApi for MakeupService<K> {
    fn config(&self) -> &MakeupConfig {
        &self.config
    }

    #[instrument(skip_all, fields(nodes = params.node_count, network = %params.network))]
    fn plan(&mut self, params: &RunParams) -> Result<NetworkPlan, MakeupError> {
        self.validate(params)?;

        let identities = generate_identities(&mut self.keys, params.node_count)?;
        let nodes = order(identities);
        debug!(first = ?nodes.get(0).map(|n| n.address()), "Ordered node identities");

        let extra_hex = encode_validators_hex(&nodes.addresses())?;
        let alloc = build_alloc(&nodes, &params.initial_balance);
        let miners = miner_list(&nodes);
        let peers = partition(
            &nodes,
            &self.config.ip_list,
            self.config.start_port,
            self.config.remainder_policy,
        )?;
        let genesis = compose(&self.config.chain, alloc.clone(), &extra_hex)?;

        let plan = NetworkPlan::render(
            PlanParts {
                nodes,
                extra_hex,
                alloc,
                peers,
                genesis,
                miner_list: miners,
            },
            &params.stages,
        )?;

        info!(
            machines = self.config.ip_list.len(),
            artifacts = plan.artifacts().len(),
            "Network plan ready"
        );
        Ok(plan)
    }

    fn run<W: ArtifactWriter + ?Sized>(
        &mut self,
        params: &RunParams,
        writer: &mut W,
    ) -> Result<(NetworkPlan, PublishReceipt), MakeupError> {
        let plan = self.plan(params)?;
        let receipt = writer.publish(plan.artifacts())?;
        Ok((plan, receipt))
    }
}
