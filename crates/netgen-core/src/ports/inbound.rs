//! # Driving Port (Inbound API)

use crate::domain::{MakeupConfig, MakeupError, NetworkPlan, RunParams};
use crate::ports::outbound::{ArtifactWriter, PublishReceipt};

/// Generation API exposed to the command line and to tests.
///
/// # Example
///
/// ```rust,ignore
/// use netgen_core::{MakeupService, SeededKeySource, MemoryArtifactWriter};
///
/// let mut service = MakeupService::new(config, SeededKeySource::new(7));
/// let plan = service.plan(&params)?;
/// println!("{}", plan.miner_list());
/// ```
pub trait NetworkMakeupApi {
    /// Active configuration.
    fn config(&self) -> &MakeupConfig;

    /// Build the complete artifact set in memory.
    ///
    /// Configuration is validated before any key is generated.
    fn plan(&mut self, params: &RunParams) -> Result<NetworkPlan, MakeupError>;

    /// Build the artifact set and publish it through `writer`.
    ///
    /// Nothing is published unless every stage succeeded.
    fn run<W: ArtifactWriter + ?Sized>(
        &mut self,
        params: &RunParams,
        writer: &mut W,
    ) -> Result<(NetworkPlan, PublishReceipt), MakeupError>;
}
