//! # Ports Layer
//!
//! - **Driving Port (Inbound):** the generation API the CLI calls.
//! - **Driven Ports (Outbound):** entropy in, artifacts out.

pub mod inbound;
pub mod outbound;

pub use inbound::NetworkMakeupApi;
pub use outbound::{ArtifactWriter, KeySource, PublishReceipt};
