//! # Errors
//!
//! Every stage returns `Result<_, MakeupError>`. Nothing is retried and no
//! partial artifact set is ever published; the caller decides whether to halt
//! or report.

use std::path::PathBuf;

use shared_crypto::CryptoError;
use thiserror::Error;

/// Coarse failure taxonomy, one per pipeline concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Secure RNG or curve operation failed.
    KeyGeneration,
    /// Validator list could not be canonically encoded or decoded.
    Encoding,
    /// Configuration is empty, inconsistent or insufficient.
    Config,
    /// Artifact write failed.
    Io,
    /// A composed document could not be serialized.
    Serialization,
}

/// Configuration errors. Counts are always reported with the failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Node count must be at least one.
    #[error("node count must be at least 1")]
    NoNodes,

    /// The machine address list is empty.
    #[error("machine address list is empty (nodes={node_count}, machines=0)")]
    NoMachines {
        /// Requested node count.
        node_count: usize,
    },

    /// Fewer nodes than machines, so some machine would get none.
    #[error(
        "not enough nodes to cover configured machines (nodes={node_count}, machines={machine_count})"
    )]
    InsufficientNodes {
        /// Requested node count.
        node_count: usize,
        /// Configured machine count.
        machine_count: usize,
    },

    /// Node count is not a multiple of the machine count under the reject policy.
    #[error(
        "node count is not a multiple of machine count (nodes={node_count}, machines={machine_count}, remainder={remainder})"
    )]
    UnevenPartition {
        /// Requested node count.
        node_count: usize,
        /// Configured machine count.
        machine_count: usize,
        /// Nodes left over after even division.
        remainder: usize,
    },

    /// Assigned ports would run past 65535.
    #[error("port range overflows: start {start_port} + {ports_needed} ports exceeds 65535")]
    PortOverflow {
        /// Configured start port.
        start_port: u16,
        /// Ports needed on the busiest machine.
        ports_needed: usize,
    },

    /// A machine address entry is blank.
    #[error("machine address at index {index} is empty")]
    EmptyMachineAddress {
        /// Position in the configured list.
        index: usize,
    },

    /// A machine address appears twice, so two nodes would share an endpoint.
    #[error("machine address at index {index} duplicates index {first}")]
    DuplicateMachineAddress {
        /// Position of the repeated entry.
        index: usize,
        /// Position of its first occurrence.
        first: usize,
    },

    /// Chain template version this build does not understand.
    #[error("unsupported chain template version {found} (supported: {supported})")]
    UnsupportedTemplateVersion {
        /// Version found in the configuration.
        found: u32,
        /// Version this build produces.
        supported: u32,
    },

    /// Configuration file could not be parsed.
    #[error("invalid configuration file {path}: {reason}")]
    InvalidFile {
        /// File path.
        path: String,
        /// Parser message.
        reason: String,
    },
}

/// Errors from the generation pipeline.
#[derive(Debug, Error)]
pub enum MakeupError {
    /// Key generation for one node failed.
    #[error("key generation failed for node {index}: {source}")]
    KeyGeneration {
        /// Generation index (pre-ordering).
        index: usize,
        /// Underlying crypto failure.
        #[source]
        source: CryptoError,
    },

    /// Validator set encoding or decoding failed.
    #[error("validator set encoding failed: {0}")]
    Encoding(String),

    /// Invalid or insufficient configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Artifact I/O failed.
    #[error("I/O failure at {}: {source}", path.display())]
    Io {
        /// Path being written or read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Document serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MakeupError {
    /// Taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MakeupError::KeyGeneration { .. } => ErrorKind::KeyGeneration,
            MakeupError::Encoding(_) => ErrorKind::Encoding,
            MakeupError::Config(_) => ErrorKind::Config,
            MakeupError::Io { .. } => ErrorKind::Io,
            MakeupError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MakeupError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_report_counts() {
        let err = MakeupError::from(ConfigError::InsufficientNodes {
            node_count: 1,
            machine_count: 3,
        });
        assert_eq!(err.kind(), ErrorKind::Config);
        let msg = err.to_string();
        assert!(msg.contains("nodes=1"));
        assert!(msg.contains("machines=3"));
    }

    #[test]
    fn test_kind_mapping() {
        let err = MakeupError::KeyGeneration {
            index: 0,
            source: CryptoError::KeyGenerationFailed("rng".into()),
        };
        assert_eq!(err.kind(), ErrorKind::KeyGeneration);
        assert_eq!(
            MakeupError::Encoding("x".into()).kind(),
            ErrorKind::Encoding
        );
        let io = MakeupError::io("/tmp/x", std::io::Error::other("boom"));
        assert_eq!(io.kind(), ErrorKind::Io);
    }
}
