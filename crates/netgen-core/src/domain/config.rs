//! # Configuration
//!
//! ## File Format (JSON)
//!
//! ```json
//! {
//!     "ipList": ["10.0.0.1", "10.0.0.2"],
//!     "startPort": 30300,
//!     "remainderPolicy": "reject",
//!     "chain": { "chainId": 60801 }
//! }
//! ```
//!
//! `IpList` and `StartPort` are accepted as aliases. Every field except
//! `ipList` has a default; `chain` falls back to the version 1 template.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, MakeupError};
use super::genesis::ChainTemplate;
use super::plan::StageSet;
use super::topology::RemainderPolicy;

/// Default first discovery port on every machine.
pub const DEFAULT_START_PORT: u16 = 30300;

/// Default node count when none is requested.
pub const DEFAULT_NODE_COUNT: usize = 7;

fn default_start_port() -> u16 {
    DEFAULT_START_PORT
}

/// Machine layout and chain parameters, loaded from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeupConfig {
    /// Machine addresses, in assignment order.
    #[serde(alias = "IpList")]
    pub ip_list: Vec<String>,

    /// First port on each machine.
    #[serde(alias = "StartPort", default = "default_start_port")]
    pub start_port: u16,

    /// Handling of nodes left over after even division.
    #[serde(default)]
    pub remainder_policy: RemainderPolicy,

    /// Chain template merged into `genesis.json`.
    #[serde(default)]
    pub chain: ChainTemplate,
}

impl Default for MakeupConfig {
    fn default() -> Self {
        Self {
            ip_list: Vec::new(),
            start_port: DEFAULT_START_PORT,
            remainder_policy: RemainderPolicy::default(),
            chain: ChainTemplate::default(),
        }
    }
}

impl MakeupConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Config` if it cannot be parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MakeupError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| MakeupError::io(path, e))?;
        Self::parse(&content).map_err(|e| match e {
            ConfigError::InvalidFile { reason, .. } => ConfigError::InvalidFile {
                path: path.display().to_string(),
                reason,
            }
            .into(),
            other => other.into(),
        })
    }

    /// Parse configuration from a JSON string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: MakeupConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::InvalidFile {
                path: "<inline>".to_string(),
                reason: e.to_string(),
            })?;
        config.chain.validate()?;
        Ok(config)
    }
}

/// Per-run parameters supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    /// Number of validator nodes to generate.
    pub node_count: usize,
    /// Balance string copied into every alloc entry.
    pub initial_balance: String,
    /// Root output directory.
    pub output_dir: PathBuf,
    /// Network name; artifacts land in `output_dir/network`.
    pub network: String,
    /// Artifacts to produce.
    pub stages: StageSet,
}

impl RunParams {
    /// Directory the artifact set is published to.
    pub fn target_dir(&self) -> PathBuf {
        self.output_dir.join(&self.network)
    }
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            node_count: DEFAULT_NODE_COUNT,
            initial_balance: "0".to_string(),
            output_dir: PathBuf::from("build"),
            network: "devnet".to_string(),
            stages: StageSet::all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_minimal() {
        let config = MakeupConfig::parse(r#"{ "ipList": ["10.0.0.1"] }"#).unwrap();
        assert_eq!(config.ip_list, vec!["10.0.0.1".to_string()]);
        assert_eq!(config.start_port, DEFAULT_START_PORT);
        assert_eq!(config.remainder_policy, RemainderPolicy::Reject);
        assert_eq!(config.chain, ChainTemplate::default());
    }

    #[test]
    fn test_parse_legacy_keys() {
        let config =
            MakeupConfig::parse(r#"{ "IpList": ["a", "b"], "StartPort": 40000 }"#).unwrap();
        assert_eq!(config.ip_list.len(), 2);
        assert_eq!(config.start_port, 40000);
    }

    #[test]
    fn test_parse_policy_and_chain() {
        let config = MakeupConfig::parse(
            r#"{
                "ipList": ["a"],
                "remainderPolicy": "last-machine",
                "chain": { "chainId": 5 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.remainder_policy, RemainderPolicy::LastMachine);
        assert_eq!(config.chain.chain_id, 5);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let err = MakeupConfig::parse("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFile { .. }));
    }

    #[test]
    fn test_parse_rejects_future_template() {
        let err =
            MakeupConfig::parse(r#"{ "ipList": ["a"], "chain": { "version": 9 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedTemplateVersion { found: 9, .. }
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "ipList": ["127.0.0.1"], "startPort": 31000 }}"#).unwrap();
        let config = MakeupConfig::load(file.path()).unwrap();
        assert_eq!(config.start_port, 31000);
    }

    #[test]
    fn test_load_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let err = MakeupConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_load_missing_file_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = MakeupConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.kind(), crate::domain::errors::ErrorKind::Io);
    }

    #[test]
    fn test_target_dir() {
        let params = RunParams {
            output_dir: PathBuf::from("out"),
            network: "testnet".into(),
            ..RunParams::default()
        };
        assert_eq!(params.target_dir(), PathBuf::from("out").join("testnet"));
    }
}
