//! # Network Plan
//!
//! The complete in-memory result of one run. Every enabled stage renders its
//! artifact from the same `OrderedNodes`, so `nodes/node{i}`, alloc entry
//! `i`, validator `i` and static peer `i` always describe one identity.
//!
//! | Stage | Path | Content |
//! |-------|------|---------|
//! | node-keys | `nodes/node{i}/nodekey` | secret hex, no prefix |
//! | node-keys | `nodes/node{i}/pubkey` | `0x` compressed public key |
//! | alloc | `alloc-nodes.json` | tab-indented alloc map |
//! | miner-list | `minerlist.sh` | `miners=(...)` |
//! | extra | `extra.dat` | `0x` extra hex |
//! | static-nodes | `static-nodes.json` | tab-indented enode list |
//! | genesis | `genesis.json` | pretty genesis document |

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::alloc::AllocMap;
use super::errors::MakeupError;
use super::genesis::GenesisDocument;
use super::ordering::OrderedNodes;
use super::topology::PeerRecord;

/// One independently enabled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    NodeKeys,
    Alloc,
    MinerList,
    Extra,
    StaticNodes,
    Genesis,
}

impl Stage {
    /// Every stage, in output order.
    pub const ALL: [Stage; 6] = [
        Stage::NodeKeys,
        Stage::Alloc,
        Stage::MinerList,
        Stage::Extra,
        Stage::StaticNodes,
        Stage::Genesis,
    ];

    /// Kebab-case name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::NodeKeys => "node-keys",
            Stage::Alloc => "alloc",
            Stage::MinerList => "miner-list",
            Stage::Extra => "extra",
            Stage::StaticNodes => "static-nodes",
            Stage::Genesis => "genesis",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown stage '{}'", s))
    }
}

/// Set of enabled stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSet(BTreeSet<Stage>);

impl StageSet {
    /// Every stage enabled.
    pub fn all() -> Self {
        Self(Stage::ALL.into_iter().collect())
    }

    /// Only the given stages.
    pub fn only<I: IntoIterator<Item = Stage>>(stages: I) -> Self {
        Self(stages.into_iter().collect())
    }

    /// Whether `stage` is enabled.
    pub fn contains(&self, stage: Stage) -> bool {
        self.0.contains(&stage)
    }

    /// Enabled stages in output order.
    pub fn iter(&self) -> impl Iterator<Item = Stage> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StageSet {
    fn default() -> Self {
        Self::all()
    }
}

/// One rendered output file.
#[derive(Clone)]
pub struct Artifact {
    /// Path relative to the network directory.
    pub path: PathBuf,
    /// File bytes. Wiped on drop.
    pub contents: Zeroizing<Vec<u8>>,
    /// Holds secret key material.
    pub secret: bool,
}

impl Artifact {
    fn public(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: Zeroizing::new(contents.into()),
            secret: false,
        }
    }

    fn secret(path: impl Into<PathBuf>, contents: &str) -> Self {
        Self {
            path: path.into(),
            contents: Zeroizing::new(contents.as_bytes().to_vec()),
            secret: true,
        }
    }

    /// Contents as UTF-8, if valid.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Artifact");
        s.field("path", &self.path).field("len", &self.contents.len());
        if self.secret {
            s.field("contents", &"[REDACTED]");
        } else {
            s.field("contents", &String::from_utf8_lossy(&self.contents));
        }
        s.finish()
    }
}

/// Everything a run produced. Immutable once built.
#[derive(Debug, Clone)]
pub struct NetworkPlan {
    nodes: OrderedNodes,
    extra_hex: String,
    alloc: AllocMap,
    peers: Vec<PeerRecord>,
    genesis: GenesisDocument,
    miner_list: String,
    artifacts: Vec<Artifact>,
}

/// Intermediate results the plan is rendered from.
#[derive(Debug)]
pub struct PlanParts {
    pub nodes: OrderedNodes,
    pub extra_hex: String,
    pub alloc: AllocMap,
    pub peers: Vec<PeerRecord>,
    pub genesis: GenesisDocument,
    pub miner_list: String,
}

impl NetworkPlan {
    /// Render the artifacts of every enabled stage.
    pub fn render(parts: PlanParts, stages: &StageSet) -> Result<Self, MakeupError> {
        let mut artifacts = Vec::new();

        for stage in stages.iter() {
            match stage {
                Stage::NodeKeys => {
                    for (i, node) in parts.nodes.iter().enumerate() {
                        let dir = PathBuf::from("nodes").join(format!("node{}", i));
                        artifacts.push(Artifact::secret(dir.join("nodekey"), &node.nodekey_hex()));
                        artifacts.push(Artifact::public(dir.join("pubkey"), node.pubkey_hex()));
                    }
                }
                Stage::Alloc => {
                    artifacts.push(Artifact::public(
                        "alloc-nodes.json",
                        to_json_tabbed(&parts.alloc)?,
                    ));
                }
                Stage::MinerList => {
                    artifacts.push(Artifact::public("minerlist.sh", parts.miner_list.clone()));
                }
                Stage::Extra => {
                    artifacts.push(Artifact::public("extra.dat", parts.extra_hex.clone()));
                }
                Stage::StaticNodes => {
                    let urls: Vec<String> = parts.peers.iter().map(PeerRecord::enode_url).collect();
                    artifacts.push(Artifact::public("static-nodes.json", to_json_tabbed(&urls)?));
                }
                Stage::Genesis => {
                    artifacts.push(Artifact::public(
                        "genesis.json",
                        parts.genesis.to_json_pretty()?,
                    ));
                }
            }
        }

        Ok(Self {
            nodes: parts.nodes,
            extra_hex: parts.extra_hex,
            alloc: parts.alloc,
            peers: parts.peers,
            genesis: parts.genesis,
            miner_list: parts.miner_list,
            artifacts,
        })
    }

    pub fn nodes(&self) -> &OrderedNodes {
        &self.nodes
    }

    /// `0x` validator extra hex.
    pub fn extra_hex(&self) -> &str {
        &self.extra_hex
    }

    pub fn alloc(&self) -> &AllocMap {
        &self.alloc
    }

    /// Static peers in ordinal order.
    pub fn peers(&self) -> &[PeerRecord] {
        &self.peers
    }

    pub fn genesis(&self) -> &GenesisDocument {
        &self.genesis
    }

    pub fn miner_list(&self) -> &str {
        &self.miner_list
    }

    /// Rendered files in output order.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Look up a rendered file by relative path.
    pub fn artifact(&self, path: impl AsRef<std::path::Path>) -> Option<&Artifact> {
        let path = path.as_ref();
        self.artifacts.iter().find(|a| a.path == path)
    }
}

/// JSON indented with tabs, as the node tooling expects for alloc and peers.
fn to_json_tabbed<T: Serialize>(value: &T) -> Result<Vec<u8>, MakeupError> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names_roundtrip() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
        }
        assert!("keys".parse::<Stage>().is_err());
    }

    #[test]
    fn test_stage_set_iterates_in_output_order() {
        let set = StageSet::only([Stage::Genesis, Stage::NodeKeys, Stage::Extra]);
        let order: Vec<Stage> = set.iter().collect();
        assert_eq!(order, vec![Stage::NodeKeys, Stage::Extra, Stage::Genesis]);
        assert!(!set.contains(Stage::Alloc));
    }

    #[test]
    fn test_tabbed_json() {
        let urls = vec!["a".to_string(), "b".to_string()];
        let text = String::from_utf8(to_json_tabbed(&urls).unwrap()).unwrap();
        assert_eq!(text, "[\n\t\"a\",\n\t\"b\"\n]");
    }

    #[test]
    fn test_secret_artifact_debug_is_redacted() {
        let artifact = Artifact::secret("nodes/node0/nodekey", "deadbeef");
        let debug = format!("{:?}", artifact);
        assert!(!debug.contains("deadbeef"));
        assert!(debug.contains("REDACTED"));
        assert_eq!(artifact.as_str(), Some("deadbeef"));
    }
}
