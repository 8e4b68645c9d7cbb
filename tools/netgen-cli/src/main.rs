//! netgen: HotStuff validator network generator
//!
//! ```text
//! netgen generate --nodes 4 --config config.json --output build --network devnet
//! netgen inspect-extra build/devnet/extra.dat
//! ```

mod logging;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use netgen_core::domain::DEFAULT_NODE_COUNT;
use netgen_core::{
    decode_validators_hex, format_miner_list, FsArtifactWriter, KeySource, MakeupConfig,
    MakeupService, NetworkMakeupApi, OsKeySource, RemainderPolicy, RunParams, SeededKeySource,
    Stage, StageSet,
};

use crate::logging::LogFormat;

const DEFAULT_BALANCE: &str = "100000000000000000000000000000";

/// netgen: generate keys, static peers and genesis for a validator network
#[derive(Parser, Debug)]
#[command(name = "netgen", version)]
#[command(about = "Generate node keys, static peers and genesis for a HotStuff validator network")]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a complete network directory
    Generate(GenerateArgs),
    /// Decode an extra.dat file and print its validator list
    InspectExtra {
        /// Path to a file holding 0x-prefixed extra hex
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of validator nodes
    #[arg(short, long, default_value_t = DEFAULT_NODE_COUNT)]
    nodes: usize,

    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Initial balance of every validator account, copied verbatim
    #[arg(long, default_value = DEFAULT_BALANCE)]
    balance: String,

    /// Root output directory
    #[arg(short, long, default_value = "build")]
    output: PathBuf,

    /// Network name; artifacts go to <output>/<network>
    #[arg(long, default_value = "devnet")]
    network: String,

    /// Derive keys from this seed instead of OS entropy (devnets only)
    #[arg(long)]
    seed: Option<u64>,

    /// Comma-separated stages to run (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    stages: Vec<StageArg>,

    /// Override the remainder policy from the configuration file
    #[arg(long, value_enum)]
    remainder_policy: Option<PolicyArg>,

    /// Replace an existing network directory
    #[arg(long)]
    force: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StageArg {
    NodeKeys,
    Alloc,
    MinerList,
    Extra,
    StaticNodes,
    Genesis,
}

impl From<StageArg> for Stage {
    fn from(arg: StageArg) -> Self {
        match arg {
            StageArg::NodeKeys => Stage::NodeKeys,
            StageArg::Alloc => Stage::Alloc,
            StageArg::MinerList => Stage::MinerList,
            StageArg::Extra => Stage::Extra,
            StageArg::StaticNodes => Stage::StaticNodes,
            StageArg::Genesis => Stage::Genesis,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Reject,
    LastMachine,
}

impl From<PolicyArg> for RemainderPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Reject => RemainderPolicy::Reject,
            PolicyArg::LastMachine => RemainderPolicy::LastMachine,
        }
    }
}

impl GenerateArgs {
    fn run_params(&self) -> RunParams {
        let stages = if self.stages.is_empty() {
            StageSet::all()
        } else {
            StageSet::only(self.stages.iter().copied().map(Stage::from))
        };
        RunParams {
            node_count: self.nodes,
            initial_balance: self.balance.clone(),
            output_dir: self.output.clone(),
            network: self.network.clone(),
            stages,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format)?;

    match cli.command {
        Command::Generate(args) => generate(args),
        Command::InspectExtra { path } => inspect_extra(path),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let mut config = MakeupConfig::load(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;
    if let Some(policy) = args.remainder_policy {
        config.remainder_policy = policy.into();
    }

    let params = args.run_params();
    match args.seed {
        Some(seed) => {
            warn!(seed, "Using seeded keys; anyone with the seed can recover every node key");
            execute(config, SeededKeySource::new(seed), &params, args.force)
        }
        None => execute(config, OsKeySource::new(), &params, args.force),
    }
}

fn execute<K: KeySource>(
    config: MakeupConfig,
    keys: K,
    params: &RunParams,
    force: bool,
) -> Result<()> {
    let target = params.target_dir();
    info!(
        nodes = params.node_count,
        machines = config.ip_list.len(),
        dir = %target.display(),
        "Generating network"
    );

    let mut service = MakeupService::new(config, keys);
    let mut writer = FsArtifactWriter::new(&target, force);
    let (plan, receipt) = service
        .run(params, &mut writer)
        .with_context(|| format!("failed to generate network into {}", target.display()))?;

    info!(
        files = receipt.files,
        bytes = receipt.bytes,
        "Network written to {}",
        receipt.location.display()
    );
    println!("{}", plan.miner_list());
    Ok(())
}

fn inspect_extra(path: PathBuf) -> Result<()> {
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let validators = decode_validators_hex(&text)
        .with_context(|| format!("{} is not valid validator extra data", path.display()))?;
    if validators.is_empty() {
        bail!("{} encodes an empty validator set", path.display());
    }

    info!(validators = validators.len(), "Decoded extra data");
    println!("{}", format_miner_list(&validators));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["netgen", "generate"]).unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.nodes, 7);
        assert_eq!(args.config, PathBuf::from("config.json"));
        assert_eq!(args.balance, DEFAULT_BALANCE);
        assert!(!args.force);

        let params = args.run_params();
        assert_eq!(params.stages, StageSet::all());
        assert_eq!(params.target_dir(), PathBuf::from("build").join("devnet"));
    }

    #[test]
    fn test_stage_list_parsing() {
        let cli = Cli::try_parse_from([
            "netgen",
            "generate",
            "--stages",
            "extra,static-nodes",
            "--seed",
            "5",
        ])
        .unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.seed, Some(5));
        let params = args.run_params();
        assert!(params.stages.contains(Stage::Extra));
        assert!(params.stages.contains(Stage::StaticNodes));
        assert!(!params.stages.contains(Stage::Genesis));
    }

    #[test]
    fn test_unknown_stage_rejected() {
        assert!(Cli::try_parse_from(["netgen", "generate", "--stages", "keys"]).is_err());
    }

    #[test]
    fn test_log_format_is_global() {
        let cli =
            Cli::try_parse_from(["netgen", "inspect-extra", "extra.dat", "--log-format", "json"])
                .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_stage_args_cover_every_stage() {
        let mapped: Vec<Stage> = StageArg::value_variants()
            .iter()
            .copied()
            .map(Stage::from)
            .collect();
        assert_eq!(mapped, Stage::ALL.to_vec());
    }

    #[test]
    fn test_end_to_end_generate_and_inspect() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        fs::write(&config, r#"{ "IpList": ["127.0.0.1", "127.0.0.2"], "StartPort": 30300 }"#)
            .unwrap();
        let output = dir.path().join("build");

        let argv: Vec<std::ffi::OsString> = vec![
            "netgen".into(),
            "generate".into(),
            "--nodes".into(),
            "4".into(),
            "--seed".into(),
            "1".into(),
            "--config".into(),
            config.into_os_string(),
            "--output".into(),
            output.clone().into_os_string(),
        ];
        let cli = Cli::try_parse_from(argv).unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        generate(args).unwrap();

        let extra = output.join("devnet").join("extra.dat");
        assert!(extra.is_file());
        inspect_extra(extra).unwrap();
    }
}
