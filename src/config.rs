use std::{fmt, time::Duration};

use clap::Parser;
use serde::{Serialize, Serializer};

use crate::env::EnvConfig;

#[derive(Parser, Debug)]
#[command(
    name = "zk-balance-soundness",
    version,
    about = "zk-balance-soundness: verify ETH balance soundness for contracts and wallets (useful for Aztec/Zama projects and general Web3 audits)."
)]
pub struct Cli {
    /// EVM RPC URL (default from RPC_URL)
    #[arg(long)]
    pub rpc: Option<String>,
    /// Ethereum address to check
    #[arg(long)]
    pub address: String,
    /// Optional block number for historical balance check
    #[arg(long)]
    pub block: Option<u64>,
    /// Expected balance in ETH for comparison
    #[arg(long, allow_negative_numbers = true)]
    pub expected: Option<f64>,
    /// Output result as JSON
    #[arg(long)]
    pub json: bool,
    /// RPC timeout (seconds)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
}

/// Block at which the balance is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockId {
    Latest,
    Number(u64),
}

impl BlockId {
    /// JSON-RPC block parameter, a tag or a hex quantity.
    pub fn to_rpc_param(&self) -> String {
        match self {
            BlockId::Latest => "latest".to_string(),
            BlockId::Number(number) => format!("{:#x}", number),
        }
    }
}

impl From<Option<u64>> for BlockId {
    fn from(block: Option<u64>) -> Self {
        block.map_or(BlockId::Latest, BlockId::Number)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BlockId::Latest => write!(f, "latest"),
            BlockId::Number(number) => write!(f, "{}", number),
        }
    }
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            BlockId::Latest => serializer.serialize_str("latest"),
            BlockId::Number(number) => serializer.serialize_u64(*number),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub address: String,
    pub block: BlockId,
    pub expected_eth: Option<f64>,
    pub json: bool,
    pub timeout: Duration,
}

impl Config {
    pub fn resolve(cli: Cli, env: &EnvConfig) -> Self {
        Self {
            rpc_url: cli.rpc.unwrap_or_else(|| env.rpc_url().to_string()),
            address: cli.address,
            block: cli.block.into(),
            expected_eth: cli.expected,
            json: cli.json,
            timeout: Duration::from_secs(cli.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::DEFAULT_RPC_URL;

    const ADDRESS: &str = "0x52908400098527886e0f7030069857d2e4169ee7";

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("zk-balance-soundness").chain(args.iter().copied()))
    }

    #[test]
    fn applies_defaults() {
        let cli = parse(&["--address", ADDRESS]).unwrap();
        let config = Config::resolve(cli, &EnvConfig::default());

        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.address, ADDRESS);
        assert_eq!(config.block, BlockId::Latest);
        assert_eq!(config.expected_eth, None);
        assert!(!config.json);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn rpc_flag_overrides_env() {
        let env = EnvConfig {
            rpc_url: Some("http://from-env:8545".to_string()),
        };

        let cli = parse(&["--address", ADDRESS]).unwrap();
        assert_eq!(Config::resolve(cli, &env).rpc_url, "http://from-env:8545");

        let cli = parse(&["--address", ADDRESS, "--rpc", "http://from-flag:8545"]).unwrap();
        assert_eq!(Config::resolve(cli, &env).rpc_url, "http://from-flag:8545");
    }

    #[test]
    fn parses_all_flags() {
        let cli = parse(&[
            "--address",
            ADDRESS,
            "--block",
            "100",
            "--expected",
            "1.5",
            "--json",
            "--timeout",
            "5",
        ])
        .unwrap();
        let config = Config::resolve(cli, &EnvConfig::default());

        assert_eq!(config.block, BlockId::Number(100));
        assert_eq!(config.expected_eth, Some(1.5));
        assert!(config.json);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_invalid_arguments() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--address", ADDRESS, "--block", "-1"]).is_err());
        assert!(parse(&["--address", ADDRESS, "--block", "latest"]).is_err());
        assert!(parse(&["--address", ADDRESS, "--expected", "lots"]).is_err());
        assert!(parse(&["--address", ADDRESS, "--timeout", "0"]).is_err());
        assert!(parse(&["--address", ADDRESS, "--timeout", "1.5"]).is_err());
    }

    #[test]
    fn encodes_block_ids() {
        assert_eq!(BlockId::Latest.to_rpc_param(), "latest");
        assert_eq!(BlockId::Number(0).to_rpc_param(), "0x0");
        assert_eq!(BlockId::Number(100).to_rpc_param(), "0x64");

        assert_eq!(BlockId::Latest.to_string(), "latest");
        assert_eq!(BlockId::Number(100).to_string(), "100");

        assert_eq!(serde_json::to_string(&BlockId::Latest).unwrap(), r#""latest""#);
        assert_eq!(serde_json::to_string(&BlockId::Number(100)).unwrap(), "100");
    }
}
