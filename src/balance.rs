use std::{io::Write, time::Instant};

use alloy_primitives::{Address, U256};
use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info, warn};

use clap::Parser;

use crate::{
    config::{Cli, Config},
    env::{get_env_config, EnvConfig},
    execution_node::{ExecutionNode, JsonRpcClient, RpcError},
    report::{self, BalanceResult},
    units::EthAmount,
};

/// Absolute tolerance when comparing against the expected ETH value.
pub const MATCH_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Error)]
pub enum BalanceFetchError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("{source}")]
    Rpc { address: Address, source: RpcError },
}

impl BalanceFetchError {
    /// The checksummed address when it could be parsed, the raw input otherwise.
    pub fn address(&self) -> String {
        match self {
            BalanceFetchError::InvalidAddress(raw) => raw.clone(),
            BalanceFetchError::Rpc { address, .. } => address.to_checksum(None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No expected value was given.
    Unchecked,
    Matched,
    Mismatch,
    ConnectionFailed,
    FetchFailed,
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Unchecked | Outcome::Matched => 0,
            Outcome::ConnectionFailed => 1,
            Outcome::Mismatch | Outcome::FetchFailed => 2,
        }
    }
}

/// Accepts any casing, with or without the 0x prefix.
pub fn checksum_address(address: &str) -> Result<Address, BalanceFetchError> {
    let digits = address.strip_prefix("0x").unwrap_or(address);
    Some(digits)
        .filter(|digits| digits.len() == 40 && digits.chars().all(|c| c.is_ascii_hexdigit()))
        .and_then(|digits| digits.parse::<Address>().ok())
        .ok_or_else(|| BalanceFetchError::InvalidAddress(address.to_string()))
}

pub fn matches_expected(balance: &EthAmount, expected: f64) -> bool {
    (balance.as_f64() - expected).abs() < MATCH_TOLERANCE
}

async fn is_connected(node: &impl ExecutionNode) -> bool {
    match node.client_version().await {
        Ok(version) if !version.is_empty() => {
            debug!(%version, "connected to execution node");
            true
        }
        Ok(_) => {
            warn!("execution node returned an empty client version");
            false
        }
        Err(err) => {
            warn!("connectivity probe failed: {}", err);
            false
        }
    }
}

pub struct BalanceChecker<N> {
    config: Config,
    node: N,
}

impl<N: ExecutionNode + Sync> BalanceChecker<N> {
    pub fn new(config: Config, node: N) -> Self {
        Self { config, node }
    }

    pub async fn fetch_balance(&self) -> Result<(Address, U256), BalanceFetchError> {
        let address = checksum_address(&self.config.address)?;
        let balance = self
            .node
            .get_balance(&address, &self.config.block)
            .await
            .map_err(|source| BalanceFetchError::Rpc { address, source })?;
        Ok((address, balance))
    }

    /// Best effort, a failure only means the chain id goes unreported.
    async fn chain_id(&self) -> Option<u64> {
        self.node
            .chain_id()
            .await
            .map_err(|err| debug!("chain id unavailable: {}", err))
            .ok()
    }

    /// Runs one check, writing the report to `out`. Timings are measured from `started`.
    pub async fn run(&self, out: &mut impl Write, started: Instant) -> Result<Outcome> {
        let config = &self.config;

        if !is_connected(&self.node).await {
            writeln!(out, "{}", report::CONNECTION_FAILED)?;
            return Ok(Outcome::ConnectionFailed);
        }

        let chain_id = self.chain_id().await;
        report::write_header(out, &config.rpc_url, chain_id, &config.address, &config.block)?;

        let (address, wei) = match self.fetch_balance().await {
            Ok(fetched) => fetched,
            Err(err) => {
                let shown = err.address();
                warn!(address = %shown, "balance fetch failed: {}", err);
                writeln!(out, "❌ Failed to fetch balance for {}: {}", shown, err)?;
                return Ok(Outcome::FetchFailed);
            }
        };

        let balance = EthAmount::from_wei(wei);
        report::write_balance(out, &balance)?;

        let comparison = config
            .expected_eth
            .map(|expected| (expected, matches_expected(&balance, expected)));
        if let Some((expected, matched)) = comparison {
            report::write_comparison(out, expected, matched)?;
        }

        let elapsed = started.elapsed();
        report::write_elapsed(out, elapsed)?;

        let result = BalanceResult {
            rpc: config.rpc_url.clone(),
            chain_id,
            address: address.to_checksum(None),
            block: config.block,
            balance,
            expected_eth: config.expected_eth,
            matched: comparison.map(|(_, matched)| matched),
            elapsed,
        };

        info!(
            address = %result.address,
            block = %result.block,
            wei = %result.balance.wei(),
            eth = %result.balance,
            matched = ?result.matched,
            "balance check complete"
        );

        if config.json {
            report::write_json(out, &result)?;
        }

        Ok(match result.matched {
            None => Outcome::Unchecked,
            Some(true) => Outcome::Matched,
            Some(false) => Outcome::Mismatch,
        })
    }
}

/// Parses the command line, checks the balance over HTTP and reports to stdout.
pub async fn check_balance(started: Instant) -> Result<Outcome> {
    let cli = Cli::parse();
    let env: EnvConfig = get_env_config();
    let config = Config::resolve(cli, &env);

    let node = JsonRpcClient::new(&config.rpc_url, config.timeout)?;
    let checker = BalanceChecker::new(config, node);

    let stdout = std::io::stdout();
    checker.run(&mut stdout.lock(), started).await
}
