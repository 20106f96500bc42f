use std::{io::Write, time::Duration};

use serde::Serialize;

use crate::{config::BlockId, units::EthAmount};

pub const BANNER: &str = "🔧 zk-balance-soundness";
pub const CONNECTION_FAILED: &str =
    "❌ RPC connection failed. Check your RPC_URL or --rpc parameter.";

/// Everything known about a successful balance check.
#[derive(Debug, Clone)]
pub struct BalanceResult {
    pub rpc: String,
    pub chain_id: Option<u64>,
    pub address: String,
    pub block: BlockId,
    pub balance: EthAmount,
    pub expected_eth: Option<f64>,
    pub matched: Option<bool>,
    pub elapsed: Duration,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    rpc: &'a str,
    chain_id: Option<u64>,
    address: &'a str,
    block: BlockId,
    balance_eth: f64,
    expected_eth: Option<f64>,
    #[serde(rename = "match")]
    matched: Option<bool>,
    elapsed_seconds: f64,
}

fn round_to_hundredths(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

/// Lines printed before the balance is fetched.
pub fn write_header(
    out: &mut impl Write,
    rpc: &str,
    chain_id: Option<u64>,
    address: &str,
    block: &BlockId,
) -> std::io::Result<()> {
    writeln!(out, "{}", BANNER)?;
    writeln!(out, "🔗 RPC: {}", rpc)?;
    if let Some(chain_id) = chain_id {
        writeln!(out, "🧭 Chain ID: {}", chain_id)?;
    }
    writeln!(out, "🏷️ Address: {}", address)?;
    writeln!(out, "🧱 Block: {}", block)
}

pub fn write_balance(out: &mut impl Write, balance: &EthAmount) -> std::io::Result<()> {
    writeln!(out, "💰 Balance: {} ETH", balance)
}

/// Whole values keep one decimal place, `1.0` rather than `1`.
fn format_expected(expected: f64) -> String {
    if expected.is_finite() && expected.fract() == 0.0 {
        format!("{:.1}", expected)
    } else {
        expected.to_string()
    }
}

pub fn write_comparison(out: &mut impl Write, expected: f64, matched: bool) -> std::io::Result<()> {
    let status = if matched { "✅ MATCH" } else { "❌ MISMATCH" };
    writeln!(out, "Expected: {} ETH | {}", format_expected(expected), status)
}

pub fn write_elapsed(out: &mut impl Write, elapsed: Duration) -> std::io::Result<()> {
    writeln!(out, "⏱️ Completed in {:.2}s", elapsed.as_secs_f64())
}

pub fn write_json(out: &mut impl Write, result: &BalanceResult) -> anyhow::Result<()> {
    let report = JsonReport {
        rpc: &result.rpc,
        chain_id: result.chain_id,
        address: &result.address,
        block: result.block,
        balance_eth: result.balance.as_f64(),
        expected_eth: result.expected_eth,
        matched: result.matched,
        elapsed_seconds: round_to_hundredths(result.elapsed.as_secs_f64()),
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
