use std::time::Instant;

use anyhow::Result;

#[tokio::main]
pub async fn main() -> Result<()> {
    let started = Instant::now();
    balance_soundness::log::init();

    let outcome = balance_soundness::check_balance(started).await?;
    std::process::exit(outcome.exit_code())
}
