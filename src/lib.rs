mod balance;
mod config;
mod env;
mod execution_node;
pub mod log;
mod report;
pub mod units;

pub use balance::{check_balance, Outcome};
