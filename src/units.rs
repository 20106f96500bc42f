use std::fmt;

use alloy_primitives::U256;

const ETH_DECIMALS: usize = 18;
const WEI_PER_ETH: u64 = 1_000_000_000_000_000_000;

/// An ETH amount held as an exact number of wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthAmount(U256);

impl EthAmount {
    pub fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    pub fn wei(&self) -> U256 {
        self.0
    }

    /// Nearest f64 to the exact decimal value.
    pub fn as_f64(&self) -> f64 {
        // A plain decimal string always parses as f64.
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl fmt::Display for EthAmount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (whole, fraction) = self.0.div_rem(U256::from(WEI_PER_ETH));
        if fraction.is_zero() {
            return write!(f, "{}", whole);
        }

        let fraction = format!("{:0>width$}", fraction.to_string(), width = ETH_DECIMALS);
        write!(f, "{}.{}", whole, fraction.trim_end_matches('0'))
    }
}
