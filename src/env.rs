use serde::{de::DeserializeOwned, Deserialize};
use tracing::error;

pub const DEFAULT_RPC_URL: &str = "https://mainnet.infura.io/v3/YOUR_INFURA_KEY";

/// Defaults read from the process environment.
#[derive(Debug, Default, Deserialize)]
pub struct EnvConfig {
    pub rpc_url: Option<String>,
}

impl EnvConfig {
    pub fn rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_RPC_URL)
    }
}

pub fn get_env_config<T: DeserializeOwned>() -> T {
    match envy::from_env::<T>() {
        Ok(config) => config,
        Err(err) => {
            error!("failed to parse env config: {}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_placeholder_rpc() {
        let env = EnvConfig::default();
        assert_eq!(env.rpc_url(), DEFAULT_RPC_URL);

        let env = EnvConfig {
            rpc_url: Some(String::new()),
        };
        assert_eq!(env.rpc_url(), DEFAULT_RPC_URL);
    }

    #[test]
    fn deserializes_rpc_url_from_env_pairs() {
        let env: EnvConfig = envy::from_iter(vec![(
            "RPC_URL".to_string(),
            "http://localhost:8545".to_string(),
        )])
        .unwrap();
        assert_eq!(env.rpc_url(), "http://localhost:8545");

        let env: EnvConfig = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(env.rpc_url(), DEFAULT_RPC_URL);
    }
}
