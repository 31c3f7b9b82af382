use alloy::primitives::Address;
use alloy::providers::MULTICALL3_ADDRESS;
use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::error::{MulticallError, Result};

/// Root configuration for the multicall client.
///
/// Loaded from `config.yaml` (or any format the `config` crate understands).
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// HTTP endpoint of the node used for `eth_call`
    pub rpc_url: String,
    /// Multicall contract; also the target of calls that do not name one
    #[serde(default = "default_multicall_address")]
    pub multicall_address: String,
    /// Pin every aggregate call to this block instead of `latest`
    #[serde(default)]
    pub block: Option<u64>,
    /// Upper bound on cached envelopes. Unbounded when absent.
    #[serde(default)]
    pub envelope_cache_capacity: Option<u64>,
}

fn default_multicall_address() -> String {
    MULTICALL3_ADDRESS.to_string()
}

impl Settings {
    pub fn new() -> std::result::Result<Self, ConfigError> {
        Self::from_path("config")
    }

    pub fn from_path(path: &str) -> std::result::Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .build()?;

        Self::from_config(s)
    }

    fn from_config(s: Config) -> std::result::Result<Self, ConfigError> {
        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }

    pub fn multicall_address(&self) -> Result<Address> {
        self.multicall_address
            .parse()
            .map_err(|_| MulticallError::InvalidAddress(self.multicall_address.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn load(yaml: &str) -> std::result::Result<Settings, ConfigError> {
        let s = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?;
        Settings::from_config(s)
    }

    #[test]
    fn test_defaults_to_multicall3() {
        let settings = load("rpc_url: http://localhost:8545").unwrap();

        assert_eq!(settings.multicall_address().unwrap(), MULTICALL3_ADDRESS);
        assert_eq!(settings.block, None);
        assert_eq!(settings.envelope_cache_capacity, None);
    }

    #[test]
    fn test_overrides() {
        let settings = load(
            "rpc_url: http://localhost:8545\n\
             multicall_address: \"0xeefba1e63905ef1d7acba5a8513c70307c1ce441\"\n\
             block: 19000000\n\
             envelope_cache_capacity: 512\n",
        )
        .unwrap();

        assert_eq!(
            settings.multicall_address().unwrap(),
            "0xeefba1e63905ef1d7acba5a8513c70307c1ce441"
                .parse::<Address>()
                .unwrap()
        );
        assert_eq!(settings.block, Some(19_000_000));
        assert_eq!(settings.envelope_cache_capacity, Some(512));
    }

    #[test]
    fn test_invalid_address() {
        let settings = load("rpc_url: x\nmulticall_address: nope").unwrap();

        assert!(matches!(
            settings.multicall_address(),
            Err(MulticallError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_missing_rpc_url() {
        assert!(load("block: 1").is_err());
    }
}
