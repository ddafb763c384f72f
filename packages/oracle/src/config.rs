use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{OracleError, Result};

/// Environment prefix of the contract address variable of a network.
pub const CONTRACT_ENV_PREFIX: &str = "MERKLE_PROOF_";
/// Older deployments exported the address under this prefix.
pub const LEGACY_CONTRACT_ENV_PREFIX: &str = "NEXT_PUBLIC_MERKLE_PROOF_";
pub const RPC_URL_ENV_SUFFIX: &str = "_RPC_URL";

/// Where the verification contract of a network lives.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct NetworkConfig {
    pub name: String,
    pub contract_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
}

impl NetworkConfig {
    pub fn rpc_url(&self) -> Result<&str> {
        self.rpc_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| OracleError::MissingRpcUrl(self.name.clone()))
    }

    /// Checks the contract address is a 0x-prefixed 20-byte hex string.
    pub fn validate(&self) -> Result<()> {
        let invalid = || OracleError::InvalidContractAddress {
            network: self.name.clone(),
            address: self.contract_address.clone(),
        };
        let digits = self.contract_address.strip_prefix("0x").ok_or_else(invalid)?;
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;
        Ok(())
    }
}

/// Networks the root can be published to, keyed by [`env_key`].
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
pub struct OracleConfig {
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl OracleConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: OracleConfig = serde_json::from_str(json)?;
        let mut config = OracleConfig::default();
        for network in parsed.networks.into_values() {
            config.insert(network)?;
        }
        Ok(config)
    }

    /// Reads every network announced by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Collects networks from `MERKLE_PROOF_<NETWORK>` (or the legacy
    /// `NEXT_PUBLIC_MERKLE_PROOF_<NETWORK>`) address variables, with the
    /// RPC endpoint taken from `<NETWORK>_RPC_URL`.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let mut config = OracleConfig::default();
        // Legacy names first, so the current prefix wins on conflict.
        for prefix in [LEGACY_CONTRACT_ENV_PREFIX, CONTRACT_ENV_PREFIX] {
            for (key, address) in &vars {
                let Some(network_key) = key.strip_prefix(prefix) else {
                    continue;
                };
                if network_key.is_empty() || address.is_empty() {
                    continue;
                }
                let rpc_url = vars
                    .get(&format!("{network_key}{RPC_URL_ENV_SUFFIX}"))
                    .filter(|url| !url.is_empty())
                    .cloned();
                config.insert(NetworkConfig {
                    name: network_key.to_lowercase().replace('_', "-"),
                    contract_address: address.clone(),
                    rpc_url,
                })?;
            }
        }
        Ok(config)
    }

    pub fn insert(&mut self, network: NetworkConfig) -> Result<()> {
        network.validate()?;
        self.networks.insert(env_key(&network.name), network);
        Ok(())
    }

    /// Looks a network up by name, ignoring case and `-`/`_` differences.
    pub fn network(&self, name: &str) -> Result<&NetworkConfig> {
        self.networks
            .get(&env_key(name))
            .ok_or_else(|| OracleError::NetworkNotConfigured(name.to_string()))
    }
}

/// `base-sepolia` -> `BASE_SEPOLIA`
pub fn env_key(network: &str) -> String {
    network.to_uppercase().replace('-', "_")
}
