//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files;
//! every field has a default so a minimal config stays minimal.

use serde::{Deserialize, Serialize};

/// Root configuration for the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// The campaign contract this client talks to.
    pub contract: ContractConfig,

    /// Node endpoint settings.
    pub network: NetworkConfig,

    /// Transaction lifecycle settings.
    pub transactions: TransactionConfig,
}

/// Identity of the campaign contract.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Principal address that deployed the contract.
    pub address: String,

    /// Contract name under that principal.
    pub name: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            name: "crowdfunding".to_string(),
        }
    }
}

/// Node endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Base URL of the node HTTP API.
    pub rpc_url: String,

    /// Request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://stacks-node-api.testnet.stacks.co/".to_string(),
            rpc_timeout_secs: 10,
        }
    }
}

/// Transaction lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Grace period between submission acceptance and the single
    /// state-refresh check, in seconds.
    pub confirmation_delay_secs: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            confirmation_delay_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.transactions.confirmation_delay_secs, 5);
        assert_eq!(config.network.rpc_timeout_secs, 10);
        assert!(config.contract.address.is_empty());
    }

    #[test]
    fn test_minimal_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            [contract]
            address = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG"
            name = "my-campaign"
            "#,
        )
        .unwrap();
        assert_eq!(config.contract.name, "my-campaign");
        // Unspecified sections fall back to defaults.
        assert_eq!(config.transactions.confirmation_delay_secs, 5);
    }
}
