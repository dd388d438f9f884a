use anyhow::{Context, Result, anyhow, ensure};
use dg_api_types::Address;
use dg_chain_client::ContractAddresses;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

pub const DEFAULT_TOKEN_ADDRESS: Address =
    Address::from_literal("0x5AA59f0fC809fDd2813ed1Bc2EC47d8579C89F2d");
pub const DEFAULT_VAULT_ADDRESS: Address =
    Address::from_literal("0xC693a927478CE1A312b7322c0442c5edEfB5c45F");
pub const DEFAULT_TOKEN_SYMBOL: &str = "DGN";
pub const DEFAULT_RECEIPT_POLL_MS: u64 = 1500;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment settings for the dashboard. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub token_address: Address,
    pub vault_address: Address,
    pub token_symbol: String,
    pub receipt_poll_interval_ms: u64,
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`.
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            token_address: DEFAULT_TOKEN_ADDRESS,
            vault_address: DEFAULT_VAULT_ADDRESS,
            token_symbol: DEFAULT_TOKEN_SYMBOL.to_owned(),
            receipt_poll_interval_ms: DEFAULT_RECEIPT_POLL_MS,
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).context("invalid dashboard config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.token_symbol.trim().is_empty(), "token_symbol cannot be empty");
        ensure!(
            self.receipt_poll_interval_ms > 0,
            "receipt_poll_interval_ms must be greater than 0"
        );
        ensure!(
            self.token_address != self.vault_address,
            "token and vault must be different contracts"
        );
        self.parse_log_level()?;
        Ok(())
    }

    pub fn contract_addresses(&self) -> ContractAddresses {
        ContractAddresses {
            token: self.token_address,
            vault: self.vault_address,
        }
    }

    /// Falls back to `info` when the configured level does not parse.
    pub fn log_filter(&self) -> LevelFilter {
        self.parse_log_level().unwrap_or(LevelFilter::INFO)
    }

    fn parse_log_level(&self) -> Result<LevelFilter> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| anyhow!("unknown log_level {:?}", self.log_level))
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.receipt_poll_interval(), Duration::from_millis(1500));
    }

    #[test]
    fn overrides_are_applied() {
        let config = DashboardConfig::from_json(
            r#"{ "token_symbol": "tDGN", "vault_address": "0x2222222222222222222222222222222222222222" }"#,
        )
        .unwrap();
        assert_eq!(config.token_symbol, "tDGN");
        assert_eq!(config.log_filter(), LevelFilter::INFO);
        assert_eq!(config.contract_addresses().token, DEFAULT_TOKEN_ADDRESS);
        assert_eq!(
            config.contract_addresses().vault.to_string(),
            "0x2222222222222222222222222222222222222222"
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(DashboardConfig::from_json(r#"{ "token_address": "nope" }"#).is_err());
        assert!(DashboardConfig::from_json(r#"{ "receipt_poll_interval_ms": 0 }"#).is_err());
        assert!(DashboardConfig::from_json(r#"{ "token_symbol": "  " }"#).is_err());
        assert!(DashboardConfig::from_json(r#"{ "log_level": "loud" }"#).is_err());
        assert!(
            DashboardConfig::from_json(
                r#"{ "vault_address": "0x5AA59f0fC809fDd2813ed1Bc2EC47d8579C89F2d" }"#
            )
            .is_err()
        );
    }
}
