use anyhow::{Context, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

use super::error::Resource;
use super::fetch::Endpoint;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where each backend resource is served. Paths are joined to the base URL;
/// absolute `http(s)://` URLs point at a separate service.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EndpointsConfig {
    pub credit_card: String,
    pub investments: String,
    pub transactions: String,
    pub portfolio: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        EndpointsConfig {
            credit_card: "/credit_card".to_string(),
            investments: "/investments".to_string(),
            transactions: "/transactions".to_string(),
            portfolio: "/portfolio".to_string(),
        }
    }
}

impl EndpointsConfig {
    pub fn endpoint(&self, resource: Resource) -> Endpoint {
        let location = match resource {
            Resource::CreditCard => &self.credit_card,
            Resource::Investments => &self.investments,
            Resource::Transactions => &self.transactions,
            Resource::PortfolioHistory => &self.portfolio,
        };
        Endpoint::new(resource, location.clone())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    /// Change is measured from the first point of the valuation series.
    #[default]
    FirstPoint,
    /// Change is measured from the total amount invested.
    AmountInvested,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PortfolioPanelConfig {
    #[serde(default)]
    pub baseline: BaselineSource,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub portfolio: PortfolioPanelConfig,
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
    #[serde(default = "default_cashback_rate")]
    pub cashback_rate: Decimal,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_history_limit() -> u32 {
    10
}

fn default_cashback_rate() -> Decimal {
    Decimal::new(3, 2)
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            backend: BackendConfig::default(),
            endpoints: EndpointsConfig::default(),
            portfolio: PortfolioPanelConfig::default(),
            history_limit: default_history_limit(),
            cashback_rate: default_cashback_rate(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

pub const DEFAULT_CONFIG: &str = r#"---
backend:
  base_url: "http://localhost:5000"
  timeout_secs: 10

endpoints:
  credit_card: "/credit_card"
  investments: "/investments"
  transactions: "/transactions"
  portfolio: "/portfolio"

portfolio:
  baseline: first_point

history_limit: 10
cashback_rate: "0.03"
currency_symbol: "$"
"#;

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "finpanel", "finpanel")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
