use super::PanelKind;
use crate::core::config::{AppConfig, BaselineSource, EndpointsConfig};
use crate::core::metrics::{self, Baseline, DerivedMetrics};
use crate::core::records::{CreditCardRecord, InvestmentRecord, PortfolioPoint, TransactionRecord};
use crate::core::{FetchClient, PanelError, Resource};
use futures::future::try_join;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Fetches the sources a panel needs and derives its metrics.
///
/// Shared by every `PanelDataStore`; holds no per-panel state.
pub struct PanelLoader {
    client: Arc<dyn FetchClient>,
    endpoints: EndpointsConfig,
    baseline: BaselineSource,
    history_limit: u32,
    cashback_rate: Decimal,
}

impl PanelLoader {
    pub fn new(client: Arc<dyn FetchClient>, config: &AppConfig) -> Self {
        Self {
            client,
            endpoints: config.endpoints.clone(),
            baseline: config.portfolio.baseline,
            history_limit: config.history_limit,
            cashback_rate: config.cashback_rate,
        }
    }

    pub async fn load(&self, kind: PanelKind) -> Result<DerivedMetrics, PanelError> {
        debug!(panel = %kind, "Loading panel");
        match kind {
            PanelKind::Balance => {
                let card = self.credit_card().await?;
                Ok(metrics::balance_metrics(&card))
            }
            PanelKind::Rewards => {
                let card = self.credit_card().await?;
                Ok(metrics::rewards_metrics(&card))
            }
            PanelKind::Transactions => {
                let value = self.records(Resource::Transactions, true).await?;
                let transactions = TransactionRecord::list_from_json(&value)?;
                Ok(metrics::transaction_metrics(
                    transactions,
                    self.cashback_rate,
                )?)
            }
            PanelKind::Investments => {
                let value = self.records(Resource::Investments, true).await?;
                let investments = InvestmentRecord::list_from_json(&value)?;
                Ok(metrics::investment_history_metrics(investments)?)
            }
            PanelKind::Portfolio => self.portfolio().await,
        }
    }

    async fn credit_card(&self) -> Result<CreditCardRecord, PanelError> {
        let value = self.records(Resource::CreditCard, false).await?;
        Ok(CreditCardRecord::from_json(&value)?)
    }

    async fn portfolio(&self) -> Result<DerivedMetrics, PanelError> {
        match self.baseline {
            BaselineSource::FirstPoint => {
                let value = self.records(Resource::PortfolioHistory, false).await?;
                let series = PortfolioPoint::series_from_json(&value)?;
                Ok(metrics::portfolio_metrics(series, Baseline::FirstPoint)?)
            }
            BaselineSource::AmountInvested => {
                // Both sources are in flight together; either failing fails the panel.
                let (series, investments) = try_join(
                    self.records(Resource::PortfolioHistory, false),
                    self.records(Resource::Investments, false),
                )
                .await?;
                let series = PortfolioPoint::series_from_json(&series)?;
                let investments = InvestmentRecord::list_from_json(&investments)?;
                let invested = metrics::total_invested(&investments)?;
                Ok(metrics::portfolio_metrics(
                    series,
                    Baseline::Amount(invested),
                )?)
            }
        }
    }

    async fn records(&self, resource: Resource, paged: bool) -> Result<Value, PanelError> {
        let endpoint = self.endpoints.endpoint(resource);
        let params = if paged {
            vec![("limit".to_string(), self.history_limit.to_string())]
        } else {
            Vec::new()
        };
        Ok(self.client.fetch_records(&endpoint, &params).await?)
    }
}
