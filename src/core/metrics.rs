//! Derives the point-in-time figures each panel displays from raw records.
//!
//! Every function here is pure. Degenerate inputs are handled explicitly: a
//! zero baseline yields no percentage instead of an infinite one, and an
//! empty series is an error instead of a zero amount.

use crate::core::error::{MetricsError, Resource};
use crate::core::records::{CreditCardRecord, InvestmentRecord, PortfolioPoint, TransactionRecord};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Direction of a percentage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// `Flat` covers both a zero change and a change that could not be computed.
    pub fn from_change(change: Option<Decimal>) -> Self {
        match change {
            Some(c) if c > Decimal::ZERO => Trend::Up,
            Some(c) if c < Decimal::ZERO => Trend::Down,
            _ => Trend::Flat,
        }
    }
}

/// What a percentage change is measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Baseline {
    /// The earliest point of the valuation series.
    FirstPoint,
    /// A separately sourced amount, e.g. the total invested across all purchases.
    Amount(Decimal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub record: TransactionRecord,
    pub cashback: Decimal,
}

/// Panel-specific figures that travel alongside the headline metric.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelDetail {
    Balance {
        available_credit: Decimal,
        rewards_cash: Decimal,
    },
    Rewards,
    Portfolio {
        baseline: Decimal,
        series: Vec<PortfolioPoint>,
    },
    Transactions {
        total_cashback: Decimal,
        rows: Vec<TransactionRow>,
    },
    Investments {
        total_units: Decimal,
        rows: Vec<InvestmentRecord>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub primary_amount: Decimal,
    /// `None` when the ratio is undefined; never infinite.
    pub change_percentage: Option<Decimal>,
    pub trend: Trend,
    pub detail: PanelDetail,
}

impl DerivedMetrics {
    fn without_change(primary_amount: Decimal, detail: PanelDetail) -> Self {
        DerivedMetrics {
            primary_amount,
            change_percentage: None,
            trend: Trend::Flat,
            detail,
        }
    }
}

pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `(latest - baseline) / baseline * 100`, rounded to two places.
///
/// Returns `None` for a zero baseline, and on arithmetic overflow.
pub fn percentage_change(baseline: Decimal, latest: Decimal) -> Option<Decimal> {
    if baseline.is_zero() {
        return None;
    }
    let change = latest
        .checked_sub(baseline)?
        .checked_div(baseline)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    Some(round_cents(change))
}

/// The most recent point of a series; on equal dates the later entry wins.
pub fn latest_point(series: &[PortfolioPoint]) -> Result<&PortfolioPoint, MetricsError> {
    series
        .iter()
        .max_by_key(|p| p.date)
        .ok_or(MetricsError::EmptyResult {
            resource: Resource::PortfolioHistory,
        })
}

/// Sums `amounts`, failing instead of panicking when the total overflows.
fn checked_total(
    amounts: impl IntoIterator<Item = Decimal>,
    field: &str,
) -> Result<Decimal, MetricsError> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
        .ok_or_else(|| MetricsError::overflow(field))
}

pub fn total_invested(investments: &[InvestmentRecord]) -> Result<Decimal, MetricsError> {
    checked_total(investments.iter().map(|i| i.amount_invested), "amount_invested")
}

/// Reported cashback when present, otherwise `amount * rate` rounded to cents.
pub fn cashback_for(
    transaction: &TransactionRecord,
    rate: Decimal,
) -> Result<Decimal, MetricsError> {
    match transaction.cashback {
        Some(cashback) => Ok(cashback),
        None => transaction
            .amount
            .checked_mul(rate)
            .map(round_cents)
            .ok_or_else(|| MetricsError::overflow("cashback")),
    }
}

pub fn balance_metrics(card: &CreditCardRecord) -> DerivedMetrics {
    DerivedMetrics::without_change(
        card.current_balance,
        PanelDetail::Balance {
            available_credit: card.available_credit,
            rewards_cash: card.rewards_cash,
        },
    )
}

pub fn rewards_metrics(card: &CreditCardRecord) -> DerivedMetrics {
    DerivedMetrics::without_change(card.rewards_cash, PanelDetail::Rewards)
}

/// Current portfolio value and its change against `baseline`.
pub fn portfolio_metrics(
    mut series: Vec<PortfolioPoint>,
    baseline: Baseline,
) -> Result<DerivedMetrics, MetricsError> {
    // Stable, so points sharing a date keep server order.
    series.sort_by_key(|p| p.date);
    let latest = latest_point(&series)?.value;
    let baseline = match baseline {
        Baseline::FirstPoint => {
            series
                .first()
                .ok_or(MetricsError::EmptyResult {
                    resource: Resource::PortfolioHistory,
                })?
                .value
        }
        Baseline::Amount(amount) => amount,
    };

    let change_percentage = percentage_change(baseline, latest);
    debug!(%latest, %baseline, ?change_percentage, "Derived portfolio change");

    Ok(DerivedMetrics {
        primary_amount: latest,
        change_percentage,
        trend: Trend::from_change(change_percentage),
        detail: PanelDetail::Portfolio { baseline, series },
    })
}

/// Total spent across the listed transactions, with per-row cashback.
pub fn transaction_metrics(
    transactions: Vec<TransactionRecord>,
    cashback_rate: Decimal,
) -> Result<DerivedMetrics, MetricsError> {
    if transactions.is_empty() {
        return Err(MetricsError::EmptyResult {
            resource: Resource::Transactions,
        });
    }
    let total_spent = checked_total(transactions.iter().map(|t| t.amount), "amount")?;
    let rows = transactions
        .into_iter()
        .map(|record| {
            Ok(TransactionRow {
                cashback: cashback_for(&record, cashback_rate)?,
                record,
            })
        })
        .collect::<Result<Vec<_>, MetricsError>>()?;
    let total_cashback = checked_total(rows.iter().map(|r| r.cashback), "cashback")?;

    Ok(DerivedMetrics::without_change(
        total_spent,
        PanelDetail::Transactions {
            total_cashback,
            rows,
        },
    ))
}

pub fn investment_history_metrics(
    investments: Vec<InvestmentRecord>,
) -> Result<DerivedMetrics, MetricsError> {
    if investments.is_empty() {
        return Err(MetricsError::EmptyResult {
            resource: Resource::Investments,
        });
    }
    let total_units = checked_total(
        investments.iter().map(|i| i.units_purchased),
        "units_purchased",
    )?;

    Ok(DerivedMetrics::without_change(
        total_invested(&investments)?,
        PanelDetail::Investments {
            total_units,
            rows: investments,
        },
    ))
}
