//! Raw records decoded from the backend JSON payloads.
//!
//! Each payload row is first deserialized into a lenient `*Row` struct where
//! every field is optional, then validated into its record type. An absent
//! or null numeric field therefore surfaces as `MalformedRecord` naming the
//! field, instead of a generic decode error or a silent zero.

use crate::core::error::{MetricsError, Resource};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Number, Value};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct CreditCardRecord {
    pub current_balance: Decimal,
    pub available_credit: Decimal,
    pub rewards_cash: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentRecord {
    pub id: String,
    pub date: NaiveDate,
    pub index_purchased: String,
    pub units_purchased: Decimal,
    pub price_per_unit: Decimal,
    pub amount_invested: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    /// `None` when the backend did not report cashback for the row.
    pub cashback: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

// Decimals accept JSON numbers as well as numeric strings.

#[derive(Debug, Deserialize)]
struct CreditCardRow {
    #[serde(default, alias = "curr_balance")]
    current_balance: Option<Decimal>,
    #[serde(default)]
    available_credit: Option<Decimal>,
    #[serde(default)]
    rewards_cash: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct InvestmentRow {
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    index_purchased: Option<String>,
    #[serde(default)]
    units_purchased: Option<Decimal>,
    #[serde(default)]
    price_per_unit: Option<Decimal>,
    #[serde(default)]
    amount_invested: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct TransactionRow {
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(default, alias = "date")]
    transaction_date: Option<String>,
    #[serde(default, alias = "transaction_amount")]
    amount: Option<Decimal>,
    #[serde(default, alias = "transaction_type", alias = "type")]
    description: Option<String>,
    #[serde(default)]
    cashback: Option<Decimal>,
}

/// One valuation point; chart backends name the axes `x`/`y`, weekly ones
/// use `week` with either `portfolio_value` or `total_value`.
#[derive(Debug, Deserialize)]
struct PortfolioRow {
    #[serde(default, alias = "x", alias = "week")]
    date: Option<String>,
    #[serde(default, alias = "y", alias = "portfolio_value", alias = "total_value")]
    value: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(Number),
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Text(s) => s,
            RecordId::Number(n) => n.to_string(),
        }
    }
}

impl CreditCardRecord {
    /// Decodes the single credit card row.
    ///
    /// The endpoint is a singleton table: a bare object is accepted, an array
    /// contributes its first element in server order, and an empty array is
    /// an `EmptyResult`.
    pub fn from_json(value: &Value) -> Result<Self, MetricsError> {
        let row = match value {
            Value::Array(rows) => rows.first().ok_or(MetricsError::EmptyResult {
                resource: Resource::CreditCard,
            })?,
            other => other,
        };
        let row: CreditCardRow = decode_row(row, "credit_card")?;
        Ok(CreditCardRecord {
            current_balance: required_amount(row.current_balance, "current_balance")?,
            available_credit: required_amount(row.available_credit, "available_credit")?,
            rewards_cash: required_amount(row.rewards_cash, "rewards_cash")?,
        })
    }
}

impl InvestmentRecord {
    pub fn from_json(value: &Value) -> Result<Self, MetricsError> {
        let row: InvestmentRow = decode_row(value, "investment")?;
        Ok(InvestmentRecord {
            id: required(row.id, "id")?.into(),
            date: required_date(row.date, "date")?,
            index_purchased: required(row.index_purchased, "index_purchased")?,
            units_purchased: required_amount(row.units_purchased, "units_purchased")?,
            price_per_unit: required_amount(row.price_per_unit, "price_per_unit")?,
            amount_invested: required_amount(row.amount_invested, "amount_invested")?,
        })
    }

    pub fn list_from_json(value: &Value) -> Result<Vec<Self>, MetricsError> {
        decode_list(value, Resource::Investments, Self::from_json)
    }
}

impl TransactionRecord {
    pub fn from_json(value: &Value) -> Result<Self, MetricsError> {
        let row: TransactionRow = decode_row(value, "transaction")?;
        Ok(TransactionRecord {
            id: required(row.id, "id")?.into(),
            date: required_date(row.transaction_date, "transaction_date")?,
            amount: required_amount(row.amount, "amount")?,
            description: required(row.description, "description")?,
            cashback: row
                .cashback
                .map(|c| non_negative(c, "cashback"))
                .transpose()?,
        })
    }

    pub fn list_from_json(value: &Value) -> Result<Vec<Self>, MetricsError> {
        decode_list(value, Resource::Transactions, Self::from_json)
    }
}

impl PortfolioPoint {
    pub fn from_json(value: &Value) -> Result<Self, MetricsError> {
        let row: PortfolioRow = decode_row(value, "portfolio_point")?;
        Ok(PortfolioPoint {
            date: required_date(row.date, "x")?,
            value: required_amount(row.value, "y")?,
        })
    }

    /// Decodes a valuation series in any of the shapes the backends emit:
    /// `[{x, y}]`, `{"investment_history": [{x, y}]}`, `[{week, portfolio_value}]`
    /// or `[{week, total_value, price_per_share}]`.
    pub fn series_from_json(value: &Value) -> Result<Vec<Self>, MetricsError> {
        let points = match value {
            Value::Object(obj) => obj
                .get("investment_history")
                .ok_or_else(|| MetricsError::malformed("investment_history"))?,
            other => other,
        };
        decode_list(points, Resource::PortfolioHistory, Self::from_json)
    }
}

fn decode_list<T>(
    value: &Value,
    resource: Resource,
    decode: impl Fn(&Value) -> Result<T, MetricsError>,
) -> Result<Vec<T>, MetricsError> {
    let rows = value
        .as_array()
        .ok_or_else(|| MetricsError::malformed(resource.to_string()))?;
    if rows.is_empty() {
        return Err(MetricsError::EmptyResult { resource });
    }
    rows.iter().map(decode).collect()
}

fn decode_row<'a, T: Deserialize<'a>>(value: &'a Value, what: &str) -> Result<T, MetricsError> {
    T::deserialize(value).map_err(|e| {
        debug!(record = what, error = %e, "Failed to decode record");
        MetricsError::malformed(what)
    })
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, MetricsError> {
    value.ok_or_else(|| MetricsError::malformed(field))
}

fn non_negative(amount: Decimal, field: &str) -> Result<Decimal, MetricsError> {
    if amount < Decimal::ZERO {
        return Err(MetricsError::malformed(field));
    }
    Ok(amount)
}

fn required_amount(value: Option<Decimal>, field: &str) -> Result<Decimal, MetricsError> {
    non_negative(required(value, field)?, field)
}

fn required_date(value: Option<String>, field: &str) -> Result<NaiveDate, MetricsError> {
    value
        .as_deref()
        .and_then(parse_date)
        .ok_or_else(|| MetricsError::malformed(field))
}

/// Accepts `2024-02-01` as well as ISO datetimes such as `2025-02-09T00:00:00`.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let day = text.trim().split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
