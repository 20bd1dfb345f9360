//! Error taxonomy shared by the fetch, metrics and panel layers.
//!
//! The `Display` output of each variant is what a failed panel shows, so
//! messages are written for the dashboard user rather than for a log file.

use std::fmt::Display;
use thiserror::Error;

/// The backend resource a request or record set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    CreditCard,
    Investments,
    Transactions,
    PortfolioHistory,
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Resource::CreditCard => "credit card",
                Resource::Investments => "investments",
                Resource::Transactions => "transactions",
                Resource::PortfolioHistory => "portfolio history",
            }
        )
    }
}

/// Transport and decoding failures raised by a `FetchClient`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No {resource} found")]
    EmptyResult { resource: Resource },
}

/// Semantic failures raised while deriving metrics from fetched records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("No {resource} found")]
    EmptyResult { resource: Resource },

    #[error("Malformed record: missing or invalid field `{field}`")]
    MalformedRecord { field: String },

    #[error("Amounts too large to total: `{field}`")]
    Overflow { field: String },
}

impl MetricsError {
    pub fn malformed(field: impl Into<String>) -> Self {
        MetricsError::MalformedRecord {
            field: field.into(),
        }
    }

    pub fn overflow(field: impl Into<String>) -> Self {
        MetricsError::Overflow {
            field: field.into(),
        }
    }
}

/// Everything that can move a panel into the `Failed` state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// The load attempt itself died, e.g. by panicking.
    #[error("Panel failed to load: {0}")]
    Crashed(String),
}

impl PanelError {
    /// True for both flavours of "the backend returned no records".
    pub fn is_empty_result(&self) -> bool {
        matches!(
            self,
            PanelError::Fetch(FetchError::EmptyResult { .. })
                | PanelError::Metrics(MetricsError::EmptyResult { .. })
        )
    }
}
