//! Immutable panel state published to the presentation layer.

use super::error::PanelError;
use super::metrics::DerivedMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStatus {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
enum SnapshotState {
    Loading,
    Ready(DerivedMetrics),
    Failed(String),
}

/// State of one panel at a point in time.
///
/// Exactly one of loading, data or error is held; the constructors are the
/// only way to build one, so data and error can never be shown together.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSnapshot {
    generation: u64,
    state: SnapshotState,
}

impl PanelSnapshot {
    pub fn loading(generation: u64) -> Self {
        Self {
            generation,
            state: SnapshotState::Loading,
        }
    }

    pub fn ready(generation: u64, metrics: DerivedMetrics) -> Self {
        Self {
            generation,
            state: SnapshotState::Ready(metrics),
        }
    }

    pub fn failed(generation: u64, error: &PanelError) -> Self {
        Self {
            generation,
            state: SnapshotState::Failed(error.to_string()),
        }
    }

    pub fn from_result(generation: u64, result: Result<DerivedMetrics, PanelError>) -> Self {
        match result {
            Ok(metrics) => Self::ready(generation, metrics),
            Err(e) => Self::failed(generation, &e),
        }
    }

    /// The load attempt this snapshot belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> PanelStatus {
        match self.state {
            SnapshotState::Loading => PanelStatus::Loading,
            SnapshotState::Ready(_) => PanelStatus::Ready,
            SnapshotState::Failed(_) => PanelStatus::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status() != PanelStatus::Loading
    }

    pub fn data(&self) -> Option<&DerivedMetrics> {
        match &self.state {
            SnapshotState::Ready(metrics) => Some(metrics),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SnapshotState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
