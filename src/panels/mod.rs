//! Per-panel data lifecycle: what each panel fetches and how its state evolves.

pub mod loader;
pub mod store;

pub use loader::PanelLoader;
pub use store::PanelDataStore;

use crate::core::PanelSnapshot;
use futures::future::join_all;
use std::fmt::Display;
use std::sync::Arc;

/// The panels of the dashboard, each backed by its own fetch-and-derive cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Balance,
    Portfolio,
    Rewards,
    Transactions,
    Investments,
}

impl PanelKind {
    pub const ALL: [PanelKind; 5] = [
        PanelKind::Balance,
        PanelKind::Portfolio,
        PanelKind::Rewards,
        PanelKind::Transactions,
        PanelKind::Investments,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::Balance => "Account Overview",
            PanelKind::Portfolio => "Your Portfolio",
            PanelKind::Rewards => "Reward Cash",
            PanelKind::Transactions => "Transactions",
            PanelKind::Investments => "Investments",
        }
    }
}

impl Display for PanelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Mounts one store per panel, lets them load concurrently and collects the
/// settled snapshots in the order given. `update_callback` runs as each panel
/// settles.
pub async fn mount_all(
    kinds: &[PanelKind],
    loader: Arc<PanelLoader>,
    update_callback: &(dyn Fn()),
) -> Vec<(PanelKind, Option<Arc<PanelSnapshot>>)> {
    let mut stores: Vec<PanelDataStore> = kinds
        .iter()
        .map(|kind| PanelDataStore::new(*kind, Arc::clone(&loader)))
        .collect();
    for store in &mut stores {
        store.mount();
    }

    let settled = stores.iter().map(|store| async move {
        let snapshot = store.settled().await;
        update_callback();
        (store.kind(), snapshot)
    });
    join_all(settled).await
}


#[cfg(test)]
pub(crate) mod testing {
    use crate::core::{Endpoint, FetchClient, FetchError, Resource};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{Barrier, Notify};

    /// Canned responses keyed by resource, with optional synchronisation hooks.
    #[derive(Default)]
    pub struct MockClient {
        responses: HashMap<Resource, Result<Value, FetchError>>,
        pub calls: AtomicUsize,
        pub params: Mutex<Vec<(Resource, Vec<(String, String)>)>>,
        barrier: Option<Arc<Barrier>>,
        gate: Option<Arc<Notify>>,
        panicking: Option<Resource>,
    }

    impl MockClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, resource: Resource, response: Result<Value, FetchError>) -> Self {
            self.responses.insert(resource, response);
            self
        }

        /// Every fetch waits on the barrier before answering.
        pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
            self.barrier = Some(barrier);
            self
        }

        /// Every fetch waits for the gate to be notified before answering.
        pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        /// Fetches of `resource` panic instead of answering.
        pub fn panicking(mut self, resource: Resource) -> Self {
            self.panicking = Some(resource);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FetchClient for MockClient {
        async fn fetch(
            &self,
            endpoint: &Endpoint,
            params: &[(String, String)],
        ) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.params
                .lock()
                .unwrap()
                .push((endpoint.resource, params.to_vec()));
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.panicking == Some(endpoint.resource) {
                panic!("mock fetch of {} panicked", endpoint.resource);
            }
            self.responses
                .get(&endpoint.resource)
                .cloned()
                .unwrap_or(Err(FetchError::Http { status: 404 }))
        }
    }
}
