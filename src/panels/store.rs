use super::{PanelKind, PanelLoader};
use crate::core::{PanelError, PanelSnapshot};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

type SnapshotCell = Option<Arc<PanelSnapshot>>;

/// Owns the fetch, derive and publish lifecycle of a single panel.
///
/// The published value is `None` while the panel is unmounted (idle), and
/// otherwise the latest immutable `PanelSnapshot`. Each load attempt gets a
/// new generation; results belonging to an older generation are dropped, so
/// a late response can never overwrite a retry or revive an unmounted panel.
pub struct PanelDataStore {
    kind: PanelKind,
    loader: Arc<PanelLoader>,
    state: Arc<watch::Sender<SnapshotCell>>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl PanelDataStore {
    pub fn new(kind: PanelKind, loader: Arc<PanelLoader>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            kind,
            loader,
            state: Arc::new(state),
            generation: 0,
            task: None,
        }
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn is_mounted(&self) -> bool {
        self.task.is_some()
    }

    /// Starts loading. A store that is already mounted is left untouched, so
    /// repeated calls never issue duplicate fetches.
    pub fn mount(&mut self) -> bool {
        if self.is_mounted() {
            debug!(panel = %self.kind, "Panel already mounted");
            return false;
        }
        self.dispatch();
        true
    }

    /// Reloads a panel that reached `Ready` or `Failed`, publishing a brand new
    /// snapshot. Ignored while idle or still loading.
    pub fn retry(&mut self) -> bool {
        match self.snapshot() {
            Some(snapshot) if snapshot.is_terminal() => {
                self.dispatch();
                true
            }
            _ => false,
        }
    }

    /// Cancels any in-flight load and returns the panel to idle.
    pub fn unmount(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        // Bump so an already-running task cannot match on publish
        self.generation += 1;
        self.state.send_replace(None);
        debug!(panel = %self.kind, "Panel unmounted");
    }

    pub fn snapshot(&self) -> SnapshotCell {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SnapshotCell> {
        self.state.subscribe()
    }

    /// Waits until the current attempt reaches a terminal state.
    ///
    /// Returns `None` straight away when the panel is not mounted.
    pub async fn settled(&self) -> SnapshotCell {
        let mut rx = self.state.subscribe();
        let snapshot = rx
            .wait_for(|cell| cell.as_ref().is_none_or(|s| s.is_terminal()))
            .await
            .ok()?;
        snapshot.clone()
    }

    fn dispatch(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        self.state
            .send_replace(Some(Arc::new(PanelSnapshot::loading(generation))));
        debug!(panel = %self.kind, generation, "Panel loading");

        let kind = self.kind;
        let loader = Arc::clone(&self.loader);
        let state = Arc::clone(&self.state);
        self.task = Some(tokio::spawn(async move {
            // A panicking load still has to settle the panel
            let result = AssertUnwindSafe(loader.load(kind))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(PanelError::Crashed(panic_message(payload))));
            if let Err(e) = &result {
                debug!(panel = %kind, generation, error = %e, "Panel failed");
            }
            let snapshot = Arc::new(PanelSnapshot::from_result(generation, result));

            let published = state.send_if_modified(|cell| {
                let is_current = cell
                    .as_ref()
                    .is_some_and(|s| s.generation() == generation && !s.is_terminal());
                if is_current {
                    *cell = Some(snapshot);
                }
                is_current
            });
            if !published {
                debug!(panel = %kind, generation, "Dropping stale panel result");
            }
        }));
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

impl Drop for PanelDataStore {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
