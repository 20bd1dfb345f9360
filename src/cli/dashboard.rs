use super::{render, ui};
use crate::panels::{self, PanelKind, PanelLoader};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Loads the given panels side by side and prints each one as it would be
/// laid out on the dashboard. A failed panel prints its own error and never
/// affects the others.
pub async fn run(
    kinds: &[PanelKind],
    loader: Arc<PanelLoader>,
    currency_symbol: &str,
) -> Result<()> {
    let pb = ui::new_progress_bar(kinds.len() as u64, "Loading panels...");
    let results = panels::mount_all(kinds, loader, &|| pb.inc(1)).await;
    pb.finish_and_clear();

    let count = results.len();
    for (i, (kind, snapshot)) in results.into_iter().enumerate() {
        debug!(panel = %kind, status = ?snapshot.as_ref().map(|s| s.status()), "Rendering panel");
        println!(
            "{}",
            render::render_panel(kind, snapshot.as_deref(), currency_symbol)
        );
        if i < count - 1 {
            ui::print_separator();
        }
    }

    Ok(())
}
