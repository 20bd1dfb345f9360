pub mod cli;
pub mod core;
pub mod panels;
pub mod providers;

use crate::core::PanelSnapshot;
use crate::core::config::AppConfig;
use crate::panels::{PanelKind, PanelLoader};
use crate::providers::HttpFetchClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Dashboard,
    Panel(PanelKind),
}

impl AppCommand {
    pub fn panels(&self) -> Vec<PanelKind> {
        match self {
            AppCommand::Dashboard => PanelKind::ALL.to_vec(),
            AppCommand::Panel(kind) => vec![*kind],
        }
    }
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Wires the HTTP client and panel loader described by `config`.
pub fn build_loader(config: &AppConfig) -> Result<Arc<PanelLoader>> {
    let client = HttpFetchClient::new(&config.backend.base_url, config.backend.timeout())?;
    Ok(Arc::new(PanelLoader::new(Arc::new(client), config)))
}

/// Loads the given panels without rendering them.
pub async fn load_panels(
    config: &AppConfig,
    kinds: &[PanelKind],
) -> Result<Vec<(PanelKind, Option<Arc<PanelSnapshot>>)>> {
    let loader = build_loader(config)?;
    Ok(panels::mount_all(kinds, loader, &|| ()).await)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("finpanel starting...");

    let config = load_config(config_path)?;
    let loader = build_loader(&config)?;

    cli::dashboard::run(&command.panels(), loader, &config.currency_symbol).await
}
