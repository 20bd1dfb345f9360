use crate::core::config::{AppConfig, DEFAULT_CONFIG};
use anyhow::{Context, Result};
use std::path::Path;

/// Writes the default configuration, refusing to overwrite an existing file.
pub fn run(config_path: Option<&str>) -> Result<()> {
    let path = match config_path {
        Some(p) => Path::new(p).to_path_buf(),
        None => AppConfig::default_config_path()?,
    };

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
