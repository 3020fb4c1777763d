//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;
pub mod format;

use std::path::{Path, PathBuf};

use tracing::debug;

use ccstmt_core::CcstmtConfig;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ccstmt")
        .join("config.json")
}

/// Load configuration from `--config`, else the default location, else
/// built-in defaults. The result is validated.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CcstmtConfig> {
    let config = match path {
        Some(path) => CcstmtConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                debug!("Using config file {}", default_path.display());
                CcstmtConfig::from_file(&default_path)?
            } else {
                CcstmtConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}
