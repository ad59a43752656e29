//! Subcommands.

pub mod config;
pub mod issuers;
pub mod parse;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use ccparse_core::{IssuerRegistry, StatementConfig};

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StatementConfig> {
    if let Some(path) = config_path {
        return Ok(StatementConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(StatementConfig::from_file(&default_path)?)
    } else {
        Ok(StatementConfig::default())
    }
}

/// Build the issuer registry. A malformed registry aborts before any
/// statement is read.
pub fn load_registry(config: &StatementConfig) -> anyhow::Result<Arc<IssuerRegistry>> {
    match &config.registry.issuers_file {
        Some(path) => {
            let registry = IssuerRegistry::from_json_file(path)
                .with_context(|| format!("invalid issuer definitions in {}", path.display()))?;
            info!("Loaded {} issuers from {}", registry.len(), path.display());
            Ok(Arc::new(registry))
        }
        None => Ok(IssuerRegistry::builtin()),
    }
}
