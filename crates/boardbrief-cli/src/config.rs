use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// On-disk client settings.
#[derive(Debug, Default, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api_endpoint: Option<String>,
}

impl ClientConfig {
    /// Load settings from a JSON file. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        Ok(Some(config))
    }
}

/// Pick the summarize endpoint: explicit value first, then the config file.
pub fn resolve_endpoint(explicit: Option<String>, config_path: &Path) -> Result<String> {
    if let Some(endpoint) = explicit.filter(|e| !e.trim().is_empty()) {
        return Ok(endpoint);
    }

    match ClientConfig::load(config_path)? {
        None => bail!(
            "API endpoint not provided and {} not found\n\n\
             Please either:\n  \
             1. Use --api-endpoint (or BOARDBRIEF_API_ENDPOINT)\n  \
             2. Create {} with {{\"api_endpoint\": \"...\"}}",
            config_path.display(),
            config_path.display()
        ),
        Some(ClientConfig {
            api_endpoint: Some(endpoint),
        }) if !endpoint.trim().is_empty() => Ok(endpoint),
        Some(_) => bail!(
            "API endpoint not configured: {} has no api_endpoint",
            config_path.display()
        ),
    }
}
