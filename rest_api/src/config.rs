// rest_api/src/config.rs

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Server configuration, loaded from `clinic_config.yaml` next to the
/// binary's working directory. Every field has a default so the server
/// starts with no file present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub data_directory: String,
    pub uploads_directory: String,
    pub token_ttl_hours: i64,
    pub payment_gateway_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 8082,
            data_directory: "clinic_data".to_string(),
            uploads_directory: "uploads".to_string(),
            token_ttl_hours: 24,
            payment_gateway_url: None,
        }
    }
}

// Matches the `server:` key at the top of the YAML file.
#[derive(Debug, Deserialize)]
struct ApiConfigWrapper {
    server: ApiConfig,
}

/// Loads the YAML config, falling back to defaults when the file does not
/// exist. A file that exists but fails to parse is an error, not a
/// silent fallback.
pub fn load_config(path: Option<PathBuf>) -> Result<ApiConfig> {
    let path = path.unwrap_or_else(|| PathBuf::from("clinic_config.yaml"));
    if !path.exists() {
        return Ok(ApiConfig::default());
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let wrapper: ApiConfigWrapper = serde_yaml2::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(wrapper.server)
}

/// JWT signing secret from the environment (`.env` is loaded by main).
/// Falls back to a development-only secret with a warning.
pub fn jwt_secret() -> Vec<u8> {
    match env::var("CLINIC_JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret.into_bytes(),
        _ => {
            tracing::warn!("CLINIC_JWT_SECRET not set, using development secret");
            b"clinic-development-secret-do-not-use-in-prod".to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Some(PathBuf::from("does_not_exist.yaml"))).unwrap();
        assert_eq!(config.port, 8082);
        assert_eq!(config.uploads_directory, "uploads");
    }

    #[test]
    fn yaml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic_config.yaml");
        fs::write(
            &path,
            "server:\n  port: 9000\n  host: \"0.0.0.0\"\n",
        )
        .unwrap();
        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        // Unspecified fields keep their defaults.
        assert_eq!(config.token_ttl_hours, 24);
    }
}
