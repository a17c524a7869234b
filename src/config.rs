use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the configured backend URL.
pub const BACKEND_URL_ENV: &str = "LEAD_CAPTURE_BACKEND_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the lead service, including its `/api` prefix.
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub auto_redirect_secs: u32,
    pub lead_source: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000/api".to_string(),
            request_timeout_secs: 10,
            auto_redirect_secs: 5,
            lead_source: "landing_page".to_string(),
        }
    }
}

impl AppConfig {
    /// Directory holding `config.json`, e.g. `~/.config/lead-capture`.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("lead-capture"))
    }

    pub fn load(config_dir: &Path) -> Self {
        let mut config = Self::from_dir(config_dir);

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            config.apply_backend_override(&url);
        }

        config
    }

    fn from_dir(config_dir: &Path) -> Self {
        let config_path = config_dir.join("config.json");
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    log::warn!("Ignoring malformed {}: {}", config_path.display(), e);
                    Self::default()
                }),
                Err(_) => Self::default(),
            }
        } else {
            let c = Self::default();
            if let Err(e) = c.save(config_dir) {
                log::warn!("Could not write default config: {}", e);
            }
            c
        }
    }

    fn apply_backend_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            self.backend_url = url.trim_end_matches('/').to_string();
        }
    }

    pub fn save(&self, config_dir: &Path) -> Result<(), String> {
        std::fs::create_dir_all(config_dir)
            .map_err(|e| format!("Failed to create {}: {}", config_dir.display(), e))?;
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(config_dir.join("config.json"), content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_dir(dir.path());

        assert_eq!(config, AppConfig::default());
        assert!(dir.path().join("config.json").exists());
    }

    #[test]
    fn saved_config_is_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            backend_url: "https://leads.example/api".to_string(),
            auto_redirect_secs: 3,
            ..AppConfig::default()
        };
        config.save(dir.path()).unwrap();

        assert_eq!(AppConfig::from_dir(dir.path()), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"backend_url": "https://leads.example/api"}"#,
        )
        .unwrap();

        let config = AppConfig::from_dir(dir.path());
        assert_eq!(config.backend_url, "https://leads.example/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.auto_redirect_secs, 5);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{not json").unwrap();

        assert_eq!(AppConfig::from_dir(dir.path()), AppConfig::default());
    }

    #[test]
    fn backend_override_trims_trailing_slash() {
        let mut config = AppConfig::default();
        config.apply_backend_override(" https://leads.example/api/ ");
        assert_eq!(config.backend_url, "https://leads.example/api");

        config.apply_backend_override("");
        assert_eq!(config.backend_url, "https://leads.example/api");
    }

    #[test]
    fn load_prefers_backend_url_from_environment() {
        let dir = tempfile::tempdir().unwrap();
        AppConfig {
            backend_url: "https://file.example/api".to_string(),
            ..AppConfig::default()
        }
        .save(dir.path())
        .unwrap();

        std::env::set_var(BACKEND_URL_ENV, "https://env.example/api/");
        let overridden = AppConfig::load(dir.path());
        std::env::remove_var(BACKEND_URL_ENV);
        let from_file = AppConfig::load(dir.path());

        assert_eq!(overridden.backend_url, "https://env.example/api");
        assert_eq!(overridden.auto_redirect_secs, 5);
        assert_eq!(from_file.backend_url, "https://file.example/api");
    }
}
