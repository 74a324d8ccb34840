use crate::api::{ApiClient, AuthService};
use crate::error::{ApiError, ConfigError};
use crate::session::{Navigator, Session};
use crate::storage::{CookieOptions, SameSite, TokenStore};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

pub const BACKEND_URL_ENV: &str = "CLINIC_DASHBOARD_BACKEND_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    /// Where the message endpoints live, relative to `backend_url`.
    pub api_prefix: String,
    pub token_max_age_hours: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:3000".into(),
            api_prefix: "/api/webhooks".into(),
            token_max_age_hours: 24,
        }
    }
}

impl AppConfig {
    fn toml_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("clinic-dashboard.toml"))
    }

    /// Config file if readable, defaults otherwise, then the environment.
    pub fn load() -> Self {
        let from_file = Self::toml_path().and_then(|path| match Self::load_from(&path) {
            Ok(cfg) => Some(cfg),
            Err(ConfigError::Io(_)) => None,
            Err(e) => {
                log::warn!("ignoring {}: {e}", path.display());
                None
            }
        });
        from_file
            .unwrap_or_default()
            .with_env_override(|key| std::env::var(key).ok())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::toml_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn with_env_override(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.backend_url = url;
        }
        self
    }

    pub fn backend(&self) -> Result<Url, url::ParseError> {
        Url::parse(&crate::utils::normalize_url(&self.backend_url))
    }

    /// An age too large to represent falls back to the one-day default.
    pub fn cookie_options(&self) -> CookieOptions {
        let defaults = CookieOptions::default();
        let max_age = chrono::Duration::try_hours(self.token_max_age_hours.max(1)).unwrap_or_else(|| {
            log::warn!("token_max_age_hours = {} is out of range, using the default", self.token_max_age_hours);
            defaults.max_age
        });
        CookieOptions { path: "/".into(), max_age, same_site: SameSite::Strict }
    }
}

/// Everything a view needs, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub session: Session,
    pub api: ApiClient,
    pub auth: AuthService,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let base = config.backend()?;
        let session = Session::new(store, navigator);
        let api = ApiClient::new(base.clone(), &config.api_prefix, session.clone())?;
        let auth = AuthService::new(base, session.clone())?;
        log::info!("backend at {}", config.backend_url);
        Ok(Self { config, session, api, auth })
    }
}
