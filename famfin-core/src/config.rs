//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "api": { "baseUrl": "http://172.20.10.3:5000/api", "timeoutSecs": 120 },
//!   "dashboard": { "defaultPeriodMonths": 6 }
//! }
//! ```
//! Keys this crate does not manage are kept when the file is saved.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::adapters::api::{API_URL_ENV, DEFAULT_BASE_URL};
use crate::domain::result::{Error, Result};
use crate::domain::DashboardPeriod;

pub const SETTINGS_FILE: &str = "settings.json";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api: ApiSettings,
    #[serde(default)]
    dashboard: DashboardSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DashboardSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_period_months: Option<u32>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    /// True when `FAMFIN_API_URL` supplied the base URL
    pub api_url_from_env: bool,
    pub request_timeout: Duration,
    pub default_period: DashboardPeriod,
    /// Settings that were rejected and replaced by their defaults
    pub issues: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            api_url_from_env: false,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_period: DashboardPeriod::default(),
            issues: Vec::new(),
        }
    }
}

/// Accept only absolute http(s) URLs
pub fn validate_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| Error::config(format!("Invalid API URL '{}': {}", trimmed, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        other => Err(Error::config(format!(
            "Unsupported API URL scheme '{}' (use http or https)",
            other
        ))),
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

fn write_settings(data_dir: &Path, settings: &SettingsFile) -> Result<()> {
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(data_dir.join(SETTINGS_FILE), content)?;
    Ok(())
}

impl Config {
    /// Load config from the data directory.
    ///
    /// A missing or malformed file yields defaults, as does any single
    /// setting that cannot be used (recorded in `issues`).
    /// `FAMFIN_API_URL` overrides the stored base URL.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;
        let env_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        Ok(Self::resolve(raw, env_url))
    }

    fn resolve(raw: SettingsFile, env_url: Option<String>) -> Self {
        let defaults = Self::default();
        let mut issues = Vec::new();

        let stored_url = raw.api.base_url.and_then(|url| match validate_base_url(&url) {
            Ok(url) => Some(url),
            Err(e) => {
                issues.push(format!("api.baseUrl ignored: {}", e));
                None
            }
        });
        let env_url = env_url.and_then(|url| match validate_base_url(&url) {
            Ok(url) => Some(url),
            Err(e) => {
                issues.push(format!("{} ignored: {}", API_URL_ENV, e));
                None
            }
        });
        let (api_base_url, api_url_from_env) = match (env_url, stored_url) {
            (Some(url), _) => (url, true),
            (None, Some(url)) => (url, false),
            (None, None) => (defaults.api_base_url, false),
        };

        let default_period = match raw.dashboard.default_period_months {
            Some(months) => DashboardPeriod::from_months(months).unwrap_or_else(|_| {
                issues.push(format!(
                    "dashboard.defaultPeriodMonths ignored: unsupported value {}",
                    months
                ));
                defaults.default_period
            }),
            None => defaults.default_period,
        };

        let request_timeout = match raw.api.timeout_secs {
            Some(0) => {
                issues.push("api.timeoutSecs ignored: must be positive".to_string());
                defaults.request_timeout
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.request_timeout,
        };

        Self {
            api_base_url,
            api_url_from_env,
            request_timeout,
            default_period,
            issues,
        }
    }

    /// Store a new API base URL in settings.json.
    ///
    /// Only the new URL is checked; other stored settings are written back
    /// untouched, even ones `load` would reject.
    pub fn store_api_base_url(data_dir: &Path, raw_url: &str) -> Result<String> {
        let url = validate_base_url(raw_url)?;
        std::fs::create_dir_all(data_dir)?;
        let mut settings = read_settings(data_dir)?;
        settings.api.base_url = Some(url.clone());
        write_settings(data_dir, &settings)?;
        Ok(url)
    }
}
