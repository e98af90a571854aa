//! Static settings, read once at startup from an optional TOML file.

use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::{Result, WatchError};

pub const DEFAULT_URL: &str = "https://map.rearth.xyz/war/tiles/_markers_/marker_world.json";
pub const DEFAULT_MARKERSET: &str = "towny.markerset";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_COLLAPSE_MARKER: &str = "崩壊";
pub const DEFAULT_MAP_URL_TEMPLATE: &str = "https://map.rearth.xyz/war/#world;flat;{x},{y},{z};0";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Marker document endpoint.
    pub url: String,
    /// Key under `sets` holding the territory areas.
    pub markerset: String,
    pub user_agent: String,
    pub interval_secs: u64,
    /// Proximity radius in map blocks.
    pub radius: f64,
    pub collapse_marker: String,
    /// Viewer link with `{x}`, `{y}` and `{z}` placeholders.
    pub map_url_template: String,
    /// Value substituted for `{y}` in `map_url_template`.
    pub fly_height: i64,
    pub fetch_timeout_secs: u64,
    /// Optional endpoint alerts are POSTed to as JSON.
    pub webhook_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            markerset: DEFAULT_MARKERSET.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            interval_secs: 60,
            radius: 1000.0,
            collapse_marker: DEFAULT_COLLAPSE_MARKER.to_string(),
            map_url_template: DEFAULT_MAP_URL_TEMPLATE.to_string(),
            fly_height: 64,
            fetch_timeout_secs: 30,
            webhook_url: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| WatchError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Reject settings no cycle could ever succeed with.
    pub fn validate(&self) -> Result<()> {
        check_http_url("url", &self.url)?;
        if let Some(hook) = &self.webhook_url {
            check_http_url("webhook_url", hook)?;
        }
        if self.markerset.is_empty() {
            return Err(WatchError::Config("markerset must not be empty".into()));
        }
        if self.collapse_marker.is_empty() {
            return Err(WatchError::Config("collapse_marker must not be empty".into()));
        }
        if self.interval_secs == 0 {
            return Err(WatchError::Config("interval_secs must be positive".into()));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(WatchError::Config("fetch_timeout_secs must be positive".into()));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(WatchError::Config(format!(
                "radius must be a non-negative number, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}

fn check_http_url(key: &str, url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| WatchError::Config(format!("{key} must be an http(s) URL, got {url:?}")))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(WatchError::Config(format!("{key} has no valid host: {url:?}")));
    }
    Ok(())
}
