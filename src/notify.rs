//! Alert payloads and the sinks they are handed to.
//!
//! A sink only receives structured data; wording and presentation are up to
//! whatever sits behind it.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::NationAggregate;
use crate::config::Config;
use crate::error::{Result, WatchError};

/// Everything known about one newly collapsed nation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollapseAlert {
    pub name: String,
    pub centroid_x: f64,
    pub centroid_z: f64,
    pub total_area: f64,
    pub nearby: Vec<String>,
    pub map_url: String,
}

impl CollapseAlert {
    pub fn new(
        name: &str,
        nation: &NationAggregate,
        nearby: Vec<String>,
        map_url_template: &str,
        fly_height: i64,
    ) -> Self {
        Self {
            name: name.to_string(),
            centroid_x: nation.centroid_x,
            centroid_z: nation.centroid_z,
            total_area: nation.total_area,
            nearby,
            map_url: map_url(map_url_template, nation.centroid_x, nation.centroid_z, fly_height),
        }
    }
}

/// Fill a viewer link template. Coordinates are truncated toward zero.
pub fn map_url(template: &str, x: f64, z: f64, fly_height: i64) -> String {
    template
        .replace("{x}", &(x as i64).to_string())
        .replace("{y}", &fly_height.to_string())
        .replace("{z}", &(z as i64).to_string())
}

/// Receives alerts for newly collapsed nations.
pub trait Notifier {
    fn notify(&self, alert: &CollapseAlert) -> Result<()>;
}

/// Writes every alert to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, alert: &CollapseAlert) -> Result<()> {
        info!(
            nation = %alert.name,
            x = alert.centroid_x as i64,
            z = alert.centroid_z as i64,
            area = alert.total_area as i64,
            nearby = ?alert.nearby,
            map = %alert.map_url,
            "new collapsed nation"
        );
        Ok(())
    }
}

/// POSTs each alert as a JSON body to a fixed URL.
pub struct WebhookNotifier {
    agent: ureq::Agent,
    url: String,
    user_agent: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.fetch_timeout())
            .build();
        Self {
            agent,
            url: url.into(),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, alert: &CollapseAlert) -> Result<()> {
        let body = serde_json::to_string(alert).map_err(|e| WatchError::Notify(e.to_string()))?;
        self.agent
            .post(&self.url)
            .set("User-Agent", &self.user_agent)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|e| WatchError::Notify(format!("POST {}: {e}", self.url)))?;
        Ok(())
    }
}

/// Fans one alert out to several sinks. Every sink is tried; the first
/// failure is returned after the rest have run.
pub struct Fanout(pub Vec<Box<dyn Notifier>>);

impl Notifier for Fanout {
    fn notify(&self, alert: &CollapseAlert) -> Result<()> {
        let mut first_err = None;
        for sink in &self.0 {
            if let Err(e) = sink.notify(alert) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
