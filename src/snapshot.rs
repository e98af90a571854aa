//! snapshot.rs — fetch the marker document and turn it into nations.
//!
//! The document served by the map looks like
//!
//! ```text
//! { "sets": { "<markerset>": { "areas": { "<id>": { "label": "...",
//!     "x": [..], "z": [..], "desc": "..." }, ... } } } }
//! ```
//!
//! Everything outside `sets.<markerset>.areas` is ignored.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::aggregate::{aggregate, Nations};
use crate::config::Config;
use crate::error::{Result, WatchError};
use crate::territory::TerritoryRecord;

/// Anything that can produce a full nation snapshot.
pub trait NationSource {
    fn fetch_all_nations(&self) -> Result<Nations>;
}

// ---------------------------------------------------------------------------
// Marker document model
// ---------------------------------------------------------------------------

/// One polygon marker. Missing fields fall back to empty values; fields of
/// the wrong type make the whole document malformed.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawArea {
    label: Option<String>,
    x: Vec<f64>,
    z: Vec<f64>,
    desc: Option<String>,
}

impl RawArea {
    fn into_record(self, collapse_marker: &str) -> TerritoryRecord {
        TerritoryRecord::from_coords(
            self.label.unwrap_or_default(),
            &self.x,
            &self.z,
            self.desc.as_deref().unwrap_or(""),
            collapse_marker,
        )
    }
}

/// Extract territory records from an already-parsed marker document.
pub fn parse_document(doc: &Value, markerset: &str, collapse_marker: &str) -> Result<Vec<TerritoryRecord>> {
    let areas = doc
        .get("sets")
        .ok_or_else(|| WatchError::Malformed("missing `sets`".into()))?
        .get(markerset)
        .ok_or_else(|| WatchError::Malformed(format!("missing marker set `{markerset}`")))?
        .get("areas")
        .ok_or_else(|| WatchError::Malformed(format!("marker set `{markerset}` has no `areas`")))?
        .as_object()
        .ok_or_else(|| WatchError::Malformed("`areas` is not an object".into()))?;

    areas
        .iter()
        .map(|(id, raw)| {
            RawArea::deserialize(raw)
                .map(|area| area.into_record(collapse_marker))
                .map_err(|e| WatchError::Malformed(format!("area `{id}`: {e}")))
        })
        .collect()
}

/// Parse a marker document body and aggregate it into nations.
pub fn nations_from_json(body: &str, markerset: &str, collapse_marker: &str) -> Result<Nations> {
    let doc: Value = serde_json::from_str(body)
        .map_err(|e| WatchError::Transport(format!("response is not JSON: {e}")))?;
    let records = parse_document(&doc, markerset, collapse_marker)?;
    Ok(aggregate(&records))
}

// ---------------------------------------------------------------------------
// HTTP loader
// ---------------------------------------------------------------------------

/// Fetches the live marker document over HTTP(S).
pub struct SnapshotLoader {
    agent: ureq::Agent,
    url: String,
    user_agent: String,
    markerset: String,
    collapse_marker: String,
}

impl SnapshotLoader {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.fetch_timeout())
            .build();
        Self {
            agent,
            url: config.url.clone(),
            user_agent: config.user_agent.clone(),
            markerset: config.markerset.clone(),
            collapse_marker: config.collapse_marker.clone(),
        }
    }

    fn fetch_document(&self) -> Result<Value> {
        debug!(url = %self.url, "fetching marker document");
        let resp = self
            .agent
            .get(&self.url)
            .set("User-Agent", &self.user_agent)
            .call()?;
        // Large worlds exceed the into_string size cap; stream the body instead.
        serde_json::from_reader(resp.into_reader())
            .map_err(|e| WatchError::Transport(format!("response is not JSON: {e}")))
    }
}

impl NationSource for SnapshotLoader {
    fn fetch_all_nations(&self) -> Result<Nations> {
        let doc = self.fetch_document()?;
        let records = parse_document(&doc, &self.markerset, &self.collapse_marker)?;
        debug!(records = records.len(), "parsed territory records");
        Ok(aggregate(&records))
    }
}
