//! Watch a territory map for nations that have collapsed and report who
//! lives nearby.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod notify;
pub mod proximity;
pub mod snapshot;
pub mod territory;
pub mod tracker;
pub mod watch;

#[cfg(test)]
mod test_http;

pub use aggregate::{aggregate, NationAggregate, Nations};
pub use config::Config;
pub use error::{Result, WatchError};
pub use notify::{CollapseAlert, Notifier};
pub use snapshot::{NationSource, SnapshotLoader};
pub use tracker::CollapseTracker;
pub use watch::{CycleReport, Watcher};
