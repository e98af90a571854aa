//! The polling loop: fetch, aggregate, diff, notify.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, info, warn};

use crate::aggregate::Nations;
use crate::config::Config;
use crate::error::Result;
use crate::notify::{CollapseAlert, Notifier};
use crate::proximity::nearby_nations;
use crate::snapshot::NationSource;
use crate::tracker::CollapseTracker;

/// How often a sleeping watcher checks for shutdown.
const SHUTDOWN_POLL: Duration = Duration::from_millis(250);

/// Outcome of one successful cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub nations: usize,
    pub new_collapses: Vec<String>,
    pub delivered: usize,
    pub failed: usize,
}

/// Diff `nations` against `tracker` and build one alert per new collapse.
///
/// The tracker is updated before this returns, independently of whether the
/// alerts are ever delivered.
pub fn collapse_alerts(
    tracker: &mut CollapseTracker,
    nations: &Nations,
    radius: f64,
    map_url_template: &str,
    fly_height: i64,
) -> Vec<CollapseAlert> {
    tracker
        .detect_new_collapses(nations)
        .into_iter()
        .filter_map(|name| {
            let nation = nations.get(&name)?;
            let nearby = nearby_nations(&name, nation, nations, radius);
            Some(CollapseAlert::new(&name, nation, nearby, map_url_template, fly_height))
        })
        .collect()
}

pub struct Watcher<S, N> {
    source: S,
    notifier: N,
    tracker: CollapseTracker,
    config: Config,
}

impl<S: NationSource, N: Notifier> Watcher<S, N> {
    pub fn new(source: S, notifier: N, config: Config) -> Self {
        Self {
            source,
            notifier,
            tracker: CollapseTracker::new(),
            config,
        }
    }

    pub fn tracker(&self) -> &CollapseTracker {
        &self.tracker
    }

    /// Run one cycle.
    ///
    /// A fetch or parse error returns early with the tracker untouched.
    /// Delivery failures are counted in the report and never undo the
    /// tracker update.
    pub fn run_cycle(&mut self) -> Result<CycleReport> {
        let nations = self.source.fetch_all_nations()?;
        let alerts = collapse_alerts(
            &mut self.tracker,
            &nations,
            self.config.radius,
            &self.config.map_url_template,
            self.config.fly_height,
        );

        let mut report = CycleReport {
            nations: nations.len(),
            new_collapses: alerts.iter().map(|a| a.name.clone()).collect(),
            ..CycleReport::default()
        };
        for alert in &alerts {
            match self.notifier.notify(alert) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    warn!(nation = %alert.name, "failed to deliver alert: {err}");
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }

    /// Run cycles every `interval_secs` until `shutdown` is set.
    ///
    /// Cycles never overlap. One that overruns the interval is followed
    /// immediately by the next; missed ticks are dropped, not queued.
    pub fn run(&mut self, shutdown: &AtomicBool) {
        let interval = self.config.interval();
        info!(
            url = %self.config.url,
            interval_secs = self.config.interval_secs,
            radius = self.config.radius,
            "watching for collapsed nations"
        );

        while !shutdown.load(Ordering::SeqCst) {
            let started = Instant::now();
            match self.run_cycle() {
                Ok(report) if report.new_collapses.is_empty() => {
                    debug!(nations = report.nations, "no new collapses");
                }
                Ok(report) => info!(
                    nations = report.nations,
                    new = ?report.new_collapses,
                    delivered = report.delivered,
                    failed = report.failed,
                    "detected new collapses"
                ),
                Err(err) => warn!("cycle failed, keeping previous state: {err}"),
            }
            sleep_until(started + interval, shutdown);
        }

        info!("shutdown requested, watcher stopped");
    }
}

fn sleep_until(deadline: Instant, shutdown: &AtomicBool) {
    while !shutdown.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep((deadline - now).min(SHUTDOWN_POLL));
    }
}
