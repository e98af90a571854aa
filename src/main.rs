use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use collapse_watch::{
    notify::{Fanout, LogNotifier, WebhookNotifier},
    Config, Notifier, SnapshotLoader, Watcher,
};

/// Poll the territory map and report nations that have just collapsed.
#[derive(Debug, Parser)]
#[command(name = "collapse-watch", version)]
struct Cli {
    /// TOML settings file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the marker document URL.
    #[arg(long)]
    url: Option<String>,

    /// Override the polling interval in seconds.
    #[arg(long)]
    interval: Option<u64>,

    /// Override the proximity radius in blocks.
    #[arg(long)]
    radius: Option<f64>,

    /// Run a single cycle and exit.
    #[arg(long)]
    once: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<(Config, bool)> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(url) = self.url {
            config.url = url;
        }
        if let Some(interval) = self.interval {
            config.interval_secs = interval;
        }
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        config.validate().context("invalid configuration")?;
        Ok((config, self.once))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("collapse_watch=info")),
        )
        .init();

    if let Err(err) = run() {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let (config, once) = Cli::parse().into_config()?;

    let mut sinks: Vec<Box<dyn Notifier>> = vec![Box::new(LogNotifier)];
    if let Some(hook) = &config.webhook_url {
        info!("delivering alerts to webhook as well");
        sinks.push(Box::new(WebhookNotifier::new(hook.clone(), &config)));
    }

    let source = SnapshotLoader::new(&config);
    let mut watcher = Watcher::new(source, Fanout(sinks), config);

    if once {
        let report = watcher.run_cycle().context("cycle failed")?;
        info!(
            nations = report.nations,
            new = ?report.new_collapses,
            delivered = report.delivered,
            failed = report.failed,
            "single cycle complete"
        );
        return Ok(());
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        if let Err(err) = ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::SeqCst);
        }) {
            warn!("Failed to install Ctrl+C handler: {err}");
        }
    }

    watcher.run(&shutdown);
    Ok(())
}
