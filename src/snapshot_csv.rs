//! nation-snapshot — fetch the marker document once and dump every nation
//! to a CSV file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use collapse_watch::{export::write_nations_csv, Config, NationSource, SnapshotLoader};

#[derive(Debug, Parser)]
#[command(name = "nation-snapshot", version)]
struct Cli {
    /// TOML settings file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the marker document URL.
    #[arg(long)]
    url: Option<String>,

    /// Output CSV path.
    #[arg(short, long, default_value = "nations.csv")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("collapse_watch=info,nation_snapshot=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(url) = cli.url {
        config.url = url;
    }
    config.validate().context("invalid configuration")?;

    info!(url = %config.url, "fetching marker document");
    let nations = SnapshotLoader::new(&config)
        .fetch_all_nations()
        .context("failed to load nations")?;
    let collapsed = nations.values().filter(|n| n.collapsed).count();
    info!(nations = nations.len(), collapsed, "aggregated snapshot");

    write_nations_csv(&cli.out, &nations)
        .with_context(|| format!("failed to write {}", cli.out.display()))?;
    info!("wrote {}", cli.out.display());
    Ok(())
}
