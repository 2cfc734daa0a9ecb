use anyhow::Result;
use savant::config::{Config, EnvConfig};
use savant::data::snapshot::load_snapshot;
use savant::monitoring::logger::CsvLogger;
use savant::monitoring::table::render_table;
use savant::runner::Dashboard;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("🏀 Savant starting...");

    // Load configuration
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    tracing::info!("Loading configuration from {}", config_path);
    let config = Config::load(&config_path)?;
    let env_config = EnvConfig::load()?;

    tracing::info!("Base mode: {}", config.projection.mode);
    tracing::info!("Minimum elapsed: {:.1} min", config.projection.min_elapsed_minutes);
    tracing::info!("Signal threshold: {:.1} pts", config.signal.min_edge);
    tracing::info!("Manual lines: {}", config.lines.len());

    let logger = if config.monitoring.csv_logging {
        tracing::info!("CSV log: {}", config.monitoring.csv_log_path);
        Some(CsvLogger::new(config.monitoring.csv_log_path.clone())?)
    } else {
        None
    };

    let snapshot_path = config.system.snapshot_path.clone();
    let poll_interval_secs = config.system.poll_interval_secs;
    let dashboard = Dashboard::new(config, &env_config)?;

    if poll_interval_secs == 0 {
        return run_pass(&dashboard, logger.as_ref(), &snapshot_path).await;
    }

    tracing::info!("Polling {} every {}s", snapshot_path, poll_interval_secs);
    let mut interval = tokio::time::interval(Duration::from_secs(poll_interval_secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = run_pass(&dashboard, logger.as_ref(), &snapshot_path).await {
                    tracing::error!("Pass failed: {:#}", e);
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Shutting down...");
                break;
            }
        }
    }

    Ok(())
}

async fn run_pass(dashboard: &Dashboard, logger: Option<&CsvLogger>, snapshot_path: &str) -> Result<()> {
    let games = load_snapshot(snapshot_path)?;
    let refreshed = dashboard.refresh_odds(&games).await;
    let reports = dashboard.evaluate(&games);

    println!("{}", render_table(&reports));

    let mut logged = 0;
    if let Some(logger) = logger {
        for report in &reports {
            if logger.log_report(report)? {
                logged += 1;
            }
        }
    }

    tracing::info!(
        "Pass complete: {} games, {} odds lines refreshed, {} logged",
        reports.len(),
        refreshed,
        logged
    );
    Ok(())
}
