use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use agent::config::Config;
use agent::jobs::{
    AnalysisRefreshJob, GoalSyncJob, JobScheduler, MidnightResetJob, WatchtimeMonitorJob,
};
use agent::logging::init_logging;
use agent::services::{
    BridgeUsageSource, GoalService, MlAnalysisService, SpoolNotificationSink, UsageStatsService,
};
use persistence::repositories::{
    AnalysisCacheRepository, GoalRepository, MonitorStateRepository, StreakRepository,
};
use persistence::{FileStore, KeyValueStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config.logging);

    info!(
        "Starting Wellbeing Monitor agent v{}",
        env!("CARGO_PKG_VERSION")
    );

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage.path).await?);

    let sink = Arc::new(SpoolNotificationSink::new(&config.storage.notify_path));
    let usage = Arc::new(UsageStatsService::new(BridgeUsageSource::new(
        &config.storage.usage_path,
    )));

    let goals = Arc::new(GoalService::new(
        GoalRepository::new(store.clone()),
        StreakRepository::new(store.clone()),
        sink.clone(),
    ));
    // Seeds the default goals on first run
    let loaded = goals.get_goals().await;
    info!(goals = loaded.len(), "Goals loaded");

    let analysis = Arc::new(MlAnalysisService::new(
        config.ml.clone(),
        AnalysisCacheRepository::new(store.clone()),
    )?);

    let monitor_state = MonitorStateRepository::new(store);

    let mut scheduler = JobScheduler::new();
    scheduler.register(WatchtimeMonitorJob::new(
        usage.clone(),
        monitor_state.clone(),
        sink,
        config.monitor.clone(),
    ));
    scheduler.register(GoalSyncJob::new(
        usage.clone(),
        goals.clone(),
        config.monitor.sync_interval_secs,
    ));
    scheduler.register(AnalysisRefreshJob::new(
        usage,
        analysis,
        config.ml.history_days,
    ));
    scheduler.register(MidnightResetJob::new(goals, monitor_state));
    scheduler.start();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    Ok(())
}
