use std::path::PathBuf;

use streakkeeper_infrastructure::logging;
use streakkeeper_lib::presentation::startup::StartupConfig;
use streakkeeper_lib::presentation::state::AppState;

const CONFIG_ENV: &str = "STREAKKEEPER_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config").join("streakkeeper.json"));
    let startup = StartupConfig::load(config_path);
    let log_dir = startup.log_dir();

    match logging::init_logger(&log_dir) {
        Ok(()) => {
            tracing::info!("🚀 StreakKeeper starting...");
            tracing::info!("📝 File logging initialized at: {}", log_dir.display());
        }
        Err(e) => {
            eprintln!("⚠️  Failed to initialize file logging: {}", e);
            eprintln!("   Falling back to console logging only");
            logging::init_console_fallback();
        }
    }

    let config = startup.finish()?;

    let state = AppState::new(config).await.map_err(|e| {
        tracing::error!("❌ Failed to initialize app state: {}", e);
        e
    })?;

    let scheduler = state.services.scheduler.clone();
    scheduler.start().await;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");

    scheduler.stop().await;
    tracing::info!("👋 StreakKeeper stopped");

    Ok(())
}
