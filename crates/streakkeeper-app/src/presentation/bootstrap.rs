use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::application::queries::CheckInStatusQueries;
use crate::application::services::{ReminderScheduler, ReminderService, SchedulerConfig};
use crate::presentation::state::{AppState, Queries, Repositories, Runtime, Services};
use streakkeeper_domain::check_in::CheckInRepository;
use streakkeeper_domain::clock::{Clock, SystemClock};
use streakkeeper_domain::reminder::ReminderRepository;
use streakkeeper_domain::user::UserRepository;
use streakkeeper_infrastructure::config::{AppConfig, TimeoutConfig};
use streakkeeper_infrastructure::notification::create_notifier;
use streakkeeper_infrastructure::persistence::{
    repositories::{SqliteCheckInRepository, SqliteReminderRepository, SqliteUserRepository},
    Database,
};

pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let startup_started_at = Instant::now();
    let timeouts = TimeoutConfig::from_scheduler(&config.scheduler);

    info!("Database path: {}", config.database_path.display());

    info!("🔌 Connecting to database...");
    let started_at = Instant::now();
    let database = Database::new(&config.database_path, timeouts.db_acquire).await?;
    info!(
        "✓ Database connection established ({}ms)",
        started_at.elapsed().as_millis()
    );

    info!("🔄 Running migrations...");
    let started_at = Instant::now();
    database.run_migrations().await?;
    info!(
        "✓ Migrations completed ({}ms)",
        started_at.elapsed().as_millis()
    );

    let pool = Arc::new(database.pool().clone());

    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone())) as Arc<dyn UserRepository>;
    let check_in_repo =
        Arc::new(SqliteCheckInRepository::new(pool.clone())) as Arc<dyn CheckInRepository>;
    let reminder_repo =
        Arc::new(SqliteReminderRepository::new(pool.clone())) as Arc<dyn ReminderRepository>;

    let notifier = create_notifier(&config)?;
    let clock = Arc::new(SystemClock) as Arc<dyn Clock>;

    let scheduler = Arc::new(ReminderScheduler::new(
        user_repo.clone(),
        check_in_repo.clone(),
        reminder_repo.clone(),
        notifier.clone(),
        clock.clone(),
        SchedulerConfig::from(&config.scheduler),
    ));
    let reminder_service = Arc::new(ReminderService::new(
        user_repo.clone(),
        check_in_repo.clone(),
        reminder_repo.clone(),
        notifier.clone(),
        clock.clone(),
        timeouts.notification_send,
    ));
    let status_queries = Arc::new(CheckInStatusQueries::new(
        user_repo.clone(),
        check_in_repo.clone(),
        clock,
    ));

    info!(
        "✓ App state ready ({}ms)",
        startup_started_at.elapsed().as_millis()
    );

    Ok(AppState {
        runtime: Runtime {
            config,
            db: Arc::new(database),
            notifier,
        },
        repositories: Repositories {
            user: user_repo,
            check_in: check_in_repo,
            reminder: reminder_repo,
        },
        services: Services {
            reminder: reminder_service,
            scheduler,
        },
        queries: Queries {
            status: status_queries,
        },
    })
}
