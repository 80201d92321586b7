//! Periodic maintenance job that auto-closes overdue tasks.
//!
//! Builds the `PostgreSQL`-backed tracking service and invokes the
//! auto-close sweep every 15 minutes, logging the number of tasks closed
//! on each run. Pass `--once` to perform a single sweep and exit, which
//! suits external schedulers such as cron.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use gantt::config::{DatabaseConfig, Limits};
use gantt::project::adapters::postgres::PostgresProjectRepository;
use gantt::project::services::{ProjectService, ServiceLimits};
use mockable::DefaultClock;
use std::sync::Arc;
use std::time::Duration;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service wired to the `PostgreSQL` repository.
type SweeperService = ProjectService<PostgresProjectRepository<DefaultClock>, DefaultClock>;

/// Interval between sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing();

    let once = std::env::args().any(|arg| arg == "--once");

    let limits = Limits::from_env()?;
    let database = DatabaseConfig::from_env()?;

    let manager = ConnectionManager::<PgConnection>::new(database.url());
    let pool = Pool::builder().build(manager)?;
    let clock = Arc::new(DefaultClock);
    let repository = Arc::new(PostgresProjectRepository::new(pool, Arc::clone(&clock)));
    let service = ProjectService::new(
        repository,
        clock,
        ServiceLimits {
            max_projects: limits.max_projects,
            max_tasks: limits.max_tasks,
        },
    );

    if once {
        run_sweep(&service).await;
        return Ok(());
    }

    tracing::info!(interval_secs = SWEEP_INTERVAL.as_secs(), "sweeper started");
    let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        ticker.tick().await;
        run_sweep(&service).await;
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Runs one sweep, logging the outcome. Failures are logged rather than
/// propagated so a transient database outage does not kill the scheduler.
async fn run_sweep(service: &SweeperService) {
    match service.autoclose_overdue_tasks().await {
        Ok(count) => tracing::info!(count, "auto-closed overdue tasks"),
        Err(err) => tracing::error!(error = %err, "auto-close sweep failed"),
    }
}
