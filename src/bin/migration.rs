//! Applies or rolls back the embedded schema migrations.
//!
//! Usage: `migration [up|down|status|fresh]` (default `up`). The database is
//! taken from the regular configuration, so `APP__DATABASE_URL` works here too.

use sea_orm_migration::MigratorTrait;
use tracing::info;
use transport_api::{config, db, migrator::Migrator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!("Connecting to database");
    let pool = db::establish_connection_from_app_config(&cfg).await?;

    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    match command.as_str() {
        "up" => db::run_migrations(&pool).await?,
        "down" => {
            Migrator::down(&pool, Some(1)).await?;
            info!("Rolled back the latest migration");
        }
        "fresh" => {
            Migrator::fresh(&pool).await?;
            info!("Dropped all tables and re-applied every migration");
        }
        "status" => {
            for migration in Migrator::get_pending_migrations(&pool).await? {
                info!(migration = migration.name(), "Pending");
            }
            for migration in Migrator::get_applied_migrations(&pool).await? {
                info!(migration = migration.name(), "Applied");
            }
        }
        other => anyhow::bail!("unknown command '{}'; expected up, down, status or fresh", other),
    }

    Ok(())
}
