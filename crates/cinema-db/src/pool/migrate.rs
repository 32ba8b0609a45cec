//! Schema migrations shipped with this crate

use std::path::Path;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;

/// Apply pending migrations from `crates/cinema-db/migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = Migrator::new(dir).await?;
    migrator.run(pool).await?;
    tracing::info!(count = migrator.iter().count(), "Database migrations applied");
    Ok(())
}
