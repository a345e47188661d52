pub use sea_orm_migration::prelude::*;
pub use sea_orm::{ConnectionTrait, DatabaseConnection};
use sea_orm_migration::sea_orm::{DatabaseBackend, Statement};

mod m20250101_000001_create_users; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_users::Migration)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl MigrationCommand {
    /// Commands that may change the schema.
    fn mutates(self) -> bool {
        !matches!(self, MigrationCommand::Status)
    }
}

/// Run `command` against `db`, logging the applied/defined counts around it.
///
/// Shared by the backend's startup path and the migration CLI.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let before = MigrationState::capture(db).await?;
    tracing::info!(
        ?command,
        database = %before.database,
        applied = before.applied,
        defined = before.defined,
        "running migrations"
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    if let Err(e) = result {
        tracing::error!(?command, error = %e, "migration command failed");
        return Err(e);
    }

    if command.mutates() {
        let after = MigrationState::capture(db).await?;
        tracing::info!(
            ?command,
            applied = after.applied,
            defined = after.defined,
            "migrations finished"
        );
    } else {
        tracing::info!(?command, "migration status reported");
    }

    Ok(())
}

struct MigrationState {
    database: String,
    applied: usize,
    defined: usize,
}

impl MigrationState {
    async fn capture(db: &DatabaseConnection) -> Result<Self, DbErr> {
        Ok(Self {
            database: current_database(db).await?,
            applied: count_applied_migrations(db).await.unwrap_or(0),
            defined: Migrator::migrations().len(),
        })
    }
}

async fn current_database(db: &DatabaseConnection) -> Result<String, DbErr> {
    let backend = db.get_database_backend();
    if backend != DatabaseBackend::Postgres {
        return Ok(format!("{backend:?}"));
    }

    let row = db
        .query_one(Statement::from_string(
            backend,
            "SELECT current_database() AS name".to_string(),
        ))
        .await?;

    match row {
        Some(row) => row.try_get("", "name"),
        None => Ok("<unknown>".to_string()),
    }
}

/// Number of applied migrations; 0 before the bookkeeping table exists.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Name of the newest applied migration, if any.
pub async fn get_latest_migration_version(
    db: &DatabaseConnection,
) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
