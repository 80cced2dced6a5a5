//! Schema for the portfolio CMS. Backend-agnostic: runs on Postgres and SQLite.

pub use sea_orm_migration::prelude::*;
pub use sea_orm_migration::sea_orm;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

mod m20250301_000001_init;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250301_000001_init::Migration)]
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
    fn mutates(self) -> bool {
        !matches!(self, MigrationCommand::Status)
    }
}

/// Applied vs. defined migrations for one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub backend: String,
    pub database: String,
    pub applied: usize,
    pub defined: usize,
}

impl MigrationReport {
    pub fn pending(&self) -> usize {
        self.defined.saturating_sub(self.applied)
    }
}

/// Run `command` against `db`, logging a before/after report.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let before = report(db).await?;
    tracing::info!(
        ?command,
        backend = %before.backend,
        database = %before.database,
        applied = before.applied,
        pending = before.pending(),
        "migration starting"
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
        tracing::error!(?command, error = %e, "migration failed");
        return Err(e);
    }

    if command.mutates() {
        let after = report(db).await?;
        tracing::info!(?command, applied = after.applied, pending = after.pending(), "migration finished");
    }
    Ok(())
}

pub async fn report(db: &DatabaseConnection) -> Result<MigrationReport, DbErr> {
    let backend = db.get_database_backend();
    Ok(MigrationReport {
        backend: format!("{backend:?}"),
        database: database_name(db, backend).await?,
        applied: count_applied_migrations(db).await?,
        defined: Migrator::migrations().len(),
    })
}

async fn database_name(db: &DatabaseConnection, backend: DatabaseBackend) -> Result<String, DbErr> {
    let (sql, column) = match backend {
        DatabaseBackend::Postgres => ("SELECT current_database() AS name", "name"),
        DatabaseBackend::Sqlite => ("SELECT file FROM pragma_database_list WHERE name = 'main'", "file"),
        _ => return Ok("<unsupported>".to_string()),
    };
    let row = db
        .query_one(Statement::from_string(backend, sql.to_string()))
        .await?;
    let name = row
        .and_then(|r| r.try_get::<String>("", column).ok())
        .unwrap_or_default();
    Ok(if name.is_empty() { ":memory:".to_string() } else { name })
}

/// 0 when the migrations table does not exist yet.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Name of the newest applied migration, if any.
pub async fn get_latest_migration_version(db: &DatabaseConnection) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
