//! Embedded migrations for `power_data`, one directory per backend.

use anyhow::anyhow;
use diesel::{Connection, PgConnection, SqliteConnection, connection::SimpleConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::db::{Backend, classify_url};

/// Postgres migrations: NUMERIC value column plus table/column comments.
pub const PG_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/postgres");

/// SQLite migrations: same table, REAL value column, no comments.
pub const SQLITE_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/sqlite");

/// Applies pending migrations on an open SQLite connection.
pub fn migrate_sqlite(conn: &mut SqliteConnection) -> anyhow::Result<()> {
    conn.run_pending_migrations(SQLITE_MIGRATIONS)
        .map_err(|e| anyhow!(e))?;
    Ok(())
}

/// Applies pending migrations on an open Postgres connection.
pub fn migrate_postgres(conn: &mut PgConnection) -> anyhow::Result<()> {
    conn.run_pending_migrations(PG_MIGRATIONS)
        .map_err(|e| anyhow!(e))?;
    Ok(())
}

/// Runs pending Diesel migrations on a SQLite database at the given path.
///
/// Sets the journal mode to WAL first.
pub fn run_sqlite(path: &str) -> anyhow::Result<()> {
    let mut conn = SqliteConnection::establish(path)?;
    conn.batch_execute("PRAGMA journal_mode=WAL;")?;
    migrate_sqlite(&mut conn)
}

/// Runs pending Diesel migrations on a PostgreSQL database at the given URL.
pub fn run_postgres(url: &str) -> anyhow::Result<()> {
    let mut conn = PgConnection::establish(url)?;
    migrate_postgres(&mut conn)
}

/// Runs pending migrations for `database_url`, picking the backend from its scheme.
///
/// See [`classify_url`] for the accepted forms.
pub fn run_all(database_url: &str) -> anyhow::Result<()> {
    match classify_url(database_url) {
        Ok((Backend::Postgres, url)) => run_postgres(url),
        Ok((Backend::Sqlite, path)) => run_sqlite(path),
        Err(scheme) => anyhow::bail!("Unsupported database URL scheme: {scheme}"),
    }
}
