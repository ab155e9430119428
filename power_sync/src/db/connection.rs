//! Connection helpers.
//!
//! [`connect_sqlite`] opens a connection and applies PRAGMAs for local runs:
//! WAL journaling, foreign_keys=ON, and a 5000ms busy_timeout.
//!
//! Example:
//! ```no_run
//! use power_sync::db::connection::connect_sqlite;
//!
//! let path = std::env::temp_dir().join("power_sync_example.db");
//! let _conn = connect_sqlite(path.to_str().unwrap()).expect("open sqlite");
//! ```

use diesel::{Connection, PgConnection, RunQueryDsl, SqliteConnection, sql_query};

use crate::errors::PersistenceError;

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    let mut conn = SqliteConnection::establish(database_url)?;

    // concurrent scheduled runs may share the file
    sql_query("PRAGMA journal_mode=WAL;").execute(&mut conn)?;
    sql_query("PRAGMA foreign_keys=ON;").execute(&mut conn)?;
    sql_query("PRAGMA busy_timeout=5000;").execute(&mut conn)?;
    Ok(conn)
}

/// Open a PostgreSQL connection.
pub fn connect_postgres(database_url: &str) -> Result<PgConnection, PersistenceError> {
    Ok(PgConnection::establish(database_url)?)
}
