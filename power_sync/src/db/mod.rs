//! Database utilities for connections and schema migrations.
//!
//! This module provides:
//! - Connection helpers: [`connection::connect_sqlite`] applies WAL, foreign_keys=ON and a
//!   5000ms busy_timeout; [`connection::connect_postgres`] opens a plain `PgConnection`.
//! - Embedded Diesel migrations, one set per backend, and runners:
//!   [`migrate::run_sqlite`], [`migrate::run_postgres`] and [`migrate::run_all`], which
//!   dispatches on the URL (postgres://, postgresql://, or anything else as SQLite).
//!
//! Example:
//! ```no_run
//! use power_sync::db::{connection, migrate};
//!
//! let db_path = std::env::temp_dir().join("power_sync_example.db");
//! migrate::run_all(db_path.to_str().unwrap()).expect("migrations");
//!
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```
//!
//! Note: building with PostgreSQL support requires the system libpq (e.g. libpq-dev on Debian/Ubuntu).

pub mod connection;
pub mod migrate;

/// Backend selected from a database URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

/// Picks the backend for `database_url` and returns the URL the driver should see.
///
/// `postgres://` and `postgresql://` go to Postgres. `sqlite://` and `sqlite:` prefixes
/// are stripped, and a URL with no scheme is taken as a SQLite file path. Any other
/// scheme is rejected with the scheme name.
pub fn classify_url(database_url: &str) -> Result<(Backend, &str), String> {
    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        return Ok((Backend::Postgres, database_url));
    }
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        return Ok((Backend::Sqlite, path));
    }
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        return Ok((Backend::Sqlite, path));
    }
    match database_url.split_once("://") {
        Some((scheme, _)) => Err(scheme.to_string()),
        None => Ok((Backend::Sqlite, database_url)),
    }
}
