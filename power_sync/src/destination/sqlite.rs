use diesel::{Connection, ExpressionMethods, RunQueryDsl, SqliteConnection, insert_into, upsert::excluded};

use crate::{
    db::{connection::connect_sqlite, migrate::migrate_sqlite},
    destination::{CurveStore, UPSERT_CHUNK_ROWS, dedup_points},
    errors::PersistenceError,
    models::CurveRow,
    schema::power_data,
};

/// Store backed by a SQLite file, for local runs and tests.
pub struct SqliteCurveStore {
    conn: SqliteConnection,
}

impl SqliteCurveStore {
    pub fn connect(path: &str) -> Result<Self, PersistenceError> {
        Ok(Self::from_connection(connect_sqlite(path)?))
    }

    pub fn from_connection(conn: SqliteConnection) -> Self {
        Self { conn }
    }
}

impl CurveStore for SqliteCurveStore {
    fn ensure_schema(&mut self) -> Result<(), PersistenceError> {
        migrate_sqlite(&mut self.conn).map_err(|e| PersistenceError::Migration(e.to_string()))
    }

    fn upsert(&mut self, rows: &[CurveRow]) -> Result<usize, PersistenceError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let points = dedup_points(rows);

        self.conn.transaction(|conn| {
            for chunk in points.chunks(UPSERT_CHUNK_ROWS) {
                insert_into(power_data::table)
                    .values(chunk)
                    .on_conflict((power_data::curve_name, power_data::curve_date))
                    .do_update()
                    .set(power_data::value.eq(excluded(power_data::value)))
                    .execute(conn)?;
            }
            Ok::<_, diesel::result::Error>(())
        })?;

        tracing::debug!(rows = rows.len(), "upserted into power_data (sqlite)");
        Ok(rows.len())
    }
}
