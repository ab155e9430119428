#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Double, Integer, Nullable, Text, Timestamp};
use generation_ingestor::models::{record::RawRecord, window::TimeWindow};
use generation_ingestor::providers::{GenerationProvider, ProviderError};
use power_sync::db::{connection, migrate};
use power_sync::destination::{CurveStore, SqliteCurveStore, StoreFactory};
use power_sync::errors::PersistenceError;
use power_sync::models::CurveRow;
use serde_json::{Value, json};
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

/// A row as read back from `power_data`.
#[derive(QueryableByName, Debug, PartialEq)]
pub struct StoredPoint {
    #[diesel(sql_type = Text)]
    pub curve_name: String,
    #[diesel(sql_type = Timestamp)]
    pub curve_date: NaiveDateTime,
    #[diesel(sql_type = Nullable<Double>)]
    pub value: Option<f64>,
}

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

/// Fresh migrated SQLite file plus a tuned connection to it.
pub fn setup_db() -> (TestDb, SqliteConnection) {
    let db = empty_db();
    migrate::run_all(&db.path).expect("migrations");
    let conn = connection::connect_sqlite(&db.path).expect("connect");
    (db, conn)
}

/// A path to a SQLite file that does not exist yet.
pub fn empty_db() -> TestDb {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();
    TestDb { _dir: dir, path }
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

pub fn read_points(conn: &mut SqliteConnection) -> Vec<StoredPoint> {
    diesel::sql_query(
        "SELECT curve_name, curve_date, value FROM power_data ORDER BY curve_name, curve_date",
    )
    .load(conn)
    .unwrap()
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

pub fn curve(name: &str, at: DateTime<Utc>, value: f64) -> CurveRow {
    CurveRow {
        curve_name: name.to_string(),
        curve_date: at,
        value,
    }
}

pub fn raw(v: Value) -> RawRecord {
    match v {
        Value::Object(m) => m,
        other => panic!("expected object, got {other}"),
    }
}

/// One clean record per known psrType, all at `at`.
pub fn clean_batch(at: DateTime<Utc>) -> Vec<RawRecord> {
    [("Wind Onshore", 640.283), ("Wind Offshore", 77.014), ("Solar", 89.0)]
        .into_iter()
        .map(|(psr, q)| {
            raw(json!({
                "publishTime": "2023-07-21T06:58:08Z",
                "businessType": "Wind generation",
                "psrType": psr,
                "quantity": q,
                "startTime": at.to_rfc3339(),
                "settlementDate": at.date_naive().to_string(),
                "settlementPeriod": 12
            }))
        })
        .collect()
}

/// SQLite-backed factory that counts how often it was asked for a store.
pub fn counting_sqlite_factory(path: &str) -> (StoreFactory, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let path = path.to_string();
    let factory: StoreFactory = Arc::new(move || -> Result<Box<dyn CurveStore>, PersistenceError> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SqliteCurveStore::connect(&path)?))
    });
    (factory, calls)
}

/// Scripted provider: answers with `responses` in order, repeating the last one.
pub struct ScriptedProvider {
    responses: Vec<Response>,
    calls: AtomicUsize,
}

#[derive(Clone)]
pub enum Response {
    /// A clean batch stamped with the window start.
    Clean,
    Records(Vec<RawRecord>),
    Status(u16),
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Response>) -> Arc<Self> {
        assert!(!responses.is_empty());
        Arc::new(Self {
            responses,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    async fn fetch_generation(&self, window: &TimeWindow) -> Result<Vec<RawRecord>, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let response = &self.responses[n.min(self.responses.len() - 1)];
        match response {
            Response::Clean => Ok(clean_batch(window.from())),
            Response::Records(r) => Ok(r.clone()),
            Response::Status(status) => Err(ProviderError::Status {
                status: *status,
                body: "scripted failure".into(),
            }),
        }
    }
}
