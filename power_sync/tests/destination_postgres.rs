//! Runs against a real Postgres. Set POSTGRES_CONNECTION_STRING and pass `--ignored`.

use chrono::{TimeZone, Utc};
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Double, Text};
use power_sync::db::connection::connect_postgres;
use power_sync::destination::{CurveStore, PgCurveStore};
use power_sync::models::CurveRow;
use power_sync::schema::power_data;

#[derive(QueryableByName)]
struct StoredValue {
    #[diesel(sql_type = Double)]
    value: f64,
}

fn database_url() -> Option<String> {
    shared_utils::env::get_optional_env_var("POSTGRES_CONNECTION_STRING")
}

fn read_values(conn: &mut PgConnection, name: &str) -> Vec<f64> {
    diesel::sql_query(
        "SELECT value::float8 AS value FROM power_data WHERE curve_name = $1 ORDER BY curve_date",
    )
    .bind::<Text, _>(name)
    .load::<StoredValue>(conn)
    .unwrap()
    .into_iter()
    .map(|v| v.value)
    .collect()
}

#[test]
#[ignore]
fn upsert_overwrites_value_on_postgres() {
    let Some(url) = database_url() else {
        eprintln!("POSTGRES_CONNECTION_STRING not set; skipping");
        return;
    };
    let name = format!("test-{}, Wind Onshore, min30", uuid::Uuid::new_v4());
    let at = Utc.with_ymd_and_hms(2023, 7, 21, 4, 30, 0).unwrap();

    let mut store = PgCurveStore::connect(&url).unwrap();
    store.ensure_schema().unwrap();
    store.ensure_schema().unwrap();

    let row = |value| CurveRow {
        curve_name: name.clone(),
        curve_date: at,
        value,
    };
    assert_eq!(store.upsert(&[row(640.283)]).unwrap(), 1);
    assert_eq!(store.upsert(&[row(740.283)]).unwrap(), 1);
    assert_eq!(store.upsert(&[]).unwrap(), 0);

    let mut conn = connect_postgres(&url).unwrap();
    assert_eq!(read_values(&mut conn, &name), [740.283]);

    // same key twice in one statement
    assert_eq!(store.upsert(&[row(1.0), row(2.0)]).unwrap(), 2);
    assert_eq!(read_values(&mut conn, &name), [2.0]);

    diesel::delete(power_data::table.filter(power_data::curve_name.eq(&name)))
        .execute(&mut conn)
        .unwrap();
}
